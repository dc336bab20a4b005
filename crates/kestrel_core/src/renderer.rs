//! Renderer Bring-up
//!
//! Glue between capability negotiation and engine initialization: ask the
//! platform for its graphics configs, pick one, hand it to the engine.

use tracing::info;

use kestrel_engine::{NativeEngine, RenderableType};
use kestrel_platform::{negotiate, CapabilityQuery};

use crate::error::BridgeResult;

/// Negotiate a graphics config and initialize the engine's renderer
/// with it.
///
/// Fails if the platform query fails, if no config satisfies the
/// renderable requirement, or if the engine rejects the chosen config.
pub fn initialize_renderer<Q, E>(
    query: &Q,
    engine: &mut E,
    required: RenderableType,
) -> BridgeResult<()>
where
    Q: CapabilityQuery + ?Sized,
    E: NativeEngine + ?Sized,
{
    let chosen = negotiate(query, required)?;
    info!(
        red = chosen.red,
        green = chosen.green,
        blue = chosen.blue,
        alpha = chosen.alpha,
        depth = chosen.depth,
        stencil = chosen.stencil,
        "initializing renderer with negotiated config"
    );
    engine.init_renderer(&chosen)?;
    Ok(())
}

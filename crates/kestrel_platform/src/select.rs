//! Graphics Configuration Selection
//!
//! Picks exactly one usable graphics configuration out of the variable,
//! unordered, partially-overlapping set the hardware reports. Selection is
//! a strict ordered-tier greedy search, not a weighted score: tiers are
//! evaluated in fixed order, the first tier with at least one match wins,
//! and the first matching candidate within that tier (candidate list order
//! preserved) is returned.
//!
//! True-color plus full depth/stencil is preferred for correctness; the
//! search degrades toward lower color depth only as a last resort, and
//! destination-alpha configs are avoided except as a constrained fallback
//! because they composite incorrectly on some GPUs.
//!
//! Every candidate and the final choice are logged so a selection can be
//! reproduced from a trace.

use tracing::{debug, info, warn};

use kestrel_engine::{GraphicsConfigCandidate, RenderableType};

use crate::error::{PlatformError, PlatformResult};

/// Opaque platform enumeration of available graphics configurations.
///
/// The bridge only consumes its output; an implementation wraps whatever
/// the platform's capability-query primitive is.
pub trait CapabilityQuery {
    /// Enumerate the hardware-reported candidate configurations.
    ///
    /// An `Err` here means the enumeration itself failed
    /// ([`PlatformError::QueryFailed`]) and is distinct from a successful
    /// enumeration that yields no usable candidate.
    fn enumerate_configs(&self) -> PlatformResult<Vec<GraphicsConfigCandidate>>;
}

/// Requirement on a single config attribute within a tier.
#[derive(Debug, Clone, Copy)]
enum AttrReq {
    Exact(u32),
    AtLeast(u32),
    Any,
}

impl AttrReq {
    fn matches(&self, value: u32) -> bool {
        match *self {
            AttrReq::Exact(want) => value == want,
            AttrReq::AtLeast(min) => value >= min,
            AttrReq::Any => true,
        }
    }
}

/// One predicate tier of the greedy search.
#[derive(Debug, Clone, Copy)]
struct TierSpec {
    name: &'static str,
    red: AttrReq,
    green: AttrReq,
    blue: AttrReq,
    alpha: AttrReq,
    depth: AttrReq,
    stencil: AttrReq,
}

impl TierSpec {
    fn matches(&self, c: &GraphicsConfigCandidate) -> bool {
        self.red.matches(c.red)
            && self.green.matches(c.green)
            && self.blue.matches(c.blue)
            && self.alpha.matches(c.alpha)
            && self.depth.matches(c.depth)
            && self.stencil.matches(c.stencil)
    }
}

/// The fixed selection policy. Order is load-bearing; earlier tiers are
/// strictly preferred. Sample count never participates.
const SELECTION_TIERS: [TierSpec; 8] = [
    TierSpec {
        name: "rgb888 depth24 stencil8",
        red: AttrReq::Exact(8),
        green: AttrReq::Exact(8),
        blue: AttrReq::Exact(8),
        alpha: AttrReq::Exact(0),
        depth: AttrReq::AtLeast(24),
        stencil: AttrReq::AtLeast(8),
    },
    TierSpec {
        name: "rgb888 depth20 stencil8",
        red: AttrReq::Exact(8),
        green: AttrReq::Exact(8),
        blue: AttrReq::Exact(8),
        alpha: AttrReq::Exact(0),
        depth: AttrReq::AtLeast(20),
        stencil: AttrReq::AtLeast(8),
    },
    TierSpec {
        name: "rgb888 depth16 stencil8",
        red: AttrReq::Exact(8),
        green: AttrReq::Exact(8),
        blue: AttrReq::Exact(8),
        alpha: AttrReq::Exact(0),
        depth: AttrReq::AtLeast(16),
        stencil: AttrReq::AtLeast(8),
    },
    TierSpec {
        name: "rgb888 depth16",
        red: AttrReq::Exact(8),
        green: AttrReq::Exact(8),
        blue: AttrReq::Exact(8),
        alpha: AttrReq::Exact(0),
        depth: AttrReq::AtLeast(16),
        stencil: AttrReq::Any,
    },
    TierSpec {
        name: "rgba8888 depth24 stencil8",
        red: AttrReq::Exact(8),
        green: AttrReq::Exact(8),
        blue: AttrReq::Exact(8),
        alpha: AttrReq::Exact(8),
        depth: AttrReq::AtLeast(24),
        stencil: AttrReq::AtLeast(8),
    },
    TierSpec {
        name: "rgba8888 depth16 stencil8",
        red: AttrReq::Exact(8),
        green: AttrReq::Exact(8),
        blue: AttrReq::Exact(8),
        alpha: AttrReq::Exact(8),
        depth: AttrReq::AtLeast(16),
        stencil: AttrReq::AtLeast(8),
    },
    TierSpec {
        name: "rgb565 depth16 stencil8",
        red: AttrReq::AtLeast(5),
        green: AttrReq::AtLeast(6),
        blue: AttrReq::AtLeast(5),
        alpha: AttrReq::Any,
        depth: AttrReq::AtLeast(16),
        stencil: AttrReq::AtLeast(8),
    },
    TierSpec {
        name: "rgb565 depth16",
        red: AttrReq::AtLeast(5),
        green: AttrReq::AtLeast(6),
        blue: AttrReq::AtLeast(5),
        alpha: AttrReq::Any,
        depth: AttrReq::AtLeast(16),
        stencil: AttrReq::Any,
    },
];

/// Select exactly one configuration from an already-enumerated candidate
/// list.
///
/// Candidates that do not support every bit of `required` are filtered
/// out first. If the filtered list is non-empty the search always
/// succeeds: the final fallback is the first remaining candidate in its
/// original order.
pub fn select(
    candidates: &[GraphicsConfigCandidate],
    required: RenderableType,
) -> PlatformResult<GraphicsConfigCandidate> {
    let usable: Vec<&GraphicsConfigCandidate> = candidates
        .iter()
        .filter(|c| c.renderable.contains(required))
        .collect();

    for (i, c) in usable.iter().enumerate() {
        debug!(
            index = i,
            red = c.red,
            green = c.green,
            blue = c.blue,
            alpha = c.alpha,
            depth = c.depth,
            stencil = c.stencil,
            samples = c.samples,
            "config candidate"
        );
    }

    if usable.is_empty() {
        warn!(
            total = candidates.len(),
            required = required.bits(),
            "no candidate supports the required renderable type"
        );
        return Err(PlatformError::NoMatchingConfig);
    }

    for tier in &SELECTION_TIERS {
        if let Some(chosen) = usable.iter().find(|c| tier.matches(c)) {
            info!(tier = tier.name, config = ?chosen, "selected graphics config");
            return Ok(**chosen);
        }
    }

    // No tier matched but the list is non-empty: take the first candidate
    // as reported rather than failing surface creation outright.
    let first = usable[0];
    info!(tier = "fallback-first", config = ?first, "selected graphics config");
    Ok(*first)
}

/// Run the full negotiation: enumerate via the platform query, then
/// select. Enumeration failure surfaces as [`PlatformError::QueryFailed`].
pub fn negotiate<Q: CapabilityQuery + ?Sized>(
    query: &Q,
    required: RenderableType,
) -> PlatformResult<GraphicsConfigCandidate> {
    let candidates = query.enumerate_configs()?;
    debug!(count = candidates.len(), "enumerated graphics configs");
    select(&candidates, required)
}

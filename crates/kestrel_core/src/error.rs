//! Bridge Error Types

use thiserror::Error;

use kestrel_engine::RendererInitError;
use kestrel_platform::PlatformError;

/// Errors from the streaming bridge
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("invalid audio configuration: {0}")]
    Config(String),

    #[error("failed to spawn audio worker: {0}")]
    WorkerSpawn(String),

    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("renderer error: {0}")]
    Renderer(#[from] RendererInitError),
}

/// Result type alias for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

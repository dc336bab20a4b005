//! Bridge Event Types
//!
//! Events flow from the audio worker to whichever control surface owns
//! the receiver. The worker only ever uses `try_send`; reporting must not
//! block the real-time path.

use serde::{Deserialize, Serialize};

/// Events emitted by the streaming bridge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum BridgeEvent {
    /// Audio worker is up and streaming
    AudioStarted,

    /// Audio worker exited cleanly after a stop request
    AudioStopped,

    /// The platform sink rejected a build or write. Fatal for the
    /// session; the worker has stopped and will not retry.
    SinkFailed { message: String },
}

impl BridgeEvent {
    /// Create a sink-failure event from any error type
    pub fn sink_failed<E: std::fmt::Display>(err: E) -> Self {
        BridgeEvent::SinkFailed {
            message: err.to_string(),
        }
    }
}

//! Platform Negotiation Error Types

use thiserror::Error;

/// Errors from platform capability negotiation
#[derive(Error, Debug)]
pub enum PlatformError {
    /// The platform's capability enumeration itself errored. Abnormal;
    /// no configuration is chosen.
    #[error("capability enumeration failed: {0}")]
    QueryFailed(String),

    /// The candidate list was empty after renderable-type filtering.
    #[error("no graphics configuration matches the required renderable type")]
    NoMatchingConfig,

    /// A dispatch referenced a device id the registry never saw.
    #[error("unknown input device: {0}")]
    UnknownDevice(i32),

    /// A platform feature is simply absent; the affected device or
    /// feature is not registered rather than surfaced as a failure.
    #[error("feature not available on this platform: {0}")]
    FeatureNotAvailable(String),
}

/// Result type alias for platform negotiation operations
pub type PlatformResult<T> = Result<T, PlatformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PlatformError::QueryFailed("EGL_BAD_DISPLAY".into());
        assert!(err.to_string().contains("EGL_BAD_DISPLAY"));

        let err = PlatformError::UnknownDevice(17);
        assert!(err.to_string().contains("17"));
    }
}

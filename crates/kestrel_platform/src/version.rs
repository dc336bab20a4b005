//! Platform Version Detection
//!
//! The bridge gates one workaround on the OS API level: below a known
//! threshold the platform's orientation-query API can report the previous
//! orientation for a short window after surface creation, so the display
//! negotiator cross-checks it against measured geometry. At or above the
//! threshold the query is trusted as-is.

use serde::{Deserialize, Serialize};

/// Platform API level as reported by the OS at process start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlatformVersion {
    /// Numeric API level
    pub api_level: u32,
}

impl PlatformVersion {
    /// First API level whose orientation query is reliable at
    /// surface-creation time.
    pub const MIN_RELIABLE_ORIENTATION_API: u32 = 26;

    pub fn new(api_level: u32) -> Self {
        Self { api_level }
    }

    /// Whether the orientation query can be trusted during surface
    /// creation. Below this the negotiator applies the mismatch
    /// workaround.
    pub fn orientation_query_reliable(&self) -> bool {
        self.api_level >= Self::MIN_RELIABLE_ORIENTATION_API
    }
}

impl std::fmt::Display for PlatformVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "API level {}", self.api_level)
    }
}

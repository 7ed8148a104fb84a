//! Explicit settings for a build, passed in rather than read from globals.

use std::time::Duration;

/// Default bound on a single provider call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings shared by every record of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildConfig {
    /// Upper bound on each provider call; an expired call fails its slot.
    pub call_timeout: Duration,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }
}

impl BuildConfig {
    pub fn with_timeout(call_timeout: Duration) -> Self {
        Self { call_timeout }
    }
}

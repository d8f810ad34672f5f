//! Retry policy for reachability probes

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Number of reachability checks made before giving up
pub const DEFAULT_ATTEMPT_COUNT: u32 = 5;

/// Per-attempt reachability timeout in milliseconds
pub const DEFAULT_ATTEMPT_TIMEOUT_MS: u64 = 1000;

/// Echo service port, used by TCP checks when no port is configured
pub const ECHO_PORT: u16 = 7;

/// Attempt budget and timeout applied to a single probe run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbePolicy {
    /// How many sequential checks to make
    pub attempt_count: u32,
    /// Timeout for each check in milliseconds
    pub timeout_ms: u64,
}

impl Default for ProbePolicy {
    fn default() -> Self {
        Self {
            attempt_count: DEFAULT_ATTEMPT_COUNT,
            timeout_ms: DEFAULT_ATTEMPT_TIMEOUT_MS,
        }
    }
}

impl ProbePolicy {
    pub fn new(attempt_count: u32, timeout_ms: u64) -> Self {
        Self {
            attempt_count,
            timeout_ms,
        }
    }

    /// Per-attempt timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Upper bound on wall time spent checking before a terminal failure
    ///
    /// `None` when the bound does not fit in a `Duration`.
    pub fn worst_case(&self) -> Option<Duration> {
        self.timeout().checked_mul(self.attempt_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = ProbePolicy::default();
        assert_eq!(policy.attempt_count, 5);
        assert_eq!(policy.timeout(), Duration::from_millis(1000));
    }

    #[test]
    fn test_worst_case() {
        assert_eq!(ProbePolicy::default().worst_case(), Some(Duration::from_secs(5)));
        assert_eq!(
            ProbePolicy::new(3, 250).worst_case(),
            Some(Duration::from_millis(750))
        );
    }

    #[test]
    fn test_worst_case_overflow() {
        assert_eq!(ProbePolicy::new(u32::MAX, u64::MAX).worst_case(), None);
    }
}

//! # Suite configuration.
//!
//! Provides [`Config`] centralized settings for a [`Suite`](crate::Suite).
//!
//! Config is used in two ways:
//! 1. **Suite creation**: `Suite::new(config, reporters)` / `Suite::builder(config)`
//! 2. **Per-test defaults**: the executor falls back to [`Config::timeout`] when a
//!    test carries no override.

use std::time::Duration;

/// Global configuration for a suite.
///
/// ## Field semantics
/// - `only_failed`: forward only `fail`/`error` results (plus `info`) to reporters
/// - `timeout`: default per-test timeout; an operation is polled once before the
///   deadline is checked, so `Duration::ZERO` only fails operations still pending
///   after their first poll
#[derive(Clone, Debug)]
pub struct Config {
    /// Suppress non-failing results before they reach the reporters.
    ///
    /// `info` results are never suppressed; group brackets, progress and
    /// completion calls are always delivered.
    pub only_failed: bool,

    /// Default per-test timeout.
    ///
    /// Overridable per test via [`TestOptions::timeout`](crate::TestOptions::timeout).
    pub timeout: Duration,
}

impl Config {
    /// Effective timeout for a test with an optional override.
    #[inline]
    pub fn timeout_for(&self, override_: Option<Duration>) -> Duration {
        override_.unwrap_or(self.timeout)
    }

    /// Returns `true` if a result with `verdict` should reach the reporters.
    #[inline]
    pub fn should_report(&self, verdict: crate::Verdict) -> bool {
        !self.only_failed || verdict.is_failure() || verdict == crate::Verdict::Info
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `only_failed = false` (report everything)
    /// - `timeout = 5s`
    fn default() -> Self {
        Self {
            only_failed: false,
            timeout: Duration::from_secs(5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Verdict;

    #[test]
    fn test_timeout_override() {
        let cfg = Config::default();
        assert_eq!(cfg.timeout_for(None), Duration::from_secs(5));
        assert_eq!(
            cfg.timeout_for(Some(Duration::from_millis(50))),
            Duration::from_millis(50)
        );
    }

    #[test]
    fn test_only_failed_filter() {
        let cfg = Config {
            only_failed: true,
            ..Config::default()
        };
        assert!(!cfg.should_report(Verdict::Pass));
        assert!(!cfg.should_report(Verdict::Skip));
        assert!(cfg.should_report(Verdict::Fail));
        assert!(cfg.should_report(Verdict::Error));
        assert!(cfg.should_report(Verdict::Info));

        let all = Config::default();
        assert!(all.should_report(Verdict::Pass));
    }
}

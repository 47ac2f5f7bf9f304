//! Reconnect policy for the push channel.
//!
//! While the connection is closed or errored the listener probes the
//! gateway once per `interval`. Probing stops as soon as a connection opens
//! and, when `max_attempts` is set, after that many consecutive failures.

use std::time::Duration;

/// Default probe interval.
pub const DEFAULT_RECONNECT_INTERVAL: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub interval: Duration,
    /// `None` probes forever.
    pub max_attempts: Option<u32>,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_RECONNECT_INTERVAL,
            max_attempts: None,
        }
    }
}

impl ReconnectPolicy {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Whether another probe may follow `failures` consecutive failed
    /// connection attempts.
    pub fn allows(&self, failures: u32) -> bool {
        self.max_attempts.map_or(true, |max| failures < max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_probes_every_second_forever() {
        let policy = ReconnectPolicy::default();
        assert_eq!(policy.interval, Duration::from_secs(1));
        assert!(policy.allows(u32::MAX - 1));
    }

    #[test]
    fn max_attempts_bounds_probing() {
        let policy = ReconnectPolicy::default().with_max_attempts(3);
        assert!(policy.allows(0));
        assert!(policy.allows(2));
        assert!(!policy.allows(3));
    }
}

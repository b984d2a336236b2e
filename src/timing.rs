//! The minimum-duration policy applied to successful invocations.
//!
//! The Lambda logs API delivers function output to extensions asynchronously.
//! If the function returns too soon after printing, the environment can be
//! frozen before the line reaches the collector, so every successful call is
//! padded up to a floor.

use std::time::{Duration, Instant};

use crate::config::{LoggerConfig, TimingAnchor};

/// Computes how long to wait before returning a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingPolicy {
    floor: Duration,
    anchor: TimingAnchor,
}

impl TimingPolicy {
    /// Creates a policy with the given floor and anchor.
    pub fn new(floor: Duration, anchor: TimingAnchor) -> Self {
        Self { floor, anchor }
    }

    /// The configured floor.
    pub fn floor(&self) -> Duration {
        self.floor
    }

    /// The configured anchor.
    pub fn anchor(&self) -> TimingAnchor {
        self.anchor
    }

    /// `max(floor - elapsed, 0)`.
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use firetail_lambda_logger::{TimingAnchor, TimingPolicy};
    ///
    /// let policy = TimingPolicy::new(Duration::from_millis(25), TimingAnchor::InvocationStart);
    /// assert_eq!(policy.padding(Duration::from_millis(10)), Duration::from_millis(15));
    /// assert_eq!(policy.padding(Duration::from_millis(40)), Duration::ZERO);
    /// ```
    pub fn padding(&self, elapsed: Duration) -> Duration {
        self.floor.saturating_sub(elapsed)
    }

    /// Padding owed once the line has been emitted at `emitted`.
    pub fn padding_after(&self, started: Instant, emitted: Instant) -> Duration {
        match self.anchor {
            TimingAnchor::InvocationStart => {
                self.padding(emitted.saturating_duration_since(started))
            }
            TimingAnchor::Emission => self.floor,
        }
    }
}

/// Whole milliseconds in `duration`, saturating at `u64::MAX`.
pub(crate) fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl From<&LoggerConfig> for TimingPolicy {
    fn from(config: &LoggerConfig) -> Self {
        Self::new(config.timing_floor, config.timing_anchor)
    }
}

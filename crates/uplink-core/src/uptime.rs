//! Uptime formatting
//!
//! The monitor reports how long the connection had been up when it drops.
//! Durations are rendered as `"1d 1h 1m 1s"`.

use std::time::Duration;

/// A duration broken into day/hour/minute/second components
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UptimeParts {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl UptimeParts {
    /// Decompose a number of whole seconds
    pub fn from_secs(total: u64) -> Self {
        let days = total / 86_400;
        let rem = total % 86_400;
        let hours = rem / 3_600;
        let rem = rem % 3_600;
        let minutes = rem / 60;
        let seconds = rem % 60;

        Self {
            days,
            hours,
            minutes,
            seconds,
        }
    }

    /// Recompose into whole seconds
    pub fn total_secs(&self) -> u64 {
        self.days * 86_400 + self.hours * 3_600 + self.minutes * 60 + self.seconds
    }
}

impl std::fmt::Display for UptimeParts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}d {}h {}m {}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// Format an elapsed duration as `"1d 1h 1m 1s"`
///
/// Sub-second precision is truncated.
pub fn format_uptime(elapsed: Duration) -> String {
    UptimeParts::from_secs(elapsed.as_secs()).to_string()
}

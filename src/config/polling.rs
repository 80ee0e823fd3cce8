//! Wait loop policy.

use serde::Deserialize;

/// How the wait operations poll RAMP_STAT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct PollPolicy {
    /// Sleep between two status reads, in milliseconds.
    pub interval_ms: u32,
    /// Status reads before giving up; `None` polls until the goal is seen.
    pub max_polls: Option<u32>,
}

impl PollPolicy {
    /// Poll every `interval_ms` until the goal is observed.
    pub const fn unbounded(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            max_polls: None,
        }
    }

    /// Poll at most `max_polls` times.
    pub const fn bounded(interval_ms: u32, max_polls: u32) -> Self {
        Self {
            interval_ms,
            max_polls: Some(max_polls),
        }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::unbounded(100)
    }
}

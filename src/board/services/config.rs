//! Board configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How a drag on a task whose previous lane change is still reconciling is
/// handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcurrencyPolicy {
    /// The newest drag wins: a response for a superseded transition is
    /// discarded instead of reconciled or rolled back.
    #[default]
    LatestIntentWins,
    /// Every response is applied in arrival order, so a late response can
    /// overwrite a newer one.
    LastResponseWins,
    /// A drag is refused while the task has a transition in flight.
    SerializePerTask,
}

/// Runtime settings for a board session.
///
/// # Examples
///
/// ```
/// use taskboard::board::services::{BoardConfig, ConcurrencyPolicy};
///
/// let config = BoardConfig::default();
/// assert_eq!(config.concurrency, ConcurrencyPolicy::LatestIntentWins);
/// assert!(config.remote_timeout().is_none());
///
/// let strict = BoardConfig::strict();
/// assert_eq!(strict.concurrency, ConcurrencyPolicy::SerializePerTask);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Handling of overlapping drags on the same task.
    pub concurrency: ConcurrencyPolicy,
    /// Upper bound for each remote call in milliseconds. `None` leaves
    /// timing to the transport.
    pub remote_timeout_ms: Option<u64>,
}

impl BoardConfig {
    /// Creates a configuration that refuses overlapping drags and bounds
    /// remote calls to ten seconds.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            concurrency: ConcurrencyPolicy::SerializePerTask,
            remote_timeout_ms: Some(10_000),
        }
    }

    /// Creates a configuration that applies every response as it arrives.
    #[must_use]
    pub const fn faithful() -> Self {
        Self {
            concurrency: ConcurrencyPolicy::LastResponseWins,
            remote_timeout_ms: None,
        }
    }

    /// Parses a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`] for malformed input.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Returns the remote call timeout, if configured.
    #[must_use]
    pub const fn remote_timeout(&self) -> Option<Duration> {
        match self.remote_timeout_ms {
            Some(millis) => Some(Duration::from_millis(millis)),
            None => None,
        }
    }
}

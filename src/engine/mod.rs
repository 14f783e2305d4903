//! Application-facing facade over the detectors.
//!
//! [`EventApi`] owns the snapshot source, the dispatcher and one poller per
//! [`DetectorKind`]. Applications subscribe to topics, set the tracked player
//! and start or stop each kind of detection independently.

mod config;
mod event_api;

pub use config::EngineConfig;
pub use event_api::EventApi;

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// The five independent kinds of detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetectorKind {
    ApiAvailability,
    PlayerStatus,
    LevelUp,
    Items,
    MatchEvents,
}

impl DetectorKind {
    /// Every kind, in start-up order.
    pub fn all() -> [DetectorKind; 5] {
        [
            DetectorKind::ApiAvailability,
            DetectorKind::PlayerStatus,
            DetectorKind::LevelUp,
            DetectorKind::Items,
            DetectorKind::MatchEvents,
        ]
    }

    /// Short name used to tag log lines.
    pub fn name(&self) -> &'static str {
        match self {
            DetectorKind::ApiAvailability => "api-loaded",
            DetectorKind::PlayerStatus => "player-status",
            DetectorKind::LevelUp => "level-up",
            DetectorKind::Items => "items",
            DetectorKind::MatchEvents => "match-events",
        }
    }

    /// Poll interval used when none is configured.
    pub fn default_interval(&self) -> Duration {
        match self {
            DetectorKind::ApiAvailability => Duration::from_millis(1000),
            _ => Duration::from_millis(100),
        }
    }

    /// Whether this kind needs a tracked player before it can start.
    pub fn needs_player(&self) -> bool {
        matches!(self, DetectorKind::PlayerStatus | DetectorKind::Items)
    }

    /// Suffix of the `LIVE_EVENTS_<KIND>_INTERVAL_MS` variable.
    pub(crate) fn env_key(&self) -> &'static str {
        match self {
            DetectorKind::ApiAvailability => "API",
            DetectorKind::PlayerStatus => "STATUS",
            DetectorKind::LevelUp => "LEVEL",
            DetectorKind::Items => "ITEMS",
            DetectorKind::MatchEvents => "EVENTS",
        }
    }
}

impl fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Errors from controlling the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("No tracked player set, cannot start the {0} detector")]
    PlayerNotSet(DetectorKind),
}

//! The snapshot source seam.
//!
//! Detectors only ever see the game client through [`SnapshotSource`]. Each
//! call returns the current value of one observable fact; any failure is
//! transient from the engine's point of view and only costs that tick.

use async_trait::async_trait;
use thiserror::Error;

use crate::events::{ItemSet, MatchEvent};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Live client unavailable: {0}")]
    Unavailable(String),

    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Live client error: {status} - {message}")]
    Status { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    #[error("Sample file error: {0}")]
    Io(#[from] std::io::Error),
}

/// Point-in-time facts about the running match.
#[async_trait]
pub trait SnapshotSource: Send + Sync + 'static {
    /// Whether a player is currently in a match (the endpoint answers).
    async fn is_player_present(&self) -> Result<bool, SourceError>;

    async fn is_player_dead(&self, name: &str) -> Result<bool, SourceError>;

    /// Level of the active player.
    async fn current_level(&self) -> Result<u32, SourceError>;

    async fn current_items(&self, name: &str) -> Result<ItemSet, SourceError>;

    /// The newest match event, or `None` before the first one.
    async fn latest_event(&self) -> Result<Option<MatchEvent>, SourceError>;

    /// Every match event so far, ordered by sequence number.
    async fn all_events(&self) -> Result<Vec<MatchEvent>, SourceError>;
}

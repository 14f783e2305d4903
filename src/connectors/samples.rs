//! Offline snapshot source backed by captured JSON responses.
//!
//! Reads the same documents the live client serves from a directory, so the
//! whole engine can be exercised without a running game:
//!
//! - `activeplayername.json` (its presence means "in match")
//! - `playerlist.json`
//! - `activeplayer.json`
//! - `playeritems_<name>.json`
//! - `eventdata.json`
//!
//! Files are re-read on every call; editing them while the engine runs
//! simulates a live match.

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

use crate::events::{ItemSet, MatchEvent};

use super::models::{decode_events, decode_items, decode_level, decode_player_dead};
use super::source::{SnapshotSource, SourceError};

/// Simulated latency of the live endpoint.
pub const DEFAULT_SAMPLE_LATENCY: Duration = Duration::from_millis(25);

#[derive(Debug, Clone)]
pub struct SampleSource {
    dir: PathBuf,
    latency: Duration,
}

impl SampleSource {
    /// Reads from `dir` with [`DEFAULT_SAMPLE_LATENCY`] per call.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_latency(dir, DEFAULT_SAMPLE_LATENCY)
    }

    /// Reads from `dir`, sleeping `latency` before every read.
    pub fn with_latency(dir: impl Into<PathBuf>, latency: Duration) -> Self {
        Self {
            dir: dir.into(),
            latency,
        }
    }

    async fn read(&self, file: &str) -> Result<String, SourceError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(tokio::fs::read_to_string(self.dir.join(file)).await?)
    }
}

#[async_trait]
impl SnapshotSource for SampleSource {
    async fn is_player_present(&self) -> Result<bool, SourceError> {
        Ok(tokio::fs::try_exists(self.dir.join("activeplayername.json")).await?)
    }

    async fn is_player_dead(&self, name: &str) -> Result<bool, SourceError> {
        let body = self.read("playerlist.json").await?;
        decode_player_dead(&body, name)
    }

    async fn current_level(&self) -> Result<u32, SourceError> {
        let body = self.read("activeplayer.json").await?;
        decode_level(&body)
    }

    async fn current_items(&self, name: &str) -> Result<ItemSet, SourceError> {
        let body = self.read(&format!("playeritems_{}.json", name)).await?;
        decode_items(&body)
    }

    async fn latest_event(&self) -> Result<Option<MatchEvent>, SourceError> {
        let body = self.read("eventdata.json").await?;
        Ok(decode_events(&body)?.pop())
    }

    async fn all_events(&self) -> Result<Vec<MatchEvent>, SourceError> {
        let body = self.read("eventdata.json").await?;
        decode_events(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventType;
    use std::path::Path;

    fn write(dir: &Path, file: &str, body: &str) {
        std::fs::write(dir.join(file), body).unwrap();
    }

    #[tokio::test]
    async fn test_sample_source_reads_each_document() {
        let dir = tempfile::tempdir().unwrap();
        let source = SampleSource::with_latency(dir.path(), Duration::ZERO);

        assert!(!source.is_player_present().await.unwrap());

        write(dir.path(), "activeplayername.json", r#""Alpha""#);
        write(
            dir.path(),
            "playerlist.json",
            r#"[{"summonerName": "Alpha", "isDead": true}]"#,
        );
        write(dir.path(), "activeplayer.json", r#"{"level": 11}"#);
        write(
            dir.path(),
            "playeritems_Alpha.json",
            r#"[{"displayName": "Long Sword", "itemID": 1036}]"#,
        );
        write(
            dir.path(),
            "eventdata.json",
            r#"{"Events": [
                {"EventID": 0, "EventName": "GameStart", "EventTime": 0.0},
                {"EventID": 1, "EventName": "FirstBlood", "EventTime": 90.0, "Recipient": "Alpha"}
            ]}"#,
        );

        assert!(source.is_player_present().await.unwrap());
        assert!(source.is_player_dead("Alpha").await.unwrap());
        assert_eq!(source.current_level().await.unwrap(), 11);
        assert_eq!(
            source.current_items("Alpha").await.unwrap(),
            ItemSet::from_names(["Long Sword"])
        );

        let latest = source.latest_event().await.unwrap().unwrap();
        assert_eq!(latest.sequence, 1);
        assert_eq!(latest.event_type(), EventType::FirstBlood);
        assert_eq!(source.all_events().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_sample_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = SampleSource::with_latency(dir.path(), Duration::ZERO);

        assert!(matches!(
            source.current_level().await,
            Err(SourceError::Io(_))
        ));
        assert!(source.current_items("Nobody").await.is_err());
    }
}

//! Snapshot sources for the game client's telemetry.
//!
//! This module provides the [`SnapshotSource`] seam and its two
//! implementations: the live HTTPS endpoint and a directory of captured
//! responses. All data fetched here is normalised into [`crate::events`]
//! types before any detector sees it.

mod live_client;
pub mod models;
mod samples;
mod source;

pub use live_client::{LiveClientApi, DEFAULT_BASE_URL};
pub use samples::{SampleSource, DEFAULT_SAMPLE_LATENCY};
pub use source::{SnapshotSource, SourceError};

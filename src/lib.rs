//! League Live Events - notifications from the game client's live telemetry
//!
//! This crate polls the local telemetry endpoint of a running game client and
//! turns its loosely-structured snapshots into typed notifications: the API
//! coming up or going away, the tracked player dying or respawning, level-ups,
//! item changes and every in-match event (kills, objectives, game end).
//! Consumers subscribe to topics instead of polling and diffing themselves.
//!
//! # Architecture
//!
//! - **Sources** fetch one fact per call from the live client or from captured
//!   sample files ([`connectors`])
//! - **Detectors** remember the last value of one fact and publish a
//!   notification on change; the event sequencer delivers match events in
//!   order with no gaps ([`watchers`])
//! - **Dispatcher** fans each notification out to its subscribers and isolates
//!   failing callbacks ([`events`])
//! - **Engine** runs every detector on its own cancellable poller ([`engine`])
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use league_live_events::{DetectorKind, EngineConfig, EventApi, LiveClientApi, Topic};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let source = Arc::new(LiveClientApi::new(Duration::from_secs(2))?);
//!     let mut api = EventApi::new(source, EngineConfig::default());
//!
//!     api.subscribe(Topic::AnyMatchEvent, |notification| {
//!         if let Some(event) = notification.match_event() {
//!             println!("{}", event);
//!         }
//!         Ok(())
//!     });
//!
//!     api.start(DetectorKind::MatchEvents)?;
//!     tokio::signal::ctrl_c().await?;
//!     api.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod connectors;
pub mod engine;
pub mod events;
pub mod utils;
pub mod watchers;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use connectors::{LiveClientApi, SampleSource, SnapshotSource, SourceError};
pub use engine::{DetectorKind, EngineConfig, EngineError, EventApi};
pub use events::{Dispatcher, EventType, ItemSet, MatchEvent, Notification, SubscriptionId, Topic};

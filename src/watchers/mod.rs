//! Detectors and the loop that drives them.
//!
//! Each detector polls one fact from a [`SnapshotSource`](crate::connectors::SnapshotSource),
//! remembers the last value it observed and publishes a notification when the
//! value changes. Detectors are independent of each other: each runs on its
//! own [`Poller`] with its own interval and private state.

mod edge;
mod poller;
mod sequencer;

pub use edge::{ApiAvailability, Edge, EdgeDetector, ItemChange, LevelUp, PlayerStatus};
pub use poller::{Detector, Poller, PollerConfig};
pub use sequencer::{EventSequencer, SequencerState};

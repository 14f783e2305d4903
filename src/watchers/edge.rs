//! Edge detectors: notify only when a tracked fact changes.
//!
//! [`EdgeDetector`] holds the last known-good value of one fact. A tick
//! fetches the current value and, if it differs, publishes the notification
//! for that transition and records the new value. A failed fetch leaves the
//! recorded value untouched, so the next successful tick compares against
//! the last good value rather than an intermediate failure.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

use crate::connectors::{SnapshotSource, SourceError};
use crate::events::{Dispatcher, ItemSet, Notification};

use super::poller::Detector;

/// One observable fact and what its transitions mean.
#[async_trait]
pub trait Edge: Send + Sync + 'static {
    type Value: PartialEq + Send + Sync + 'static;

    fn name(&self) -> &'static str;

    /// Value assumed before the first successful fetch.
    fn initial(&self) -> Self::Value;

    async fn fetch(&self) -> Result<Self::Value, SourceError>;

    /// Builds the notification for a transition from `last` to `current`.
    fn transition(&self, last: &Self::Value, current: &Self::Value) -> Notification;
}

/// Stateful comparator around an [`Edge`].
pub struct EdgeDetector<E: Edge> {
    edge: E,
    last: E::Value,
    dispatcher: Arc<Dispatcher>,
}

impl<E: Edge> EdgeDetector<E> {
    /// Starts from [`Edge::initial`].
    pub fn new(edge: E, dispatcher: Arc<Dispatcher>) -> Self {
        let last = edge.initial();
        Self {
            edge,
            last,
            dispatcher,
        }
    }

    /// The last known-good value.
    pub fn last_value(&self) -> &E::Value {
        &self.last
    }
}

#[async_trait]
impl<E: Edge> Detector for EdgeDetector<E> {
    fn name(&self) -> &'static str {
        self.edge.name()
    }

    async fn tick(&mut self) -> Result<(), SourceError> {
        let current = self.edge.fetch().await?;
        if current == self.last {
            return Ok(());
        }

        let notification = self.edge.transition(&self.last, &current);
        debug!("[{}] Transition detected: {:?}", self.edge.name(), notification);

        self.last = current;
        self.dispatcher.publish(&notification);
        Ok(())
    }
}

// ========== Availability ==========

/// Tracks whether the live endpoint answers, i.e. a match is loaded.
pub struct ApiAvailability<S> {
    source: Arc<S>,
}

impl<S> ApiAvailability<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl<S: SnapshotSource> Edge for ApiAvailability<S> {
    type Value = bool;

    fn name(&self) -> &'static str {
        "api-loaded"
    }

    fn initial(&self) -> bool {
        false
    }

    async fn fetch(&self) -> Result<bool, SourceError> {
        self.source.is_player_present().await
    }

    fn transition(&self, _last: &bool, current: &bool) -> Notification {
        let timestamp = Utc::now();
        if *current {
            info!("[{}] Live client API loaded", self.name());
            Notification::ApiLoaded { timestamp }
        } else {
            info!("[{}] Live client API ended", self.name());
            Notification::ApiEnded { timestamp }
        }
    }
}

// ========== Alive / dead ==========

/// Tracks whether the tracked player is dead.
pub struct PlayerStatus<S> {
    source: Arc<S>,
    player: String,
}

impl<S> PlayerStatus<S> {
    pub fn new(source: Arc<S>, player: impl Into<String>) -> Self {
        Self {
            source,
            player: player.into(),
        }
    }
}

#[async_trait]
impl<S: SnapshotSource> Edge for PlayerStatus<S> {
    type Value = bool;

    fn name(&self) -> &'static str {
        "player-status"
    }

    fn initial(&self) -> bool {
        false
    }

    async fn fetch(&self) -> Result<bool, SourceError> {
        self.source.is_player_dead(&self.player).await
    }

    fn transition(&self, _last: &bool, current: &bool) -> Notification {
        let timestamp = Utc::now();
        if *current {
            Notification::PlayerDied { timestamp }
        } else {
            Notification::PlayerRespawned { timestamp }
        }
    }
}

// ========== Level ==========

/// Tracks the active player's level. Every distinct value fires once, so
/// skipped levels produce a single notification.
pub struct LevelUp<S> {
    source: Arc<S>,
}

impl<S> LevelUp<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl<S: SnapshotSource> Edge for LevelUp<S> {
    type Value = u32;

    fn name(&self) -> &'static str {
        "level-up"
    }

    fn initial(&self) -> u32 {
        1
    }

    async fn fetch(&self) -> Result<u32, SourceError> {
        self.source.current_level().await
    }

    fn transition(&self, last: &u32, current: &u32) -> Notification {
        Notification::LevelChanged {
            previous_level: *last,
            level: *current,
            timestamp: Utc::now(),
        }
    }
}

// ========== Items ==========

/// Tracks the tracked player's item names, ignoring slot order.
pub struct ItemChange<S> {
    source: Arc<S>,
    player: String,
}

impl<S> ItemChange<S> {
    pub fn new(source: Arc<S>, player: impl Into<String>) -> Self {
        Self {
            source,
            player: player.into(),
        }
    }
}

#[async_trait]
impl<S: SnapshotSource> Edge for ItemChange<S> {
    type Value = ItemSet;

    fn name(&self) -> &'static str {
        "items"
    }

    fn initial(&self) -> ItemSet {
        ItemSet::empty()
    }

    async fn fetch(&self) -> Result<ItemSet, SourceError> {
        self.source.current_items(&self.player).await
    }

    fn transition(&self, last: &ItemSet, current: &ItemSet) -> Notification {
        Notification::ItemsChanged {
            old_items: last.names().to_vec(),
            new_items: current.names().to_vec(),
            timestamp: Utc::now(),
        }
    }
}

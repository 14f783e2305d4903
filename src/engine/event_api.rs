use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::connectors::SnapshotSource;
use crate::events::{Dispatcher, Notification, SubscriptionId, Topic};
use crate::watchers::{
    ApiAvailability, EdgeDetector, EventSequencer, ItemChange, LevelUp, PlayerStatus, Poller,
};

use super::{DetectorKind, EngineConfig, EngineError};

/// Detection engine for one snapshot source.
///
/// Every detector kind runs on its own poller and can be started and stopped
/// independently. Detector state lives only as long as its poller: stopping a
/// kind and starting it again begins from the initial state.
pub struct EventApi<S: SnapshotSource> {
    source: Arc<S>,
    dispatcher: Arc<Dispatcher>,
    config: EngineConfig,
    tracked_player: Option<String>,
    pollers: HashMap<DetectorKind, Poller>,
}

impl<S: SnapshotSource> EventApi<S> {
    /// Creates an engine with every detector stopped and no subscribers.
    ///
    /// The tracked player starts as `config.tracked_player`.
    pub fn new(source: Arc<S>, config: EngineConfig) -> Self {
        let pollers = DetectorKind::all()
            .into_iter()
            .map(|kind| (kind, Poller::new(kind.name())))
            .collect();

        Self {
            source,
            dispatcher: Arc::new(Dispatcher::new()),
            tracked_player: config.tracked_player.clone(),
            config,
            pollers,
        }
    }

    /// Sets the player followed by the alive/dead and item detectors.
    ///
    /// Detectors that are already running keep the player they started with.
    pub fn set_tracked_player(&mut self, name: impl Into<String>) {
        let name = name.into();
        info!("[engine] Tracking player {}", name);
        self.tracked_player = Some(name);
    }

    /// The player new alive/dead and item detectors will follow.
    pub fn tracked_player(&self) -> Option<&str> {
        self.tracked_player.as_deref()
    }

    /// Starts `kind` with its configured interval.
    ///
    /// Returns `Ok(false)` if it was already running.
    pub fn start(&mut self, kind: DetectorKind) -> Result<bool, EngineError> {
        self.start_with_interval(kind, self.config.interval(kind))
    }

    /// Starts `kind` polling every `interval`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start_with_interval(
        &mut self,
        kind: DetectorKind,
        interval: Duration,
    ) -> Result<bool, EngineError> {
        let config = self.config.poller_config(interval);
        let source = Arc::clone(&self.source);
        let dispatcher = Arc::clone(&self.dispatcher);

        let started = match kind {
            DetectorKind::ApiAvailability => {
                let detector = EdgeDetector::new(ApiAvailability::new(source), dispatcher);
                self.poller(kind).start(config, detector)
            }
            DetectorKind::PlayerStatus => {
                let player = self.require_player(kind)?;
                let detector = EdgeDetector::new(PlayerStatus::new(source, player), dispatcher);
                self.poller(kind).start(config, detector)
            }
            DetectorKind::LevelUp => {
                let detector = EdgeDetector::new(LevelUp::new(source), dispatcher);
                self.poller(kind).start(config, detector)
            }
            DetectorKind::Items => {
                let player = self.require_player(kind)?;
                let detector = EdgeDetector::new(ItemChange::new(source, player), dispatcher);
                self.poller(kind).start(config, detector)
            }
            DetectorKind::MatchEvents => {
                let detector = EventSequencer::new(source, dispatcher);
                self.poller(kind).start(config, detector)
            }
        };

        Ok(started)
    }

    /// Requests `kind` to stop after its in-flight tick. Returns `false` if
    /// it was not running.
    pub fn stop(&mut self, kind: DetectorKind) -> bool {
        self.poller(kind).stop()
    }

    /// Requests every running detector to stop. Does not wait.
    pub fn stop_all(&mut self) {
        for poller in self.pollers.values_mut() {
            poller.stop();
        }
    }

    /// Whether `kind` is polling and has not been asked to stop.
    pub fn is_running(&self, kind: DetectorKind) -> bool {
        self.pollers.get(&kind).is_some_and(Poller::is_running)
    }

    /// Stops every detector and waits for in-flight ticks to finish.
    pub async fn shutdown(&mut self) {
        for kind in DetectorKind::all() {
            self.poller(kind).shutdown().await;
        }
        debug!("[engine] All detectors stopped");
    }

    /// Registers `handler` for `topic`. See [`Dispatcher::subscribe`].
    pub fn subscribe<F>(&self, topic: Topic, handler: F) -> SubscriptionId
    where
        F: Fn(&Notification) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.dispatcher.subscribe(topic, handler)
    }

    /// Removes a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.dispatcher.unsubscribe(id)
    }

    /// The dispatcher shared by every detector of this engine.
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    fn poller(&mut self, kind: DetectorKind) -> &mut Poller {
        self.pollers
            .entry(kind)
            .or_insert_with(|| Poller::new(kind.name()))
    }

    fn require_player(&self, kind: DetectorKind) -> Result<String, EngineError> {
        self.tracked_player
            .clone()
            .ok_or(EngineError::PlayerNotSet(kind))
    }
}

impl<S: SnapshotSource> std::fmt::Debug for EventApi<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let running: Vec<_> = DetectorKind::all()
            .into_iter()
            .filter(|kind| self.is_running(*kind))
            .collect();
        f.debug_struct("EventApi")
            .field("tracked_player", &self.tracked_player)
            .field("running", &running)
            .finish()
    }
}

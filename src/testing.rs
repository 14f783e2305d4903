//! Scripted snapshot source for unit tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::connectors::{SnapshotSource, SourceError};
use crate::events::{Dispatcher, ItemSet, MatchEvent, MatchEventKind, Notification, Topic};

/// Per-call responses for one fact. `None` entries are failures. Once the
/// script runs out, the last successful value is repeated.
pub(crate) struct Script<T> {
    steps: Mutex<VecDeque<Option<T>>>,
    last: Mutex<Option<T>>,
}

impl<T: Clone> Script<T> {
    pub(crate) fn new() -> Self {
        Self {
            steps: Mutex::new(VecDeque::new()),
            last: Mutex::new(None),
        }
    }

    pub(crate) fn push(&self, value: T) -> &Self {
        self.steps.lock().push_back(Some(value));
        self
    }

    pub(crate) fn fail(&self) -> &Self {
        self.steps.lock().push_back(None);
        self
    }

    fn has_steps(&self) -> bool {
        !self.steps.lock().is_empty()
    }

    fn next(&self) -> Result<T, SourceError> {
        match self.steps.lock().pop_front() {
            Some(Some(value)) => {
                *self.last.lock() = Some(value.clone());
                Ok(value)
            }
            Some(None) => Err(SourceError::Unavailable("scripted failure".to_string())),
            None => self
                .last
                .lock()
                .clone()
                .ok_or_else(|| SourceError::Unavailable("script exhausted".to_string())),
        }
    }
}

pub(crate) struct ScriptedSource {
    pub(crate) present: Script<bool>,
    pub(crate) dead: Script<bool>,
    pub(crate) level: Script<u32>,
    pub(crate) items: Script<ItemSet>,
    pub(crate) latest: Script<Option<MatchEvent>>,
    pub(crate) all: Script<Vec<MatchEvent>>,
    pub(crate) all_events_calls: AtomicUsize,
    newest_seen: Mutex<Option<u64>>,
}

impl ScriptedSource {
    pub(crate) fn new() -> Self {
        Self {
            present: Script::new(),
            dead: Script::new(),
            level: Script::new(),
            items: Script::new(),
            latest: Script::new(),
            all: Script::new(),
            all_events_calls: AtomicUsize::new(0),
            newest_seen: Mutex::new(None),
        }
    }

    /// Scripts one tick of the event endpoint holding events `0..=newest`.
    ///
    /// Unless `all` has scripted steps of its own, the full list is derived
    /// from the newest event most recently returned by `latest_event`.
    pub(crate) fn push_events_up_to(&self, newest: u64) {
        self.latest.push(Some(event(newest)));
    }

    pub(crate) fn all_events_calls(&self) -> usize {
        self.all_events_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnapshotSource for ScriptedSource {
    async fn is_player_present(&self) -> Result<bool, SourceError> {
        self.present.next()
    }

    async fn is_player_dead(&self, _name: &str) -> Result<bool, SourceError> {
        self.dead.next()
    }

    async fn current_level(&self) -> Result<u32, SourceError> {
        self.level.next()
    }

    async fn current_items(&self, _name: &str) -> Result<ItemSet, SourceError> {
        self.items.next()
    }

    async fn latest_event(&self) -> Result<Option<MatchEvent>, SourceError> {
        let latest = self.latest.next()?;
        if let Some(event) = &latest {
            *self.newest_seen.lock() = Some(event.sequence);
        }
        Ok(latest)
    }

    async fn all_events(&self) -> Result<Vec<MatchEvent>, SourceError> {
        self.all_events_calls.fetch_add(1, Ordering::SeqCst);
        if self.all.has_steps() {
            return self.all.next();
        }
        Ok(self
            .newest_seen
            .lock()
            .map(|newest| events(0..=newest))
            .unwrap_or_default())
    }
}

pub(crate) fn event(sequence: u64) -> MatchEvent {
    let kind = match sequence {
        0 => MatchEventKind::GameStart,
        1 => MatchEventKind::MinionsFirstSpawn,
        _ => MatchEventKind::ChampionKill {
            killer: "Alpha".to_string(),
            assisters: vec![],
            victim: format!("Victim{}", sequence),
        },
    };
    let name = match sequence {
        0 => "GameStart",
        1 => "MinionsSpawning",
        _ => "ChampionKill",
    };
    MatchEvent::new(sequence, sequence as f64 * 10.0, name, kind)
}

pub(crate) fn events(range: std::ops::RangeInclusive<u64>) -> Vec<MatchEvent> {
    range.map(event).collect()
}

/// Records every notification published under `topics`.
pub(crate) fn record(dispatcher: &Dispatcher, topics: &[Topic]) -> Arc<Mutex<Vec<Notification>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    for topic in topics {
        let log = Arc::clone(&log);
        dispatcher.subscribe(*topic, move |n| {
            log.lock().push(n.clone());
            Ok(())
        });
    }
    log
}

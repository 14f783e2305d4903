//! Gap-free, ordered delivery of numbered match events.
//!
//! Each tick only asks for the newest event. When it is exactly one past the
//! last delivered sequence number it is delivered directly; when events were
//! missed between ticks the full list is fetched and every event in
//! `(last delivered, newest]` is replayed, one notification each, through the
//! same delivery path. Subscribers cannot tell the two apart and always see
//! strictly increasing sequence numbers with no gaps or duplicates.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::connectors::{SnapshotSource, SourceError};
use crate::events::{Dispatcher, MatchEvent, Notification};

use super::poller::Detector;

/// Delivery progress of an [`EventSequencer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    /// Nothing delivered yet.
    Idle,
    /// Every event up to and including `last_delivered` has been delivered.
    Synced { last_delivered: u64 },
}

pub struct EventSequencer<S> {
    source: Arc<S>,
    dispatcher: Arc<Dispatcher>,
    state: SequencerState,
}

impl<S: SnapshotSource> EventSequencer<S> {
    /// Creates a sequencer that has delivered nothing yet.
    pub fn new(source: Arc<S>, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            source,
            dispatcher,
            state: SequencerState::Idle,
        }
    }

    /// Current delivery progress.
    pub fn state(&self) -> SequencerState {
        self.state
    }

    fn deliver(&self, event: MatchEvent) {
        debug!("[{}] #{} {}", self.name(), event.sequence, event);
        self.dispatcher.publish(&Notification::MatchEvent {
            event,
            timestamp: Utc::now(),
        });
    }

    /// Delivers every event of `events` numbered `first..=newest`, in order.
    fn catch_up(&self, events: Vec<MatchEvent>, first: u64, newest: u64) {
        let mut batch: Vec<MatchEvent> = events
            .into_iter()
            .filter(|e| (first..=newest).contains(&e.sequence))
            .collect();
        batch.sort_by_key(|e| e.sequence);
        batch.dedup_by_key(|e| e.sequence);

        let expected = newest - first + 1;
        if (batch.len() as u64) < expected {
            warn!(
                "[{}] Event list is missing {} of events {}..={}",
                self.name(),
                expected - batch.len() as u64,
                first,
                newest
            );
        }

        debug!(
            "[{}] Catching up on {} events ({}..={})",
            self.name(),
            batch.len(),
            first,
            newest
        );

        for event in batch {
            self.deliver(event);
        }
    }
}

#[async_trait]
impl<S: SnapshotSource> Detector for EventSequencer<S> {
    fn name(&self) -> &'static str {
        "match-events"
    }

    async fn tick(&mut self) -> Result<(), SourceError> {
        let Some(latest) = self.source.latest_event().await? else {
            return Ok(());
        };
        let newest = latest.sequence;

        match self.state {
            SequencerState::Synced { last_delivered } if newest == last_delivered => {
                return Ok(());
            }
            SequencerState::Synced { last_delivered } if newest < last_delivered => {
                info!(
                    "[{}] Event sequence went back from {} to {}, assuming a new match",
                    self.name(),
                    last_delivered,
                    newest
                );
                self.deliver(latest);
            }
            state => {
                let next = match state {
                    SequencerState::Idle => 0,
                    SequencerState::Synced { last_delivered } => last_delivered + 1,
                };

                if newest == next {
                    self.deliver(latest);
                } else {
                    let events = self.source.all_events().await?;
                    self.catch_up(events, next, newest);
                }
            }
        }

        self.state = SequencerState::Synced {
            last_delivered: newest,
        };
        Ok(())
    }
}

//! Notification taxonomy and dispatch.
//!
//! Raw snapshot data never reaches subscribers directly. Detectors turn what
//! they observe into [`Notification`]s, and the [`Dispatcher`] fans each one
//! out to the callbacks registered for its topics.

mod dispatcher;
mod match_events;
mod notifications;

pub use dispatcher::{DispatchReport, Dispatcher, Handler, SubscriptionId};
pub use match_events::{EventType, GameResult, MatchEvent, MatchEventKind};
pub use notifications::{ItemSet, Notification, Topic, NO_ITEM};

//! Notifications delivered to subscribers.
//!
//! Detectors never hand raw snapshot data to subscribers. Every observed
//! transition is turned into a [`Notification`] first, stamped with the time
//! the detector decided to emit it.

use chrono::{DateTime, Utc};

use super::match_events::{EventType, MatchEvent};

/// Placeholder name reported when the player holds no items.
pub const NO_ITEM: &str = "no_item";

/// Items held by one player at one instant.
///
/// Names are kept sorted, so two sets compare equal exactly when they hold the
/// same names the same number of times, independent of inventory slot. An
/// empty inventory is stored as the single name [`NO_ITEM`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemSet {
    names: Vec<String>,
}

impl ItemSet {
    /// Builds a set from item names in any order.
    pub fn from_names<I, T>(names: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Self::empty();
        }
        names.sort();
        Self { names }
    }

    /// The sentinel set `{"no_item"}`.
    pub fn empty() -> Self {
        Self {
            names: vec![NO_ITEM.to_string()],
        }
    }

    /// Whether this is the empty-inventory sentinel.
    pub fn is_empty(&self) -> bool {
        self.names.len() == 1 && self.names[0] == NO_ITEM
    }

    /// Sorted item names.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl Default for ItemSet {
    fn default() -> Self {
        Self::empty()
    }
}

/// Subscription key. Match events are published under
/// [`Topic::AnyMatchEvent`] and then under their specific subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    ApiLoaded,
    ApiEnded,
    PlayerDied,
    PlayerRespawned,
    LevelChanged,
    ItemsChanged,
    AnyMatchEvent,
    MatchEvent(EventType),
}

impl Topic {
    /// Every subscribable topic.
    pub fn all() -> Vec<Topic> {
        let mut topics = vec![
            Topic::ApiLoaded,
            Topic::ApiEnded,
            Topic::PlayerDied,
            Topic::PlayerRespawned,
            Topic::LevelChanged,
            Topic::ItemsChanged,
            Topic::AnyMatchEvent,
        ];
        topics.extend(EventType::KNOWN.into_iter().map(Topic::MatchEvent));
        topics.push(Topic::MatchEvent(EventType::Unknown));
        topics
    }
}

/// Primary notification enum - the only type subscribers ever receive.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    // ========== Availability ==========
    /// The local endpoint started answering: the player entered a match.
    /// Unrelated to the in-match `GameStart` event.
    ApiLoaded { timestamp: DateTime<Utc> },

    /// The local endpoint stopped answering: the match is over.
    ApiEnded { timestamp: DateTime<Utc> },

    // ========== Tracked player ==========
    PlayerDied { timestamp: DateTime<Utc> },

    PlayerRespawned { timestamp: DateTime<Utc> },

    /// The active player's level differs from the last observed one.
    LevelChanged {
        previous_level: u32,
        level: u32,
        timestamp: DateTime<Utc>,
    },

    /// The tracked player's item names changed (slot order is ignored).
    /// Either side is `["no_item"]` when the inventory is empty.
    ItemsChanged {
        old_items: Vec<String>,
        new_items: Vec<String>,
        timestamp: DateTime<Utc>,
    },

    // ========== Match events ==========
    MatchEvent {
        event: MatchEvent,
        timestamp: DateTime<Utc>,
    },
}

impl Notification {
    /// Topics this notification is published under, in delivery order.
    pub fn topics(&self) -> Vec<Topic> {
        match self {
            Notification::ApiLoaded { .. } => vec![Topic::ApiLoaded],
            Notification::ApiEnded { .. } => vec![Topic::ApiEnded],
            Notification::PlayerDied { .. } => vec![Topic::PlayerDied],
            Notification::PlayerRespawned { .. } => vec![Topic::PlayerRespawned],
            Notification::LevelChanged { .. } => vec![Topic::LevelChanged],
            Notification::ItemsChanged { .. } => vec![Topic::ItemsChanged],
            Notification::MatchEvent { event, .. } => {
                vec![Topic::AnyMatchEvent, Topic::MatchEvent(event.event_type())]
            }
        }
    }

    /// When the detector decided to emit this notification.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Notification::ApiLoaded { timestamp } => *timestamp,
            Notification::ApiEnded { timestamp } => *timestamp,
            Notification::PlayerDied { timestamp } => *timestamp,
            Notification::PlayerRespawned { timestamp } => *timestamp,
            Notification::LevelChanged { timestamp, .. } => *timestamp,
            Notification::ItemsChanged { timestamp, .. } => *timestamp,
            Notification::MatchEvent { timestamp, .. } => *timestamp,
        }
    }

    /// Returns the match event carried by this notification, if any.
    pub fn match_event(&self) -> Option<&MatchEvent> {
        match self {
            Notification::MatchEvent { event, .. } => Some(event),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MatchEventKind;

    #[test]
    fn test_item_set_ignores_slot_order() {
        let a = ItemSet::from_names(["Long Sword", "Doran's Blade", "Health Potion"]);
        let b = ItemSet::from_names(["Health Potion", "Long Sword", "Doran's Blade"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_item_set_counts_duplicates() {
        let one = ItemSet::from_names(["Long Sword", "Cloth Armor"]);
        let two = ItemSet::from_names(["Long Sword", "Long Sword", "Cloth Armor"]);
        assert_ne!(one, two);
    }

    #[test]
    fn test_empty_item_set_is_sentinel() {
        let empty = ItemSet::from_names(Vec::<String>::new());
        assert_eq!(empty.names(), [NO_ITEM.to_string()]);
        assert!(empty.is_empty());
        assert_eq!(empty, ItemSet::default());
        assert!(!ItemSet::from_names(["Long Sword"]).is_empty());
    }

    #[test]
    fn test_match_event_topics_generic_first() {
        let notification = Notification::MatchEvent {
            event: MatchEvent::new(0, 0.0, "GameStart", MatchEventKind::GameStart),
            timestamp: Utc::now(),
        };
        assert_eq!(
            notification.topics(),
            vec![Topic::AnyMatchEvent, Topic::MatchEvent(EventType::GameStart)]
        );
        assert!(notification.match_event().is_some());
    }

    #[test]
    fn test_all_topics_cover_every_subtype() {
        let topics = Topic::all();
        assert_eq!(topics.len(), 7 + 14);
        assert!(topics.contains(&Topic::MatchEvent(EventType::Unknown)));
    }
}

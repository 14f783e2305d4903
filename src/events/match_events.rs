//! Classified in-match events.
//!
//! The live client reports every match occurrence with a declared name and a
//! sequence number. Names are classified into a closed set of kinds here;
//! anything not recognised degrades to [`MatchEventKind::Unknown`] so delivery
//! never fails on a new or misspelled event name.

use std::fmt;

/// Subtype discriminant of a match event, used as a subscription key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    GameStart,
    MinionsFirstSpawn,
    FirstTurretKill,
    TurretKill,
    InhibKill,
    DragonKill,
    HeraldKill,
    BaronKill,
    ChampionKill,
    MultiKill,
    Ace,
    FirstBlood,
    GameEnd,
    Unknown,
}

impl EventType {
    /// The thirteen named subtypes, in declaration order.
    pub const KNOWN: [EventType; 13] = [
        EventType::GameStart,
        EventType::MinionsFirstSpawn,
        EventType::FirstTurretKill,
        EventType::TurretKill,
        EventType::InhibKill,
        EventType::DragonKill,
        EventType::HeraldKill,
        EventType::BaronKill,
        EventType::ChampionKill,
        EventType::MultiKill,
        EventType::Ace,
        EventType::FirstBlood,
        EventType::GameEnd,
    ];

    /// Classifies a declared event name as reported by the live client.
    pub fn from_event_name(name: &str) -> Self {
        match name {
            "GameStart" => EventType::GameStart,
            "MinionsSpawning" => EventType::MinionsFirstSpawn,
            "FirstBrick" => EventType::FirstTurretKill,
            "TurretKilled" => EventType::TurretKill,
            "InhibKilled" => EventType::InhibKill,
            "DragonKill" => EventType::DragonKill,
            "HeraldKill" => EventType::HeraldKill,
            "BaronKill" => EventType::BaronKill,
            "ChampionKill" => EventType::ChampionKill,
            "Multikill" => EventType::MultiKill,
            "Ace" => EventType::Ace,
            "FirstBlood" => EventType::FirstBlood,
            "GameEnd" => EventType::GameEnd,
            _ => EventType::Unknown,
        }
    }

    /// The live client's name for this subtype.
    pub fn event_name(&self) -> &'static str {
        match self {
            EventType::GameStart => "GameStart",
            EventType::MinionsFirstSpawn => "MinionsSpawning",
            EventType::FirstTurretKill => "FirstBrick",
            EventType::TurretKill => "TurretKilled",
            EventType::InhibKill => "InhibKilled",
            EventType::DragonKill => "DragonKill",
            EventType::HeraldKill => "HeraldKill",
            EventType::BaronKill => "BaronKill",
            EventType::ChampionKill => "ChampionKill",
            EventType::MultiKill => "Multikill",
            EventType::Ace => "Ace",
            EventType::FirstBlood => "FirstBlood",
            EventType::GameEnd => "GameEnd",
            EventType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Outcome of the match from the active player's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    Win,
    Lose,
}

impl GameResult {
    /// Anything other than `"Win"` counts as a loss.
    pub fn from_result(result: &str) -> Self {
        if result == "Win" {
            GameResult::Win
        } else {
            GameResult::Lose
        }
    }
}

/// Kind-specific payload of a match event.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchEventKind {
    GameStart,
    MinionsFirstSpawn,
    FirstTurretKill {
        killer: String,
    },
    TurretKill {
        killer: String,
        assisters: Vec<String>,
        turret: String,
    },
    InhibKill {
        killer: String,
        assisters: Vec<String>,
        inhibitor: String,
    },
    DragonKill {
        killer: String,
        assisters: Vec<String>,
        dragon_type: String,
        stolen: bool,
    },
    HeraldKill {
        killer: String,
        assisters: Vec<String>,
        stolen: bool,
    },
    BaronKill {
        killer: String,
        assisters: Vec<String>,
        stolen: bool,
    },
    ChampionKill {
        killer: String,
        assisters: Vec<String>,
        victim: String,
    },
    MultiKill {
        killer: String,
        kill_streak: u32,
    },
    Ace {
        acer: String,
        acing_team: String,
    },
    FirstBlood {
        recipient: String,
    },
    GameEnd {
        result: GameResult,
    },
    Unknown,
}

impl MatchEventKind {
    /// Returns the subscription discriminant for this payload.
    pub fn event_type(&self) -> EventType {
        match self {
            MatchEventKind::GameStart => EventType::GameStart,
            MatchEventKind::MinionsFirstSpawn => EventType::MinionsFirstSpawn,
            MatchEventKind::FirstTurretKill { .. } => EventType::FirstTurretKill,
            MatchEventKind::TurretKill { .. } => EventType::TurretKill,
            MatchEventKind::InhibKill { .. } => EventType::InhibKill,
            MatchEventKind::DragonKill { .. } => EventType::DragonKill,
            MatchEventKind::HeraldKill { .. } => EventType::HeraldKill,
            MatchEventKind::BaronKill { .. } => EventType::BaronKill,
            MatchEventKind::ChampionKill { .. } => EventType::ChampionKill,
            MatchEventKind::MultiKill { .. } => EventType::MultiKill,
            MatchEventKind::Ace { .. } => EventType::Ace,
            MatchEventKind::FirstBlood { .. } => EventType::FirstBlood,
            MatchEventKind::GameEnd { .. } => EventType::GameEnd,
            MatchEventKind::Unknown => EventType::Unknown,
        }
    }

    /// Returns the killer's name for kinds that have one.
    pub fn killer(&self) -> Option<&str> {
        match self {
            MatchEventKind::FirstTurretKill { killer }
            | MatchEventKind::TurretKill { killer, .. }
            | MatchEventKind::InhibKill { killer, .. }
            | MatchEventKind::DragonKill { killer, .. }
            | MatchEventKind::HeraldKill { killer, .. }
            | MatchEventKind::BaronKill { killer, .. }
            | MatchEventKind::ChampionKill { killer, .. }
            | MatchEventKind::MultiKill { killer, .. } => Some(killer),
            MatchEventKind::FirstBlood { recipient } => Some(recipient),
            MatchEventKind::Ace { acer, .. } => Some(acer),
            _ => None,
        }
    }

    /// Returns the assisting players, empty for kinds without assists.
    pub fn assisters(&self) -> &[String] {
        match self {
            MatchEventKind::TurretKill { assisters, .. }
            | MatchEventKind::InhibKill { assisters, .. }
            | MatchEventKind::DragonKill { assisters, .. }
            | MatchEventKind::HeraldKill { assisters, .. }
            | MatchEventKind::BaronKill { assisters, .. }
            | MatchEventKind::ChampionKill { assisters, .. } => assisters,
            _ => &[],
        }
    }
}

/// One numbered occurrence inside a match.
///
/// The sequence number is assigned by the live client and is never generated
/// locally. It is strictly increasing within a match and restarts when a new
/// match begins.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchEvent {
    pub sequence: u64,
    /// Elapsed match time in seconds.
    pub time_seconds: f64,
    /// Declared name as reported, kept even when it could not be classified.
    pub name: String,
    pub kind: MatchEventKind,
}

impl MatchEvent {
    /// Builds an event from its parts; `name` is the declared event name.
    pub fn new(
        sequence: u64,
        time_seconds: f64,
        name: impl Into<String>,
        kind: MatchEventKind,
    ) -> Self {
        Self {
            sequence,
            time_seconds,
            name: name.into(),
            kind,
        }
    }

    /// Subtype used to route this event to subscribers.
    pub fn event_type(&self) -> EventType {
        self.kind.event_type()
    }
}

impl fmt::Display for MatchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = self.time_seconds;
        match &self.kind {
            MatchEventKind::GameStart => write!(f, "The game started at {:.1}s", t),
            MatchEventKind::MinionsFirstSpawn => {
                write!(f, "First wave of minions spawned at {:.1}s", t)
            }
            MatchEventKind::FirstTurretKill { killer } => {
                write!(f, "The first turret was destroyed by {} at {:.1}s", killer, t)
            }
            MatchEventKind::TurretKill { killer, turret, .. } => {
                write!(f, "Turret {} was destroyed by {} at {:.1}s", turret, killer, t)
            }
            MatchEventKind::InhibKill { killer, inhibitor, .. } => {
                write!(f, "Inhibitor {} was destroyed by {} at {:.1}s", inhibitor, killer, t)
            }
            MatchEventKind::DragonKill {
                killer,
                dragon_type,
                stolen,
                ..
            } => write!(
                f,
                "A {} dragon was killed by {} at {:.1}s (stolen: {})",
                dragon_type, killer, t, stolen
            ),
            MatchEventKind::HeraldKill { killer, stolen, .. } => write!(
                f,
                "The herald was killed by {} at {:.1}s (stolen: {})",
                killer, t, stolen
            ),
            MatchEventKind::BaronKill { killer, stolen, .. } => write!(
                f,
                "Baron Nashor was killed by {} at {:.1}s (stolen: {})",
                killer, t, stolen
            ),
            MatchEventKind::ChampionKill { killer, victim, .. } => {
                write!(f, "{} was killed by {} at {:.1}s", victim, killer, t)
            }
            MatchEventKind::MultiKill { killer, kill_streak } => {
                write!(f, "A multikill ({}) by {} at {:.1}s", kill_streak, killer, t)
            }
            MatchEventKind::Ace { acing_team, .. } => {
                write!(f, "Team {} aced the opposing team at {:.1}s", acing_team, t)
            }
            MatchEventKind::FirstBlood { recipient } => {
                write!(f, "First blood for {} at {:.1}s", recipient, t)
            }
            MatchEventKind::GameEnd { result } => {
                write!(f, "The game ended at {:.1}s ({:?})", t, result)
            }
            MatchEventKind::Unknown => {
                write!(f, "An event of type {} occurred at {:.1}s", self.name, t)
            }
        }
    }
}

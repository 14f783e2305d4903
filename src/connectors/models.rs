//! Response types of the live client endpoint and their normalisation.
//!
//! Shared by [`LiveClientApi`](super::LiveClientApi) and
//! [`SampleSource`](super::SampleSource) so both decode identically.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;

use crate::events::{EventType, GameResult, ItemSet, MatchEvent, MatchEventKind};

use super::source::SourceError;

// ============ Response Types ============

/// Body of `/liveclientdata/eventdata`.
#[derive(Debug, Clone, Deserialize)]
pub struct EventData {
    #[serde(rename = "Events", default)]
    pub events: Vec<RawMatchEvent>,
}

/// One element of the `Events` array, before classification.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawMatchEvent {
    pub event_name: String,
    #[serde(rename = "EventID", alias = "EventId")]
    pub event_id: u64,
    #[serde(default)]
    pub event_time: f64,
    #[serde(default)]
    pub killer_name: String,
    #[serde(default)]
    pub assisters: Vec<String>,
    #[serde(default)]
    pub turret_killed: String,
    #[serde(default)]
    pub inhib_killed: String,
    #[serde(default)]
    pub dragon_type: String,
    #[serde(default, deserialize_with = "bool_or_string")]
    pub stolen: bool,
    #[serde(default)]
    pub victim_name: String,
    #[serde(default)]
    pub kill_streak: u32,
    #[serde(default)]
    pub acer: String,
    #[serde(default)]
    pub acing_team: String,
    #[serde(default)]
    pub recipient: String,
    #[serde(default)]
    pub result: String,
}

/// One element of `/liveclientdata/playerlist`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    #[serde(default)]
    pub summoner_name: String,
    #[serde(default)]
    pub riot_id: Option<String>,
    #[serde(default)]
    pub champion_name: String,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub is_dead: bool,
    #[serde(default)]
    pub respawn_timer: f64,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub scores: Scores,
    #[serde(default)]
    pub items: Vec<PlayerItem>,
}

impl Player {
    /// Matches either the legacy summoner name or the Riot ID.
    pub fn is_named(&self, name: &str) -> bool {
        self.summoner_name == name || self.riot_id.as_deref() == Some(name)
    }
}

/// Body of `/liveclientdata/playerscores`, also embedded in [`Player`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scores {
    #[serde(default)]
    pub kills: u32,
    #[serde(default)]
    pub deaths: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub creep_score: u32,
    #[serde(default)]
    pub ward_score: f64,
}

/// Body of `/liveclientdata/activeplayer`.
///
/// Abilities and runes are left out; only `level` is required.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivePlayerStats {
    pub level: u32,
    #[serde(default)]
    pub summoner_name: String,
    #[serde(default)]
    pub current_gold: f64,
    #[serde(default)]
    pub champion_stats: ChampionStats,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChampionStats {
    pub attack_damage: f64,
    pub ability_power: f64,
    pub attack_speed: f64,
    pub armor: f64,
    pub magic_resist: f64,
    pub current_health: f64,
    pub max_health: f64,
    pub move_speed: f64,
    pub resource_type: String,
    pub resource_value: f64,
    pub resource_max: f64,
}

/// One element of `/liveclientdata/playeritems`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerItem {
    pub display_name: String,
    #[serde(rename = "itemID", default)]
    pub item_id: u32,
    #[serde(default)]
    pub slot: u8,
    #[serde(default)]
    pub count: u32,
}

/// Body of `/liveclientdata/gamestats`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameStats {
    pub game_mode: String,
    pub game_time: f64,
    pub map_name: String,
    pub map_number: u32,
    pub map_terrain: String,
}

// ============ Normalisation ============

impl From<RawMatchEvent> for MatchEvent {
    fn from(raw: RawMatchEvent) -> Self {
        let kind = match EventType::from_event_name(&raw.event_name) {
            EventType::GameStart => MatchEventKind::GameStart,
            EventType::MinionsFirstSpawn => MatchEventKind::MinionsFirstSpawn,
            EventType::FirstTurretKill => MatchEventKind::FirstTurretKill {
                killer: raw.killer_name,
            },
            EventType::TurretKill => MatchEventKind::TurretKill {
                killer: raw.killer_name,
                assisters: raw.assisters,
                turret: raw.turret_killed,
            },
            EventType::InhibKill => MatchEventKind::InhibKill {
                killer: raw.killer_name,
                assisters: raw.assisters,
                inhibitor: raw.inhib_killed,
            },
            EventType::DragonKill => MatchEventKind::DragonKill {
                killer: raw.killer_name,
                assisters: raw.assisters,
                dragon_type: raw.dragon_type,
                stolen: raw.stolen,
            },
            EventType::HeraldKill => MatchEventKind::HeraldKill {
                killer: raw.killer_name,
                assisters: raw.assisters,
                stolen: raw.stolen,
            },
            EventType::BaronKill => MatchEventKind::BaronKill {
                killer: raw.killer_name,
                assisters: raw.assisters,
                stolen: raw.stolen,
            },
            EventType::ChampionKill => MatchEventKind::ChampionKill {
                killer: raw.killer_name,
                assisters: raw.assisters,
                victim: raw.victim_name,
            },
            EventType::MultiKill => MatchEventKind::MultiKill {
                killer: raw.killer_name,
                kill_streak: raw.kill_streak,
            },
            EventType::Ace => MatchEventKind::Ace {
                acer: raw.acer,
                acing_team: raw.acing_team,
            },
            EventType::FirstBlood => MatchEventKind::FirstBlood {
                recipient: raw.recipient,
            },
            EventType::GameEnd => MatchEventKind::GameEnd {
                result: GameResult::from_result(&raw.result),
            },
            EventType::Unknown => MatchEventKind::Unknown,
        };

        MatchEvent {
            sequence: raw.event_id,
            time_seconds: raw.event_time,
            name: raw.event_name,
            kind,
        }
    }
}

/// Parses a response body, labelling failures with `what`.
pub fn decode<T: DeserializeOwned>(body: &str, what: &str) -> Result<T, SourceError> {
    serde_json::from_str(body)
        .map_err(|e| SourceError::ParseError(format!("Failed to parse {}: {}", what, e)))
}

/// Decodes and classifies an `eventdata` body, in the order reported.
pub fn decode_events(body: &str) -> Result<Vec<MatchEvent>, SourceError> {
    let data: EventData = decode(body, "event data")?;
    Ok(data.events.into_iter().map(MatchEvent::from).collect())
}

/// Looks up the dead flag of `name` in a `playerlist` body.
pub fn decode_player_dead(body: &str, name: &str) -> Result<bool, SourceError> {
    let players: Vec<Player> = decode(body, "player list")?;
    players
        .iter()
        .find(|p| p.is_named(name))
        .map(|p| p.is_dead)
        .ok_or_else(|| SourceError::PlayerNotFound(name.to_string()))
}

/// Reads the active player's level from an `activeplayer` body.
pub fn decode_level(body: &str) -> Result<u32, SourceError> {
    let player: ActivePlayerStats = decode(body, "active player")?;
    Ok(player.level)
}

/// Normalises a `playeritems` body into an [`ItemSet`].
pub fn decode_items(body: &str) -> Result<ItemSet, SourceError> {
    let items: Vec<PlayerItem> = decode(body, "player items")?;
    Ok(ItemSet::from_names(items.into_iter().map(|i| i.display_name)))
}

/// The client reports `Stolen` as `"True"`/`"False"`; older samples use bools.
fn bool_or_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Bool(b) => Ok(b),
        serde_json::Value::String(s) => Ok(s.eq_ignore_ascii_case("true")),
        serde_json::Value::Null => Ok(false),
        other => Err(de::Error::custom(format!(
            "expected bool or string, found {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NO_ITEM;

    const EVENT_DATA: &str = r#"{
        "Events": [
            { "EventID": 0, "EventName": "GameStart", "EventTime": 0.03 },
            { "EventID": 1, "EventName": "MinionsSpawning", "EventTime": 65.0 },
            { "EventID": 2, "EventName": "DragonKill", "EventTime": 420.5,
              "DragonType": "Earth", "KillerName": "Graves", "Assisters": ["Thresh"],
              "Stolen": "True" },
            { "EventID": 3, "EventName": "Multikill", "EventTime": 501.0,
              "KillerName": "Graves", "KillStreak": 2 },
            { "EventID": 4, "EventName": "HordeKill", "EventTime": 530.0 },
            { "EventID": 5, "EventName": "GameEnd", "EventTime": 1800.0, "Result": "Win" }
        ]
    }"#;

    #[test]
    fn test_decode_events_classifies_each_kind() {
        let events = decode_events(EVENT_DATA).unwrap();
        assert_eq!(events.len(), 6);
        assert_eq!(
            events.iter().map(|e| e.sequence).collect::<Vec<_>>(),
            vec![0, 1, 2, 3, 4, 5]
        );
        assert_eq!(events[1].event_type(), EventType::MinionsFirstSpawn);
        assert_eq!(
            events[2].kind,
            MatchEventKind::DragonKill {
                killer: "Graves".to_string(),
                assisters: vec!["Thresh".to_string()],
                dragon_type: "Earth".to_string(),
                stolen: true,
            }
        );
        assert_eq!(
            events[3].kind,
            MatchEventKind::MultiKill {
                killer: "Graves".to_string(),
                kill_streak: 2,
            }
        );
        assert_eq!(events[4].kind, MatchEventKind::Unknown);
        assert_eq!(events[4].name, "HordeKill");
        assert_eq!(
            events[5].kind,
            MatchEventKind::GameEnd {
                result: GameResult::Win
            }
        );
    }

    #[test]
    fn test_stolen_accepts_bool_and_missing() {
        let events = decode_events(
            r#"{"Events": [
                {"EventID": 0, "EventName": "BaronKill", "EventTime": 1.0, "Stolen": false},
                {"EventID": 1, "EventName": "HeraldKill", "EventTime": 2.0}
            ]}"#,
        )
        .unwrap();
        assert!(matches!(events[0].kind, MatchEventKind::BaronKill { stolen: false, .. }));
        assert!(matches!(events[1].kind, MatchEventKind::HeraldKill { stolen: false, .. }));
    }

    #[test]
    fn test_empty_event_data() {
        assert!(decode_events(r#"{"Events": []}"#).unwrap().is_empty());
        assert!(decode_events("{}").unwrap().is_empty());
        assert!(matches!(
            decode_events("not json"),
            Err(SourceError::ParseError(_))
        ));
    }

    #[test]
    fn test_decode_player_dead() {
        let body = r#"[
            {"summonerName": "Alpha", "riotId": "Alpha#EUW", "isDead": false},
            {"summonerName": "Beta", "isDead": true}
        ]"#;
        assert!(!decode_player_dead(body, "Alpha").unwrap());
        assert!(!decode_player_dead(body, "Alpha#EUW").unwrap());
        assert!(decode_player_dead(body, "Beta").unwrap());
        assert!(matches!(
            decode_player_dead(body, "Gamma"),
            Err(SourceError::PlayerNotFound(name)) if name == "Gamma"
        ));
    }

    #[test]
    fn test_decode_level() {
        assert_eq!(decode_level(r#"{"level": 7, "currentGold": 512.0}"#).unwrap(), 7);
        assert!(decode_level(r#"{"currentGold": 512.0}"#).is_err());
    }

    #[test]
    fn test_decode_player_list() {
        let body = r#"[{
            "summonerName": "Alpha", "championName": "Graves", "team": "ORDER",
            "position": "JUNGLE", "level": 9, "isDead": true, "respawnTimer": 21.5,
            "isBot": false,
            "scores": {"kills": 4, "deaths": 1, "assists": 6, "creepScore": 88, "wardScore": 7.5},
            "items": [{"displayName": "Long Sword", "itemID": 1036, "slot": 2, "count": 1}]
        }]"#;
        let players: Vec<Player> = decode(body, "player list").unwrap();
        let alpha = &players[0];
        assert_eq!(alpha.champion_name, "Graves");
        assert_eq!(alpha.level, 9);
        assert!(alpha.is_dead);
        assert_eq!(alpha.respawn_timer, 21.5);
        assert_eq!(alpha.scores.creep_score, 88);
        assert_eq!(alpha.scores.ward_score, 7.5);
        assert_eq!(alpha.items[0].item_id, 1036);
        assert_eq!(alpha.items[0].slot, 2);
        assert_eq!(alpha.items[0].count, 1);
    }

    #[test]
    fn test_decode_active_player_stats() {
        let body = r#"{
            "summonerName": "Alpha", "level": 11, "currentGold": 1337.5,
            "abilities": {}, "fullRunes": {},
            "championStats": {"attackDamage": 140.0, "armor": 62.5, "maxHealth": 1800.0,
                              "resourceType": "MANA", "resourceValue": 300.0}
        }"#;
        let stats: ActivePlayerStats = decode(body, "active player").unwrap();
        assert_eq!(stats.level, 11);
        assert_eq!(stats.current_gold, 1337.5);
        assert_eq!(stats.champion_stats.attack_damage, 140.0);
        assert_eq!(stats.champion_stats.resource_type, "MANA");
        assert_eq!(stats.champion_stats.ability_power, 0.0);
    }

    #[test]
    fn test_decode_game_stats() {
        let body = r#"{"gameMode": "CLASSIC", "gameTime": 612.25,
                       "mapName": "Map11", "mapNumber": 11, "mapTerrain": "Infernal"}"#;
        let game: GameStats = decode(body, "game stats").unwrap();
        assert_eq!(game.game_mode, "CLASSIC");
        assert_eq!(game.game_time, 612.25);
        assert_eq!(game.map_number, 11);
        assert_eq!(game.map_terrain, "Infernal");
    }

    #[test]
    fn test_decode_scores() {
        let scores: Scores =
            decode(r#"{"kills": 2, "deaths": 3, "assists": 4}"#, "player scores").unwrap();
        assert_eq!(
            scores,
            Scores {
                kills: 2,
                deaths: 3,
                assists: 4,
                creep_score: 0,
                ward_score: 0.0,
            }
        );
    }

    #[test]
    fn test_decode_items() {
        let body = r#"[
            {"displayName": "Long Sword", "itemID": 1036, "slot": 1, "count": 1},
            {"displayName": "Doran's Blade", "itemID": 1055, "slot": 0, "count": 1}
        ]"#;
        let items = decode_items(body).unwrap();
        assert_eq!(
            items.names(),
            ["Doran's Blade".to_string(), "Long Sword".to_string()]
        );

        let empty = decode_items("[]").unwrap();
        assert_eq!(empty.names(), [NO_ITEM.to_string()]);
    }
}

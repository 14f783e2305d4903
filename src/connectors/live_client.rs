//! HTTPS client for the game's local live client data endpoint.
//!
//! The endpoint only exists while a match is loaded and serves a self-signed
//! certificate on localhost, so certificate validation is disabled.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::events::{ItemSet, MatchEvent};

use super::models::{
    decode, decode_events, decode_items, decode_level, decode_player_dead, ActivePlayerStats,
    GameStats, Player, Scores,
};
use super::source::{SnapshotSource, SourceError};

/// Default endpoint of the live client data API.
pub const DEFAULT_BASE_URL: &str = "https://127.0.0.1:2999";

const ACTIVE_PLAYER_NAME: &str = "/liveclientdata/activeplayername";
const ACTIVE_PLAYER: &str = "/liveclientdata/activeplayer";
const PLAYER_LIST: &str = "/liveclientdata/playerlist";
const PLAYER_ITEMS: &str = "/liveclientdata/playeritems";
const PLAYER_SCORES: &str = "/liveclientdata/playerscores";
const GAME_STATS: &str = "/liveclientdata/gamestats";
const EVENT_DATA: &str = "/liveclientdata/eventdata";

/// Live client API client implementing [`SnapshotSource`].
#[derive(Clone)]
pub struct LiveClientApi {
    client: Client,
    base_url: String,
}

impl LiveClientApi {
    /// Creates a client for the default endpoint.
    pub fn new(timeout: Duration) -> Result<Self, SourceError> {
        Self::with_base_url(DEFAULT_BASE_URL.to_string(), timeout)
    }

    /// Creates a client for a custom endpoint.
    pub fn with_base_url(base_url: String, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(true)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL with any trailing slash removed.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the active player's name as reported by the client.
    pub async fn active_player_name(&self) -> Result<String, SourceError> {
        let body = self.get_text(ACTIVE_PLAYER_NAME, &[]).await?;
        // The body is a JSON string; tolerate a bare name as well.
        let name = decode::<String>(&body, "active player name")
            .unwrap_or_else(|_| body.trim().to_string());
        Ok(name)
    }

    // ========== Data queries ==========

    /// Gold, level and champion stats of the active player.
    pub async fn active_player_stats(&self) -> Result<ActivePlayerStats, SourceError> {
        let body = self.get_text(ACTIVE_PLAYER, &[]).await?;
        decode(&body, "active player")
    }

    /// Every player in the match.
    pub async fn all_players(&self) -> Result<Vec<Player>, SourceError> {
        let body = self.get_text(PLAYER_LIST, &[]).await?;
        decode(&body, "player list")
    }

    /// One player by summoner name or Riot ID.
    pub async fn player(&self, name: &str) -> Result<Player, SourceError> {
        self.all_players()
            .await?
            .into_iter()
            .find(|p| p.is_named(name))
            .ok_or_else(|| SourceError::PlayerNotFound(name.to_string()))
    }

    /// Kills, deaths, assists, creep and ward score of one player.
    pub async fn player_scores(&self, name: &str) -> Result<Scores, SourceError> {
        let body = self.get_text(PLAYER_SCORES, &[("summonerName", name)]).await?;
        decode(&body, "player scores")
    }

    /// Mode, elapsed time and map of the current match.
    pub async fn game_stats(&self) -> Result<GameStats, SourceError> {
        let body = self.get_text(GAME_STATS, &[]).await?;
        decode(&body, "game stats")
    }

    async fn get_text(&self, path: &str, query: &[(&str, &str)]) -> Result<String, SourceError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    SourceError::Unavailable(e.to_string())
                } else {
                    SourceError::RequestFailed(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(SourceError::Status { status, message });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl SnapshotSource for LiveClientApi {
    async fn is_player_present(&self) -> Result<bool, SourceError> {
        let url = format!("{}{}", self.base_url, ACTIVE_PLAYER_NAME);
        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) => {
                debug!("Live client not reachable: {}", e);
                Ok(false)
            }
        }
    }

    async fn is_player_dead(&self, name: &str) -> Result<bool, SourceError> {
        let body = self.get_text(PLAYER_LIST, &[]).await?;
        decode_player_dead(&body, name)
    }

    async fn current_level(&self) -> Result<u32, SourceError> {
        let body = self.get_text(ACTIVE_PLAYER, &[]).await?;
        decode_level(&body)
    }

    async fn current_items(&self, name: &str) -> Result<ItemSet, SourceError> {
        let body = self.get_text(PLAYER_ITEMS, &[("summonerName", name)]).await?;
        decode_items(&body)
    }

    async fn latest_event(&self) -> Result<Option<MatchEvent>, SourceError> {
        let body = self.get_text(EVENT_DATA, &[]).await?;
        Ok(decode_events(&body)?.pop())
    }

    async fn all_events(&self) -> Result<Vec<MatchEvent>, SourceError> {
        let body = self.get_text(EVENT_DATA, &[]).await?;
        decode_events(&body)
    }
}

impl std::fmt::Debug for LiveClientApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveClientApi")
            .field("base_url", &self.base_url)
            .finish()
    }
}

//! League Live Events - Main Entry Point
//!
//! Polls the game client (or a directory of captured responses), logs every
//! notification and runs until Ctrl+C.

use std::sync::Arc;
use tracing::{info, warn};

use league_live_events::connectors::{LiveClientApi, SampleSource, SnapshotSource};
use league_live_events::engine::{DetectorKind, EngineConfig, EventApi};
use league_live_events::events::{Notification, Topic};
use league_live_events::utils::init_telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: No .env file found or error loading it: {}", e);
    }

    init_telemetry();

    info!("League Live Events starting");

    let config = EngineConfig::from_env();

    match config.samples_dir.clone() {
        Some(dir) => {
            info!("Reading snapshots from {}", dir.display());
            let source = Arc::new(SampleSource::new(dir));
            let player = config.tracked_player.clone();
            run(source, config, player).await
        }
        None => {
            let source = Arc::new(LiveClientApi::with_base_url(
                config.base_url.clone(),
                config.request_timeout,
            )?);
            info!("Polling live client at {}", source.base_url());
            match source.game_stats().await {
                Ok(game) => info!(
                    "In {} on {} at {:.0}s",
                    game.game_mode, game.map_name, game.game_time
                ),
                Err(e) => info!("No match loaded yet: {}", e),
            }
            let player = match config.tracked_player.clone() {
                Some(player) => Some(player),
                None => match source.active_player_name().await {
                    Ok(name) => {
                        info!("Detected active player {}", name);
                        Some(name)
                    }
                    Err(e) => {
                        warn!("Could not detect the active player: {}", e);
                        None
                    }
                },
            };
            run(source, config, player).await
        }
    }
}

async fn run<S: SnapshotSource>(
    source: Arc<S>,
    config: EngineConfig,
    player: Option<String>,
) -> anyhow::Result<()> {
    let mut api = EventApi::new(source, config);

    match player {
        Some(player) => api.set_tracked_player(player),
        None => warn!(
            "No tracked player, set LIVE_CLIENT_PLAYER to enable death and item notifications"
        ),
    }

    for topic in Topic::all() {
        // Subtype topics would log every match event a second time.
        if matches!(topic, Topic::MatchEvent(_)) {
            continue;
        }
        api.subscribe(topic, |notification| {
            log_notification(notification);
            Ok(())
        });
    }

    for kind in DetectorKind::all() {
        if kind.needs_player() && api.tracked_player().is_none() {
            continue;
        }
        api.start(kind)?;
    }

    info!("Detectors started. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received");
    api.shutdown().await;
    info!("All detectors stopped. Shutting down.");
    Ok(())
}

fn log_notification(notification: &Notification) {
    let at = notification.timestamp().format("%H:%M:%S%.3f");
    match notification {
        Notification::ApiLoaded { .. } => info!("[notify] {} Game loaded", at),
        Notification::ApiEnded { .. } => info!("[notify] {} Game ended", at),
        Notification::PlayerDied { .. } => info!("[notify] {} Player died", at),
        Notification::PlayerRespawned { .. } => info!("[notify] {} Player respawned", at),
        Notification::LevelChanged {
            previous_level,
            level,
            ..
        } => info!("[notify] {} Level {} -> {}", at, previous_level, level),
        Notification::ItemsChanged {
            old_items,
            new_items,
            ..
        } => info!("[notify] {} Items {:?} -> {:?}", at, old_items, new_items),
        Notification::MatchEvent { event, .. } => {
            info!("[notify] {} #{} {}", at, event.sequence, event)
        }
    }
}

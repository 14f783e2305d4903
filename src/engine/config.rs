use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use crate::connectors::DEFAULT_BASE_URL;
use crate::watchers::PollerConfig;

use super::DetectorKind;

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub api_interval: Duration,
    pub status_interval: Duration,
    pub level_interval: Duration,
    pub items_interval: Duration,
    pub events_interval: Duration,
    /// Consecutive failed ticks before a poller logs a warning.
    pub max_consecutive_failures: u32,
    /// Base URL of the live client endpoint.
    pub base_url: String,
    pub request_timeout: Duration,
    /// Player whose alive/dead status and items are tracked.
    pub tracked_player: Option<String>,
    /// When set, snapshots are read from this directory instead of the live client.
    pub samples_dir: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            api_interval: DetectorKind::ApiAvailability.default_interval(),
            status_interval: DetectorKind::PlayerStatus.default_interval(),
            level_interval: DetectorKind::LevelUp.default_interval(),
            items_interval: DetectorKind::Items.default_interval(),
            events_interval: DetectorKind::MatchEvents.default_interval(),
            max_consecutive_failures: 3,
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(2),
            tracked_player: None,
            samples_dir: None,
        }
    }
}

impl EngineConfig {
    /// Builds a config from `LIVE_CLIENT_*` and `LIVE_EVENTS_*` variables.
    ///
    /// Unset variables keep their defaults; invalid ones are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = non_empty(lookup("LIVE_CLIENT_URL")) {
            config.base_url = url;
        }
        config.tracked_player = non_empty(lookup("LIVE_CLIENT_PLAYER"));
        config.samples_dir = non_empty(lookup("LIVE_CLIENT_SAMPLES_DIR")).map(PathBuf::from);

        let timeout_key = "LIVE_CLIENT_TIMEOUT_MS";
        if let Some(timeout) = parse_millis(timeout_key, lookup(timeout_key)) {
            config.request_timeout = timeout;
        }

        for kind in DetectorKind::all() {
            let key = format!("LIVE_EVENTS_{}_INTERVAL_MS", kind.env_key());
            if let Some(interval) = parse_millis(&key, lookup(&key)) {
                *config.interval_mut(kind) = interval;
            }
        }

        if let Some(raw) = lookup("LIVE_EVENTS_MAX_FAILURES") {
            match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => config.max_consecutive_failures = n,
                _ => warn!(
                    "[config] Invalid LIVE_EVENTS_MAX_FAILURES {:?}, using {}",
                    raw, config.max_consecutive_failures
                ),
            }
        }

        config
    }

    /// Configured poll interval for `kind`.
    pub fn interval(&self, kind: DetectorKind) -> Duration {
        match kind {
            DetectorKind::ApiAvailability => self.api_interval,
            DetectorKind::PlayerStatus => self.status_interval,
            DetectorKind::LevelUp => self.level_interval,
            DetectorKind::Items => self.items_interval,
            DetectorKind::MatchEvents => self.events_interval,
        }
    }

    fn interval_mut(&mut self, kind: DetectorKind) -> &mut Duration {
        match kind {
            DetectorKind::ApiAvailability => &mut self.api_interval,
            DetectorKind::PlayerStatus => &mut self.status_interval,
            DetectorKind::LevelUp => &mut self.level_interval,
            DetectorKind::Items => &mut self.items_interval,
            DetectorKind::MatchEvents => &mut self.events_interval,
        }
    }

    pub(crate) fn poller_config(&self, interval: Duration) -> PollerConfig {
        PollerConfig {
            interval,
            max_consecutive_failures: self.max_consecutive_failures,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_millis(key: &str, raw: Option<String>) -> Option<Duration> {
    let raw = raw?;
    match raw.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Some(Duration::from_millis(ms)),
        _ => {
            warn!("[config] Invalid {} {:?}, keeping default", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> EngineConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EngineConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.interval(DetectorKind::ApiAvailability).as_millis(), 1000);
        assert_eq!(config.interval(DetectorKind::MatchEvents).as_millis(), 100);
        assert_eq!(config.max_consecutive_failures, 3);
        assert_eq!(config.base_url, "https://127.0.0.1:2999");
        assert_eq!(config.request_timeout, Duration::from_secs(2));
        assert!(config.tracked_player.is_none());
        assert!(config.samples_dir.is_none());
    }

    #[test]
    fn test_empty_environment_matches_default() {
        let config = config_from(&[]);
        for kind in DetectorKind::all() {
            assert_eq!(config.interval(kind), kind.default_interval());
        }
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_reads_every_variable() {
        let config = config_from(&[
            ("LIVE_CLIENT_URL", "https://localhost:3000"),
            ("LIVE_CLIENT_PLAYER", "Faker"),
            ("LIVE_CLIENT_SAMPLES_DIR", "/tmp/samples"),
            ("LIVE_CLIENT_TIMEOUT_MS", "500"),
            ("LIVE_EVENTS_API_INTERVAL_MS", "2000"),
            ("LIVE_EVENTS_STATUS_INTERVAL_MS", "250"),
            ("LIVE_EVENTS_LEVEL_INTERVAL_MS", "300"),
            ("LIVE_EVENTS_ITEMS_INTERVAL_MS", "400"),
            ("LIVE_EVENTS_EVENTS_INTERVAL_MS", "50"),
            ("LIVE_EVENTS_MAX_FAILURES", "10"),
        ]);

        assert_eq!(config.base_url, "https://localhost:3000");
        assert_eq!(config.tracked_player.as_deref(), Some("Faker"));
        assert_eq!(config.samples_dir, Some(PathBuf::from("/tmp/samples")));
        assert_eq!(config.request_timeout, Duration::from_millis(500));
        assert_eq!(config.api_interval, Duration::from_millis(2000));
        assert_eq!(config.status_interval, Duration::from_millis(250));
        assert_eq!(config.level_interval, Duration::from_millis(300));
        assert_eq!(config.items_interval, Duration::from_millis(400));
        assert_eq!(config.events_interval, Duration::from_millis(50));
        assert_eq!(config.max_consecutive_failures, 10);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("LIVE_CLIENT_TIMEOUT_MS", "soon"),
            ("LIVE_EVENTS_LEVEL_INTERVAL_MS", "0"),
            ("LIVE_EVENTS_EVENTS_INTERVAL_MS", "-5"),
            ("LIVE_EVENTS_MAX_FAILURES", "0"),
        ]);

        assert_eq!(config.request_timeout, Duration::from_secs(2));
        assert_eq!(config.level_interval, Duration::from_millis(100));
        assert_eq!(config.events_interval, Duration::from_millis(100));
        assert_eq!(config.max_consecutive_failures, 3);
    }

    #[test]
    fn test_blank_strings_are_unset() {
        let config = config_from(&[("LIVE_CLIENT_PLAYER", "  "), ("LIVE_CLIENT_URL", "")]);
        assert!(config.tracked_player.is_none());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_poller_config_carries_failure_threshold() {
        let config = EngineConfig {
            max_consecutive_failures: 7,
            ..EngineConfig::default()
        };
        let poller = config.poller_config(Duration::from_millis(40));
        assert_eq!(poller.interval, Duration::from_millis(40));
        assert_eq!(poller.max_consecutive_failures, 7);
    }
}

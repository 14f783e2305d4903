//! Structured logging setup.
//!
//! Log lines from the engine are tagged with the detector that produced them
//! (`[level-up] ...`, `[match-events] ...`), so one detector can be followed
//! with a plain grep. Verbosity comes from `RUST_LOG`.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "info,league_live_events=debug";

/// Installs a compact human-readable subscriber.
///
/// Example `RUST_LOG` values:
/// - `info` hides per-tick transitions and catch-up details
/// - `league_live_events=trace,reqwest=warn`
///
/// Does nothing if a global subscriber is already installed.
pub fn init_telemetry() {
    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
}

/// Installs a JSON subscriber for log collection.
pub fn init_telemetry_json() {
    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().json().with_span_events(FmtSpan::CLOSE))
        .try_init();
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }

    #[test]
    fn test_second_init_is_harmless() {
        init_telemetry();
        init_telemetry();
        init_telemetry_json();
    }
}

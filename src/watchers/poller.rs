//! Fixed-interval driver for one detector.
//!
//! Each poller owns its detector and runs it on its own task. A tick fetches
//! and decides; the loop then waits until `tick start + interval` before the
//! next tick, so fetches never start closer together than the interval no
//! matter how long a fetch took. A slow fetch simply makes the loop run
//! back-to-back.
//!
//! Cancellation is only observed between ticks: a tick's compare-and-update
//! always completes once started.

use async_trait::async_trait;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::connectors::SourceError;

/// One periodic detection step with private state.
#[async_trait]
pub trait Detector: Send + 'static {
    /// Short name used to tag log lines.
    fn name(&self) -> &'static str;

    /// Fetches once, compares against recorded state and publishes any
    /// resulting notifications. On error, recorded state must be unchanged.
    async fn tick(&mut self) -> Result<(), SourceError>;
}

/// Configuration for a single poller.
#[derive(Debug, Clone, Copy)]
pub struct PollerConfig {
    /// Minimum time between the starts of two consecutive ticks.
    pub interval: Duration,
    /// Consecutive failed ticks before the failure is logged as a warning.
    pub max_consecutive_failures: u32,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(100),
            max_consecutive_failures: 3,
        }
    }
}

/// Cancellable background loop around a [`Detector`].
pub struct Poller {
    name: &'static str,
    cancel: Option<CancellationToken>,
    handle: Option<JoinHandle<()>>,
}

impl Poller {
    /// Creates an idle poller; `name` tags its log lines.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            cancel: None,
            handle: None,
        }
    }

    /// Log tag of this poller.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns whether a loop is running and has not been asked to stop.
    pub fn is_running(&self) -> bool {
        let not_cancelled = self.cancel.as_ref().is_some_and(|c| !c.is_cancelled());
        let alive = self.handle.as_ref().is_some_and(|h| !h.is_finished());
        not_cancelled && alive
    }

    /// Spawns the polling loop for `detector`.
    ///
    /// Returns `false` without spawning if this poller is already running.
    /// If a previous loop was stopped but is still finishing its last tick,
    /// the new loop waits for it first, so two loops never overlap.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start<D: Detector>(&mut self, config: PollerConfig, detector: D) -> bool {
        if self.is_running() {
            debug!("[{}] Poller already running, ignoring start", self.name);
            return false;
        }

        let cancel = CancellationToken::new();
        let previous = self.handle.take();
        let loop_cancel = cancel.clone();
        let name = self.name;

        let handle = tokio::spawn(async move {
            if let Some(previous) = previous {
                if let Err(e) = previous.await {
                    if e.is_panic() {
                        error!("[{}] Previous poller task panicked: {}", name, e);
                    }
                }
            }
            run(detector, config, loop_cancel).await;
        });

        self.cancel = Some(cancel);
        self.handle = Some(handle);
        true
    }

    /// Requests the loop to stop after its in-flight tick, if any.
    ///
    /// Returns `false` if the poller was not running.
    pub fn stop(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        if let Some(cancel) = &self.cancel {
            cancel.cancel();
        }
        info!("[{}] Stop requested", self.name);
        true
    }

    /// Stops the loop and waits for its last tick to finish.
    pub async fn shutdown(&mut self) {
        self.stop();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                if e.is_panic() {
                    error!("[{}] Poller task panicked: {}", self.name, e);
                }
            }
        }
        self.cancel = None;
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        if let Some(cancel) = &self.cancel {
            cancel.cancel();
        }
    }
}

impl std::fmt::Debug for Poller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Poller")
            .field("name", &self.name)
            .field("is_running", &self.is_running())
            .finish()
    }
}

async fn run<D: Detector>(mut detector: D, config: PollerConfig, cancel: CancellationToken) {
    let name = detector.name();
    info!(
        "[{}] Poller starting (every {}ms)",
        name,
        config.interval.as_millis()
    );

    let mut consecutive_failures: u32 = 0;

    while !cancel.is_cancelled() {
        let tick_end = Instant::now() + config.interval;

        match detector.tick().await {
            Ok(()) => {
                if consecutive_failures >= config.max_consecutive_failures {
                    info!(
                        "[{}] Snapshot source recovered after {} failed ticks",
                        name, consecutive_failures
                    );
                }
                consecutive_failures = 0;
            }
            Err(e) => {
                consecutive_failures = consecutive_failures.saturating_add(1);
                if consecutive_failures == config.max_consecutive_failures {
                    warn!(
                        "[{}] {} consecutive failed ticks, last error: {}",
                        name, consecutive_failures, e
                    );
                } else {
                    debug!(
                        "[{}] Tick skipped (attempt {}): {}",
                        name, consecutive_failures, e
                    );
                }
            }
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            () = sleep_until(tick_end) => {}
        }
    }

    info!("[{}] Poller stopped", name);
}

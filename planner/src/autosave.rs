//! Background autosave
//!
//! Runs a save callback on a fixed interval in a tokio task while the
//! interaction loop keeps the foreground. The task is stopped explicitly
//! with a bounded wait, or implicitly when the scheduler is dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Shortest accepted interval; tokio rejects a zero period
const MIN_INTERVAL: Duration = Duration::from_millis(10);

/// Callback invoked on every autosave tick; returns whether the save succeeded
pub type SaveFn = Arc<dyn Fn() -> bool + Send + Sync>;

/// Periodically invokes a save callback in the background
#[derive(Default)]
pub struct AutosaveScheduler {
    handle: Option<JoinHandle<()>>,
    shutdown_tx: Option<watch::Sender<bool>>,
}

impl AutosaveScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the background task is alive
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Start saving every `interval`
    ///
    /// Returns `false` without doing anything if already running. Intervals
    /// shorter than 10ms are raised to 10ms. Must be called from within a
    /// tokio runtime.
    pub fn start(&mut self, interval: Duration, save_fn: SaveFn) -> bool {
        debug!(?interval, "AutosaveScheduler::start: called");
        if self.is_running() {
            debug!("AutosaveScheduler::start: already running");
            return false;
        }
        if interval < MIN_INTERVAL {
            warn!(?interval, min = ?MIN_INTERVAL, "Autosave interval too short, using minimum");
        }
        let interval = interval.max(MIN_INTERVAL);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        self.handle = Some(tokio::spawn(autosave_loop(interval, save_fn, shutdown_rx)));
        self.shutdown_tx = Some(shutdown_tx);

        info!(interval_secs = interval.as_secs_f64(), "Autosave started");
        true
    }

    /// Signal the task to stop and wait up to `timeout` for it to finish
    ///
    /// A save already in progress is never interrupted. Returns `true` if
    /// the task finished within the timeout (or was not running); on
    /// timeout the task is left to finish on its own.
    pub async fn stop(&mut self, timeout: Duration) -> bool {
        debug!(?timeout, "AutosaveScheduler::stop: called");
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(true);
        }

        let Some(handle) = self.handle.take() else {
            debug!("AutosaveScheduler::stop: not running");
            return true;
        };

        match tokio::time::timeout(timeout, handle).await {
            Ok(Ok(())) => {
                info!("Autosave stopped");
                true
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Autosave task ended abnormally");
                true
            }
            Err(_) => {
                warn!(?timeout, "Autosave did not stop in time, detaching");
                false
            }
        }
    }
}

async fn autosave_loop(interval: Duration, save_fn: SaveFn, mut shutdown_rx: watch::Receiver<bool>) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // First tick completes immediately
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    debug!("autosave_loop: shutdown requested");
                    break;
                }
                continue;
            }
        }

        let save = Arc::clone(&save_fn);
        match tokio::task::spawn_blocking(move || save()).await {
            Ok(true) => debug!("autosave_loop: saved"),
            Ok(false) => warn!("Autosave failed, will retry next interval"),
            Err(e) => warn!(error = %e, "Autosave callback panicked, will retry next interval"),
        }

        if *shutdown_rx.borrow() {
            break;
        }
    }
}

//! Pause/resume control shared between the orchestrator loop and the
//! admin surface.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::info;

/// Cloneable handle to the orchestrator's pause flag.
///
/// All clones share one flag. The loop reads it once at the top of
/// each cycle, so a change takes effect on the next cycle. The handle
/// can also cut the inter-cycle sleep short with [`request_cycle`].
///
/// [`request_cycle`]: PauseControl::request_cycle
#[derive(Debug, Clone, Default)]
pub struct PauseControl {
    paused: Arc<AtomicBool>,
    wake: Arc<Notify>,
}

impl PauseControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_paused(paused: bool) -> Self {
        Self {
            paused: Arc::new(AtomicBool::new(paused)),
            wake: Arc::new(Notify::new()),
        }
    }

    /// Pause the orchestrator. Returns the previous state.
    pub fn pause(&self) -> bool {
        info!("Ariel: Paused by admin.");
        self.paused.swap(true, Ordering::SeqCst)
    }

    /// Resume the orchestrator. Returns the previous state.
    pub fn resume(&self) -> bool {
        info!("Ariel: Resumed by admin.");
        self.paused.swap(false, Ordering::SeqCst)
    }

    /// Set the flag without an admin log line (state restore).
    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Ask the loop to start the next cycle now instead of waiting out
    /// the cycle time. Requests made while a cycle runs collapse into one.
    pub fn request_cycle(&self) {
        info!("Ariel: Optimization cycle requested by admin.");
        self.wake.notify_one();
    }

    /// Resolves once a cycle has been requested.
    pub async fn cycle_requested(&self) {
        self.wake.notified().await;
    }
}

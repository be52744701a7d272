//! Shutdown signal for the main loop.

use tokio::sync::oneshot;
use tracing::{info, warn};

/// Resolves when the signal task sends on `rx`.
///
/// If the sender is dropped without sending, the signal can never
/// arrive: the error is logged and the returned future stays pending,
/// so the loop keeps running instead of stopping after one cycle.
pub async fn shutdown_signal(rx: oneshot::Receiver<()>) {
    match rx.await {
        Ok(()) => info!("Ctrl+C received, stopping after the current cycle."),
        Err(_) => {
            warn!("Shutdown signal unavailable, running until the process is killed");
            futures::future::pending::<()>().await;
        }
    }
}

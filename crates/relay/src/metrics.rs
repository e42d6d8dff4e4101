use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Relay counters, updated on every event.
#[derive(Debug, Default)]
pub struct RelayMetrics {
    pub connected_sessions: AtomicU64,
    pub messages_received: AtomicU64,
    pub broadcasts_sent: AtomicU64,
    pub send_failures: AtomicU64,
    pub rejected_updates: AtomicU64,
}

impl RelayMetrics {
    /// Print a one-line stats summary through tracing.
    pub fn print_stats(&self) {
        tracing::info!(
            "Sessions: {} | Msgs Recv: {} | Broadcasts: {} | Send Failures: {} | Rejected: {}",
            self.connected_sessions.load(Ordering::Relaxed),
            self.messages_received.load(Ordering::Relaxed),
            self.broadcasts_sent.load(Ordering::Relaxed),
            self.send_failures.load(Ordering::Relaxed),
            self.rejected_updates.load(Ordering::Relaxed),
        );
    }
}

/// Periodically log relay stats until the process exits.
pub async fn start_metrics_reporter(metrics: Arc<RelayMetrics>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);

    loop {
        ticker.tick().await;
        metrics.print_stats();
    }
}

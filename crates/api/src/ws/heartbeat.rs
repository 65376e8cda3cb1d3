use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::ws::manager::WsManager;

/// Spawn the keep-alive task: every `period` each socket gets a Ping and
/// connections whose socket task is gone are pruned from the manager.
///
/// Runs until the returned handle is aborted at shutdown.
pub fn start_heartbeat(ws_manager: Arc<WsManager>, period: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // A stalled runtime should not produce a burst of pings afterwards.
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            let report = ws_manager.ping_all().await;
            if report.pruned > 0 {
                tracing::info!(
                    pinged = report.pinged,
                    pruned = report.pruned,
                    "WebSocket heartbeat pruned dead connections",
                );
            } else {
                tracing::debug!(pinged = report.pinged, "WebSocket heartbeat ping");
            }
        }
    })
}

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::ws::Message;
use statuspage_core::types::{DbId, Timestamp};
use statuspage_events::Visibility;
use tokio::sync::{mpsc, RwLock};

/// Channel sender half for pushing control frames to a WebSocket connection.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// Outcome of one [`WsManager::ping_all`] sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PingReport {
    pub pinged: usize,
    /// Connections whose socket task had already gone away.
    pub pruned: usize,
}

/// Metadata for a single WebSocket connection.
pub struct WsConnection {
    /// Organization whose change stream the socket is bound to.
    pub organization_id: DbId,
    pub visibility: Visibility,
    /// Control channel (ping, close). Change events arrive through the
    /// connection's own bus subscription, not through here.
    pub sender: WsSender,
    pub connected_at: Timestamp,
}

/// Tracks every live WebSocket connection.
///
/// Thread-safe via interior `RwLock`; shared across the application in an
/// `Arc`.
pub struct WsManager {
    connections: RwLock<HashMap<String, WsConnection>>,
}

impl WsManager {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new connection.
    ///
    /// Returns the receiver half of the control channel so the socket task
    /// can forward frames to the sink.
    pub async fn add(
        &self,
        conn_id: String,
        organization_id: DbId,
        visibility: Visibility,
    ) -> mpsc::UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = WsConnection {
            organization_id,
            visibility,
            sender: tx,
            connected_at: chrono::Utc::now(),
        };
        self.connections.write().await.insert(conn_id, conn);
        rx
    }

    pub async fn remove(&self, conn_id: &str) {
        self.connections.write().await.remove(conn_id);
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Number of connections bound to `organization_id`.
    pub async fn count_for_org(&self, organization_id: DbId) -> usize {
        self.connections
            .read()
            .await
            .values()
            .filter(|conn| conn.organization_id == organization_id)
            .count()
    }

    /// Send a Close frame to every connection, then clear the map.
    ///
    /// Called during graceful shutdown once the listener has stopped.
    pub async fn shutdown_all(&self) {
        let mut conns = self.connections.write().await;
        let count = conns.len();
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Close(None));
        }
        conns.clear();
        tracing::info!(count, "Closed all WebSocket connections");
    }

    /// Send a Ping frame to every connected client.
    ///
    /// A closed control channel means the socket task exited without
    /// deregistering; such entries are dropped here.
    pub async fn ping_all(&self) -> PingReport {
        let mut conns = self.connections.write().await;
        let before = conns.len();
        conns.retain(|conn_id, conn| {
            let alive = conn.sender.send(Message::Ping(Bytes::new())).is_ok();
            if !alive {
                tracing::debug!(
                    conn_id = %conn_id,
                    org_id = %conn.organization_id,
                    "Pruning dead WebSocket connection",
                );
            }
            alive
        });
        PingReport {
            pinged: conns.len(),
            pruned: before - conns.len(),
        }
    }
}

impl Default for WsManager {
    fn default() -> Self {
        Self::new()
    }
}

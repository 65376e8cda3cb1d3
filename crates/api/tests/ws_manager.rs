//! Unit tests for `WsManager`.
//!
//! These exercise the connection manager directly, without any HTTP
//! upgrade.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::Message;
use statuspage_api::ws::{start_heartbeat, PingReport, WsManager};
use statuspage_core::types::new_id;
use statuspage_events::Visibility;

#[tokio::test]
async fn new_manager_has_zero_connections() {
    let manager = WsManager::new();

    assert_eq!(manager.connection_count().await, 0);
}

#[tokio::test]
async fn add_and_remove_track_connections() {
    let manager = WsManager::new();
    let org = new_id();

    let _rx = manager
        .add("conn-1".to_string(), org, Visibility::Public)
        .await;
    assert_eq!(manager.connection_count().await, 1);

    manager.remove("nonexistent").await;
    assert_eq!(manager.connection_count().await, 1);

    manager.remove("conn-1").await;
    assert_eq!(manager.connection_count().await, 0);
}

#[tokio::test]
async fn count_for_org_partitions_by_tenant() {
    let manager = WsManager::new();
    let acme = new_id();
    let techstart = new_id();

    let _a = manager.add("a".into(), acme, Visibility::Public).await;
    let _b = manager.add("b".into(), acme, Visibility::Internal).await;
    let _c = manager.add("c".into(), techstart, Visibility::Internal).await;

    assert_eq!(manager.count_for_org(acme).await, 2);
    assert_eq!(manager.count_for_org(techstart).await, 1);
    assert_eq!(manager.count_for_org(new_id()).await, 0);
}

#[tokio::test]
async fn ping_all_reaches_every_connection() {
    let manager = WsManager::new();

    let mut rx1 = manager.add("a".into(), new_id(), Visibility::Public).await;
    let mut rx2 = manager.add("b".into(), new_id(), Visibility::Internal).await;
    let report = manager.ping_all().await;

    assert_eq!(report, PingReport { pinged: 2, pruned: 0 });

    assert!(matches!(rx1.recv().await, Some(Message::Ping(_))));
    assert!(matches!(rx2.recv().await, Some(Message::Ping(_))));
}

#[tokio::test]
async fn shutdown_all_sends_close_and_clears() {
    let manager = WsManager::new();

    let mut rx = manager.add("a".into(), new_id(), Visibility::Public).await;
    manager.shutdown_all().await;

    assert!(matches!(rx.recv().await, Some(Message::Close(None))));
    // Sender dropped with the map entry.
    assert!(rx.recv().await.is_none());
    assert_eq!(manager.connection_count().await, 0);
}

#[tokio::test]
async fn ping_all_prunes_connections_whose_socket_is_gone() {
    let manager = WsManager::new();
    let org = new_id();

    let mut live = manager.add("live".into(), org, Visibility::Public).await;
    let dead = manager.add("dead".into(), org, Visibility::Public).await;
    drop(dead);

    let report = manager.ping_all().await;

    assert_eq!(report, PingReport { pinged: 1, pruned: 1 });
    assert_eq!(manager.connection_count().await, 1);
    assert!(matches!(live.recv().await, Some(Message::Ping(_))));
}

#[tokio::test]
async fn heartbeat_pings_on_the_configured_period() {
    let manager = Arc::new(WsManager::new());
    let mut rx = manager.add("a".into(), new_id(), Visibility::Internal).await;

    let handle = start_heartbeat(Arc::clone(&manager), Duration::from_millis(20));

    // First tick fires immediately, the second after one period.
    for _ in 0..2 {
        let frame = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("heartbeat should ping within the timeout");
        assert!(matches!(frame, Some(Message::Ping(_))));
    }
    handle.abort();
}

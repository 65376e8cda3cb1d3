use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query, State};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use statuspage_core::types::DbId;
use statuspage_events::Visibility;

use crate::error::AppResult;
use crate::middleware::auth::principal_from_token;
use crate::state::AppState;

/// Query string of the internal WebSocket endpoint.
#[derive(Debug, Deserialize)]
pub struct WsAuthQuery {
    pub token: String,
}

/// GET /ws/public/{slug}
///
/// The slug is resolved before the upgrade, so an unknown tenant gets a
/// plain 404 instead of a socket.
pub async fn public_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Response> {
    let organization = state.engine.tenants().resolve_slug(&slug).await?;
    Ok(ws.on_upgrade(move |socket| {
        handle_socket(socket, state, organization.id, Visibility::Public)
    }))
}

/// GET /ws?token=<jwt>
///
/// Browsers cannot set headers on a WebSocket handshake, so the access
/// token travels in the query string. The socket is bound to the token's
/// organization.
pub async fn internal_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<WsAuthQuery>,
) -> AppResult<Response> {
    let principal = principal_from_token(&query.token, &state.config.jwt)?;
    let organization = state
        .engine
        .tenants()
        .require(principal.organization_id)
        .await?;
    Ok(ws.on_upgrade(move |socket| {
        handle_socket(socket, state, organization.id, Visibility::Internal)
    }))
}

/// Pump one connection until either side goes away.
///
/// Three sources feed the socket: the manager's control channel (ping,
/// close), the connection's bus subscription (change events as JSON text),
/// and the client's inbound frames (close, pong).
async fn handle_socket(
    socket: WebSocket,
    state: AppState,
    organization_id: DbId,
    visibility: Visibility,
) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    let mut control = state
        .ws_manager
        .add(conn_id.clone(), organization_id, visibility)
        .await;
    let mut subscription = state.engine.bus().subscribe(organization_id, visibility);
    tracing::info!(
        conn_id = %conn_id,
        organization_id = %organization_id,
        ?visibility,
        "WebSocket connected",
    );

    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            frame = control.recv() => match frame {
                Some(Message::Close(close)) => {
                    let _ = sink.send(Message::Close(close)).await;
                    break;
                }
                Some(frame) => {
                    if sink.send(frame).await.is_err() {
                        break;
                    }
                }
                None => break,
            },
            event = subscription.recv() => match event {
                Some(event) => match serde_json::to_string(&event) {
                    Ok(text) => {
                        if sink.send(Message::Text(text.into())).await.is_err() {
                            tracing::debug!(conn_id = %conn_id, "WebSocket sink closed");
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(conn_id = %conn_id, error = %e, "Failed to encode change event");
                    }
                },
                // Bus shut down.
                None => {
                    let _ = sink.send(Message::Close(None)).await;
                    break;
                }
            },
            inbound = stream.next() => match inbound {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(Message::Pong(_))) => {
                    tracing::trace!(conn_id = %conn_id, "Pong received");
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                    break;
                }
            },
        }
    }

    state.ws_manager.remove(&conn_id).await;
    drop(subscription);
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}

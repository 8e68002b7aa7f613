//! WebSocket endpoint for realtime notification delivery.
//!
//! Clients connect with a valid JWT (the auth middleware must wrap this
//! router). The socket only pushes server-to-client; inbound messages are
//! drained solely to detect disconnects.

use axum::{
    Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
    routing::get,
};
use axum_helpers::AuthUser;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::registry::OnlineRegistry;

/// Create the WebSocket router
pub fn router(registry: Arc<OnlineRegistry>) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .with_state(registry)
}

async fn ws_handler(
    State(registry): State<Arc<OnlineRegistry>>,
    AuthUser(claims): AuthUser,
    upgrade: WebSocketUpgrade,
) -> impl IntoResponse {
    let user_id = match Uuid::parse_str(&claims.sub) {
        Ok(id) => id,
        Err(_) => {
            return axum_helpers::AppError::Unauthorized("Invalid token subject".to_string())
                .into_response();
        }
    };

    upgrade
        .on_upgrade(move |socket| handle_socket(socket, registry, user_id))
        .into_response()
}

async fn handle_socket(mut socket: WebSocket, registry: Arc<OnlineRegistry>, user_id: Uuid) {
    debug!(%user_id, "WebSocket connected");
    let mut rx = registry.register(user_id).await;

    loop {
        tokio::select! {
            outbound = rx.recv() => {
                match outbound {
                    Some(payload) => {
                        if socket.send(Message::Text(payload.into())).await.is_err() {
                            break;
                        }
                    }
                    // Sender dropped: the user reconnected elsewhere
                    None => break,
                }
            }
            inbound = socket.recv() => {
                match inbound {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    // Ignore pings and any other client messages
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    registry.unregister(user_id).await;
    debug!(%user_id, "WebSocket disconnected");
}

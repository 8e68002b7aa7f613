//! Registry of connected WebSocket users.
//!
//! Maps a user id to the sender half of their socket's channel. A user has
//! at most one live connection; a new connection replaces the old sender,
//! which closes the previous socket loop.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, mpsc};
use tracing::debug;
use uuid::Uuid;

use crate::models::Notification;

/// Best-effort realtime push to a connected user.
///
/// Returns `true` only when the recipient had a live connection and the
/// payload was handed to their channel. Callers must not treat `false`
/// as an error; the notification is already persisted.
#[async_trait]
pub trait NotificationPush: Send + Sync {
    async fn push(&self, notification: &Notification) -> bool;
}

/// In-memory registry of online users
#[derive(Default)]
pub struct OnlineRegistry {
    connections: RwLock<HashMap<Uuid, mpsc::UnboundedSender<String>>>,
}

impl OnlineRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register a user's connection, returning the receiver half for the
    /// socket loop. Replaces any previous connection for the same user.
    pub async fn register(&self, user_id: Uuid) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        let previous = self.connections.write().await.insert(user_id, tx);
        if previous.is_some() {
            debug!(%user_id, "Replaced existing connection");
        }
        rx
    }

    /// Remove a user's connection. Ignored if they reconnected already
    /// (the stored sender then belongs to the newer socket).
    pub async fn unregister(&self, user_id: Uuid) {
        let mut connections = self.connections.write().await;
        if connections
            .get(&user_id)
            .is_some_and(|sender| sender.is_closed())
        {
            connections.remove(&user_id);
        }
    }

    /// Number of currently connected users
    pub async fn online_count(&self) -> usize {
        self.connections.read().await.len()
    }
}

#[async_trait]
impl NotificationPush for OnlineRegistry {
    async fn push(&self, notification: &Notification) -> bool {
        let payload = match serde_json::to_string(notification) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize notification: {}", e);
                return false;
            }
        };

        let connections = self.connections.read().await;
        match connections.get(&notification.user_id) {
            Some(sender) => sender.send(payload).is_ok(),
            None => {
                debug!(user_id = %notification.user_id, "Recipient offline, skipping push");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_push_to_registered_user() {
        let registry = OnlineRegistry::new();
        let user_id = Uuid::now_v7();
        let mut rx = registry.register(user_id).await;

        let notification = Notification::new(user_id, "Hello", "World");
        assert!(registry.push(&notification).await);

        let payload = rx.recv().await.unwrap();
        assert!(payload.contains("Hello"));
    }

    #[tokio::test]
    async fn test_push_to_offline_user_returns_false() {
        let registry = OnlineRegistry::new();
        let notification = Notification::new(Uuid::now_v7(), "Hello", "World");
        assert!(!registry.push(&notification).await);
    }

    #[tokio::test]
    async fn test_reconnect_replaces_sender() {
        let registry = OnlineRegistry::new();
        let user_id = Uuid::now_v7();

        let rx_old = registry.register(user_id).await;
        drop(rx_old);
        let mut rx_new = registry.register(user_id).await;

        let notification = Notification::new(user_id, "Hi", "again");
        assert!(registry.push(&notification).await);
        assert!(rx_new.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_unregister_keeps_newer_connection() {
        let registry = OnlineRegistry::new();
        let user_id = Uuid::now_v7();

        // Old socket's receiver dropped, then the user reconnects
        drop(registry.register(user_id).await);
        let _rx = registry.register(user_id).await;

        // The old socket loop exits and unregisters; the live sender stays
        registry.unregister(user_id).await;
        assert_eq!(registry.online_count().await, 1);
    }
}

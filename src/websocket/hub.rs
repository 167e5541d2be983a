//! WebSocket Connection Hub
//!
//! Tracks live WebSocket connections and fans dashboard views out to them.

use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, watch, RwLock};
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::messages::ServerMessage;
use crate::dashboard::DashboardView;

/// Unique identifier for a WebSocket connection
pub type ConnectionId = String;

/// Manages all WebSocket connections
pub struct ConnectionHub {
    /// Active connections: ConnectionId → sender
    connections: RwLock<HashMap<ConnectionId, mpsc::UnboundedSender<ServerMessage>>>,
    /// Configuration
    config: HubConfig,
}

/// Configuration for the connection hub
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Maximum number of concurrent connections
    pub max_connections: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            max_connections: 1000,
        }
    }
}

impl ConnectionHub {
    /// Create a new connection hub
    pub fn new(config: HubConfig) -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Register a new WebSocket connection
    ///
    /// Returns the connection ID on success, or an error if the connection
    /// limit has been reached.
    pub async fn register(
        &self,
        sender: mpsc::UnboundedSender<ServerMessage>,
    ) -> Result<ConnectionId, HubError> {
        let mut connections = self.connections.write().await;
        if connections.len() >= self.config.max_connections {
            return Err(HubError::TooManyConnections(self.config.max_connections));
        }

        let id = Uuid::new_v4().to_string();
        connections.insert(id.clone(), sender);

        tracing::info!(connection_id = %id, "WebSocket connected");
        Ok(id)
    }

    /// Unregister a connection
    pub async fn unregister(&self, id: &str) {
        self.connections.write().await.remove(id);
        tracing::info!(connection_id = %id, "WebSocket disconnected");
    }

    /// Send a message to every connection
    ///
    /// Returns how many connections accepted it.
    pub async fn broadcast(&self, message: &ServerMessage) -> usize {
        let connections = self.connections.read().await;

        let sent = connections
            .values()
            .filter(|sender| sender.send(message.clone()).is_ok())
            .count();

        if sent > 0 {
            tracing::trace!(connections = sent, "Broadcast message");
        }
        sent
    }

    /// Send a message directly to a specific connection
    pub async fn send_to(&self, id: &str, message: ServerMessage) -> Result<(), HubError> {
        let connections = self.connections.read().await;
        let sender = connections.get(id).ok_or(HubError::ConnectionNotFound)?;

        sender.send(message).map_err(|_| HubError::SendFailed)
    }

    /// Broadcast every view published on `views` until the publisher goes away
    pub fn forward_views(self: Arc<Self>, mut views: watch::Receiver<DashboardView>) -> JoinHandle<()> {
        tokio::spawn(async move {
            while views.changed().await.is_ok() {
                let view = views.borrow_and_update().clone();
                self.broadcast(&ServerMessage::View(view)).await;
            }
            tracing::debug!("Dashboard view stream closed");
        })
    }

    /// Get the current connection count
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }
}

/// Errors that can occur in the connection hub
#[derive(Debug, Error)]
pub enum HubError {
    #[error("Too many connections (limit: {0})")]
    TooManyConnections(usize),

    #[error("Connection not found")]
    ConnectionNotFound,

    #[error("Failed to send message")]
    SendFailed,
}

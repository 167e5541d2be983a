//! WebSocket Message Types
//!
//! Defines all message types for WebSocket communication between
//! dashboard clients and the server.

use serde::{Deserialize, Serialize};

use crate::api::dto::SelectionRequest;
use crate::dashboard::DashboardView;

/// Messages sent from client to server
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Change chains and/or granularity
    Select(SelectionRequest),
    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Connection established
    Connected {
        /// Unique connection identifier
        connection_id: String,
    },
    /// Current dashboard view, sent on connect and after every change
    View(DashboardView),
    /// Pong response to ping
    Pong,
    /// Error message
    Error {
        /// Error description
        message: String,
    },
}

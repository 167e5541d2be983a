//! WebSocket View Pushes
//!
//! Every view the dashboard controller publishes is pushed to all connected
//! clients. Clients may also change the selection over the same socket.
//!
//! ## Protocol
//!
//! Server to client:
//! - `{"type": "connected", "connection_id": "..."}` on accept
//! - `{"type": "view", ...}` right after connect and on every change
//! - `{"type": "pong"}` / `{"type": "error", "message": "..."}`
//!
//! Client to server:
//! - `{"type": "select", "chain_from": "ethereum", "chain_to": "base", "granularity": 2}`
//!   (every field optional)
//! - `{"type": "ping"}`

mod handler;
mod hub;
mod messages;

pub use handler::websocket_handler;
pub use hub::{ConnectionHub, ConnectionId, HubConfig, HubError};
pub use messages::{ClientMessage, ServerMessage};

//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;

use crate::config::ApiConfig;
use crate::dashboard::DashboardHandle;
use crate::websocket::{ConnectionHub, HubConfig};

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Handle to the running dashboard controller
    pub dashboard: DashboardHandle,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
    /// WebSocket connection hub for view pushes
    pub ws_hub: Arc<ConnectionHub>,
}

impl AppState {
    pub fn new(dashboard: DashboardHandle, config: ApiConfig) -> Self {
        let hub_config = HubConfig {
            max_connections: config.max_ws_connections,
        };

        Self {
            dashboard,
            config: Arc::new(config),
            start_time: Instant::now(),
            ws_hub: Arc::new(ConnectionHub::new(hub_config)),
        }
    }

    /// Push every published dashboard view to WebSocket clients
    pub fn start_view_broadcast(&self) -> JoinHandle<()> {
        Arc::clone(&self.ws_hub).forward_views(self.dashboard.subscribe())
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Get WebSocket connection count
    pub async fn ws_connection_count(&self) -> usize {
        self.ws_hub.connection_count().await
    }
}

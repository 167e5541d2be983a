//! # Growthdash
//!
//! Growth index dashboard core: pick two blockchains, fetch their growth
//! index timelines from the TokenGuard API, and display them at a chosen
//! weekly granularity.
//!
//! ## Features
//!
//! - **Latest selection wins**: every chain change supersedes the fetch in
//!   flight, so a slow stale response can never overwrite a newer one
//! - **Cheap granularity changes**: resampling happens on display, no refetch
//! - **Live**: REST API plus WebSocket pushes of every view change
//!
//! ## Modules
//!
//! - [`dashboard`]: Selection state machine and the controller that owns it
//! - [`timeline`]: Timeline types, resampling, and export
//! - [`tokenguard`]: TokenGuard API client
//! - [`api`]: REST API server with Axum
//! - [`websocket`]: View pushes to connected clients
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use growthdash::chains::Chain;
//! use growthdash::dashboard::{DashboardController, Selection};
//! use growthdash::timeline::Granularity;
//! use growthdash::tokenguard::{TokenGuardClient, TokenGuardConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TokenGuardClient::new(TokenGuardConfig::default())?;
//!     let dashboard = DashboardController::spawn(
//!         Arc::new(client),
//!         Selection::new(Chain::Ethereum, Chain::Solana),
//!         Granularity::OneWeek,
//!     );
//!
//!     // Wait for the first timeline
//!     let mut views = dashboard.subscribe();
//!     views.wait_for(|view| !view.loading).await?;
//!
//!     // Coarser view of the same data, no new request
//!     let view = dashboard.set_granularity(Granularity::FourWeeks).await?;
//!     println!("{} points", view.timeline.map(|t| t.len()).unwrap_or(0));
//!
//!     dashboard.shutdown().await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod chains;
pub mod config;
pub mod dashboard;
pub mod logging;
pub mod timeline;
pub mod tokenguard;
pub mod websocket;

#[cfg(test)]
mod testing;

// Re-export top-level types for convenience
pub use chains::Chain;

pub use dashboard::{
    DashboardAction, DashboardController, DashboardHandle, DashboardState, DashboardView,
    Selection, SelectionError, ViewStatus,
};

pub use timeline::{DisplayedTimeline, Granularity, TimelinePoint, TimelineResponse};

pub use tokenguard::{TimelineSource, TokenGuardClient, TokenGuardError};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::Config;

//! Dashboard Core
//!
//! Selection state, fetch lifecycle and the view published to renderers.
//!
//! ## Architecture
//!
//! - **DashboardState**: reducer over (chain_from, chain_to, granularity) and the live timeline
//! - **DashboardController**: single task executing the reducer's effects
//! - **DashboardView**: snapshot consumed by the API, WebSocket and CLI
//!
//! ## Data Flow
//!
//! 1. A selection change clears the live timeline and bumps the generation
//! 2. The controller aborts the previous fetch and starts a new one
//! 3. A settled fetch is applied only if its generation is still current
//! 4. The view resamples the live timeline by granularity and is published

mod controller;
mod error;
mod state;
mod view;

pub use controller::{DashboardController, DashboardHandle};
pub use error::{ControllerError, SelectionError};
pub use state::{
    Completion, DashboardAction, DashboardState, Effect, FetchTicket, Phase, Selection,
};
pub use view::{DashboardView, ViewStatus};

//! API Routes
//!
//! Route handlers organized by functionality.

pub mod chains;
pub mod dashboard;
pub mod export;
pub mod health;

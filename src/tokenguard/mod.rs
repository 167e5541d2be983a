//! TokenGuard Integration
//!
//! Fetches growth index timelines from the TokenGuard analytics API.
//!
//! The dashboard depends on the [`TimelineSource`] trait rather than the
//! concrete client, so tests can substitute scripted sources.

mod client;

pub use client::{
    TimelineRequest, TokenGuardClient, TokenGuardConfig, TokenGuardError, DEFAULT_ENDPOINT,
    METRIC, PERIOD,
};

use async_trait::async_trait;

use crate::chains::Chain;
use crate::timeline::TimelineResponse;

/// Anything that can produce a growth index timeline for a chain pair
#[async_trait]
pub trait TimelineSource: Send + Sync {
    /// Fetch the timeline comparing `chain_from` with `chain_to`
    ///
    /// Dropping the returned future abandons the request.
    async fn fetch(
        &self,
        chain_from: Chain,
        chain_to: Chain,
    ) -> Result<TimelineResponse, TokenGuardError>;
}

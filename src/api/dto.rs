//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use serde::{Deserialize, Serialize};

use crate::chains::Chain;
use crate::dashboard::{DashboardAction, Selection, SelectionError};
use crate::timeline::Granularity;

// ============================================
// SELECTION DTOs
// ============================================

/// Selection update; omitted fields keep their current value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub granularity: Option<u32>,
}

impl SelectionRequest {
    /// Validate and translate into dashboard actions
    ///
    /// Both chains given together become a single selection change, so only
    /// one fetch is issued. Nothing is applied if any field is invalid.
    pub fn into_actions(self) -> Result<Vec<DashboardAction>, SelectionError> {
        let chain_from = self.chain_from.as_deref().map(str::parse::<Chain>).transpose()?;
        let chain_to = self.chain_to.as_deref().map(str::parse::<Chain>).transpose()?;
        let granularity = self.granularity.map(Granularity::try_from).transpose()?;

        let mut actions = Vec::new();
        match (chain_from, chain_to) {
            (Some(from), Some(to)) => {
                actions.push(DashboardAction::SetSelection(Selection::new(from, to)))
            }
            (Some(from), None) => actions.push(DashboardAction::SetChainFrom(from)),
            (None, Some(to)) => actions.push(DashboardAction::SetChainTo(to)),
            (None, None) => {}
        }
        if let Some(granularity) = granularity {
            actions.push(DashboardAction::SetGranularity(granularity));
        }

        Ok(actions)
    }
}

// ============================================
// CHAIN DTOs
// ============================================

/// Choices offered by the selection controls
#[derive(Debug, Serialize, Deserialize)]
pub struct ChainsResponse {
    pub chains: Vec<Chain>,
    pub granularities: Vec<u32>,
}

impl ChainsResponse {
    pub fn supported() -> Self {
        Self {
            chains: Chain::ALL.to_vec(),
            granularities: Granularity::ALL.iter().map(|g| u32::from(*g)).collect(),
        }
    }
}

// ============================================
// EXPORT DTOs
// ============================================

/// Export query parameters
#[derive(Debug, Deserialize)]
pub struct ExportParams {
    /// Output format: json or csv
    #[serde(default = "default_export_format")]
    pub format: String,
}

fn default_export_format() -> String {
    "json".to_string()
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: String,
    /// "running" or "stopped"
    pub dashboard: String,
    /// Status of the live timeline
    pub timeline: String,
    pub ws_connections: usize,
    pub uptime_seconds: u64,
    pub version: String,
}

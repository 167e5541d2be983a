//! Dashboard View
//!
//! Snapshot of the dashboard handed to renderers (API, WebSocket, CLI).

use serde::{Deserialize, Serialize};

use super::state::{DashboardState, Phase};
use crate::chains::Chain;
use crate::timeline::{DisplayedTimeline, Granularity};

/// Coarse status of the live timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewStatus {
    Idle,
    Loading,
    Ready,
    Failed,
}

impl ViewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewStatus::Idle => "idle",
            ViewStatus::Loading => "loading",
            ViewStatus::Ready => "ready",
            ViewStatus::Failed => "failed",
        }
    }
}

/// Everything a renderer needs to draw the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub chain_from: Chain,
    pub chain_to: Chain,
    pub granularity: Granularity,
    pub status: ViewStatus,
    /// True whenever there is no timeline to draw
    pub loading: bool,
    pub timeline: Option<DisplayedTimeline>,
    pub generation: u64,
}

impl DashboardView {
    pub fn from_state(state: &DashboardState) -> Self {
        let selection = state.selection();
        let status = match state.phase() {
            Phase::Idle => ViewStatus::Idle,
            Phase::Loading => ViewStatus::Loading,
            Phase::Ready(_) => ViewStatus::Ready,
            Phase::Failed => ViewStatus::Failed,
        };
        let timeline = state.displayed();

        Self {
            chain_from: selection.chain_from,
            chain_to: selection.chain_to,
            granularity: state.granularity(),
            status,
            loading: timeline.is_none(),
            timeline,
            generation: state.generation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_response;

    #[test]
    fn test_loading_view() {
        let mut state = DashboardState::default();
        state.start();

        let view = DashboardView::from_state(&state);
        assert_eq!(view.status, ViewStatus::Loading);
        assert!(view.loading);
        assert!(view.timeline.is_none());
    }

    #[test]
    fn test_ready_view_serializes() {
        let mut state = DashboardState::default();
        state.start();
        state.complete(state.generation(), Ok(sample_response(2)));

        let view = DashboardView::from_state(&state);
        assert!(!view.loading);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["chain_from"], "ethereum");
        assert_eq!(json["chain_to"], "solana");
        assert_eq!(json["granularity"], 1);
        assert_eq!(json["status"], "ready");
        assert_eq!(json["timeline"]["blockchain"].as_array().unwrap().len(), 2);

        let parsed: DashboardView = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, view);
    }
}

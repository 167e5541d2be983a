//! Dashboard Routes
//!
//! - GET /api/v1/dashboard - Current dashboard view
//! - PUT /api/v1/selection - Change chains and/or granularity

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::SelectionRequest;
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::dashboard::{DashboardHandle, DashboardView};

/// GET /api/v1/dashboard
pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardView> {
    Json(state.dashboard.view())
}

/// PUT /api/v1/selection
///
/// Returns the view right after the change; a new timeline, if any,
/// arrives later via `/ws` or the next GET.
pub async fn update_selection(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SelectionRequest>,
) -> ApiResult<Json<DashboardView>> {
    let view = apply_selection(&state.dashboard, request).await?;
    Ok(Json(view))
}

/// Validate a selection request and dispatch it to the controller
pub(crate) async fn apply_selection(
    dashboard: &DashboardHandle,
    request: SelectionRequest,
) -> ApiResult<DashboardView> {
    let actions = request.into_actions()?;

    let mut view = dashboard.view();
    for action in actions {
        view = dashboard.dispatch(action).await?;
    }

    tracing::info!(
        chain_from = %view.chain_from,
        chain_to = %view.chain_to,
        granularity = view.granularity.stride(),
        status = view.status.as_str(),
        "Selection updated"
    );

    Ok(view)
}

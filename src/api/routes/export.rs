//! Export Routes
//!
//! - GET /api/v1/export - Export the displayed timeline as JSON or CSV

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::api::dto::ExportParams;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::dashboard::ViewStatus;
use crate::timeline::{export, ExportFormat};

/// GET /api/v1/export
///
/// 400 for a format other than `csv` or `json`, 404 when the selection
/// compares a chain with itself, 503 while the timeline is loading or after
/// a failed fetch.
pub async fn export_timeline(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExportParams>,
) -> ApiResult<Response> {
    let format = ExportFormat::parse(&params.format).ok_or_else(|| {
        ApiError::Validation(format!(
            "unsupported export format '{}', expected csv or json",
            params.format
        ))
    })?;

    let view = state.dashboard.view();

    let timeline = match (view.status, view.timeline) {
        (_, Some(timeline)) => timeline,
        (ViewStatus::Idle, None) => {
            return Err(ApiError::NotFound(format!(
                "no timeline for {} vs {}",
                view.chain_from, view.chain_to
            )))
        }
        (_, None) => {
            return Err(ApiError::ServiceUnavailable(
                "timeline is not available yet".to_string(),
            ))
        }
    };

    let body = export(&timeline, format)?;

    let filename = format!(
        "growth-index-{}-vs-{}.{}",
        view.chain_from,
        view.chain_to,
        match format {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    );

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response())
}

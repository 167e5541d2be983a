//! Chain Routes
//!
//! - GET /api/v1/chains - Supported chains and granularities

use axum::Json;

use crate::api::dto::ChainsResponse;

/// GET /api/v1/chains
pub async fn list_chains() -> Json<ChainsResponse> {
    Json(ChainsResponse::supported())
}

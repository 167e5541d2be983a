//! Growthdash REST API
//!
//! HTTP API layer for the dashboard, built with Axum.
//!
//! # Endpoints
//!
//! ## Dashboard
//! - `GET /api/v1/chains` - Supported chains and granularities
//! - `GET /api/v1/dashboard` - Current dashboard view
//! - `PUT /api/v1/selection` - Change chains and/or granularity
//!
//! ## Export
//! - `GET /api/v1/export` - Displayed timeline as JSON or CSV
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! ## WebSocket
//! - `GET /ws` - Dashboard view pushes
//!
//! # Example
//!
//! ```rust,ignore
//! use growthdash::api::{serve, AppState};
//! use growthdash::config::Config;
//! use growthdash::dashboard::DashboardController;
//! use growthdash::tokenguard::TokenGuardClient;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let client = TokenGuardClient::new(config.tokenguard.client_config())?;
//!     let dashboard = DashboardController::spawn(
//!         Arc::new(client),
//!         config.dashboard.selection(),
//!         config.dashboard.granularity,
//!     );
//!
//!     let state = AppState::new(dashboard, config.api.clone());
//!     serve(state, &config.api).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    http::HeaderValue,
    routing::{get, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::ApiConfig;
use crate::websocket::websocket_handler;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/chains", get(routes::chains::list_chains))
        .route("/dashboard", get(routes::dashboard::get_dashboard))
        .route("/selection", put(routes::dashboard::update_selection))
        .route("/export", get(routes::export::export_timeline));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.config);
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .route("/ws", get(websocket_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// Any origin when none are configured, otherwise only the listed ones
fn cors_layer(config: &ApiConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any)
    }
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let broadcast = state.start_view_broadcast();
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Growthdash API listening on {}", addr);

    let result = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)));

    broadcast.abort();
    result?;

    tracing::info!("Growthdash API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chains::Chain;
    use crate::dashboard::{DashboardController, DashboardView, Selection, ViewStatus};
    use crate::testing::{sample_response, ScriptedSource};
    use crate::timeline::Granularity;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::time::Duration;
    use tower::util::ServiceExt;

    fn create_test_app(source: ScriptedSource, selection: Selection) -> (Router, AppState) {
        let dashboard =
            DashboardController::spawn(Arc::new(source), selection, Granularity::OneWeek);
        let state = AppState::new(dashboard, ApiConfig::default());
        (build_router(state.clone()), state)
    }

    async fn wait_ready(state: &AppState) {
        let mut views = state.dashboard.subscribe();
        tokio::time::timeout(
            Duration::from_secs(5),
            views.wait_for(|v| v.status == ViewStatus::Ready),
        )
        .await
        .unwrap()
        .unwrap();
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn put_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("PUT")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let (app, _state) = create_test_app(
            ScriptedSource::returning(sample_response(4)),
            Selection::default(),
        );

        for uri in ["/health/live", "/health/ready", "/health"] {
            let response = app.clone().oneshot(get(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_list_chains() {
        let (app, _state) = create_test_app(ScriptedSource::empty(), Selection::default());

        let response = app.oneshot(get("/api/v1/chains")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = body_json(response).await;
        assert_eq!(body["granularities"], serde_json::json!([1, 2, 4]));
        assert_eq!(body["chains"][0], "ethereum");
    }

    #[tokio::test]
    async fn test_dashboard_view() {
        let (app, state) = create_test_app(
            ScriptedSource::returning(sample_response(10)),
            Selection::default(),
        );
        wait_ready(&state).await;

        let response = app.oneshot(get("/api/v1/dashboard")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let view: DashboardView = body_json(response).await;
        assert_eq!(view.status, ViewStatus::Ready);
        assert_eq!(view.timeline.unwrap().blockchain.len(), 10);
    }

    #[tokio::test]
    async fn test_update_granularity() {
        let (app, state) = create_test_app(
            ScriptedSource::returning(sample_response(10)),
            Selection::default(),
        );
        wait_ready(&state).await;

        let response = app
            .oneshot(put_json("/api/v1/selection", r#"{"granularity": 4}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let view: DashboardView = body_json(response).await;
        assert_eq!(view.granularity, Granularity::FourWeeks);
        assert_eq!(view.timeline.unwrap().blockchain.len(), 3);
    }

    #[tokio::test]
    async fn test_same_chain_selection_clears_view() {
        let (app, state) = create_test_app(
            ScriptedSource::returning(sample_response(10)),
            Selection::default(),
        );
        wait_ready(&state).await;

        let response = app
            .oneshot(put_json("/api/v1/selection", r#"{"chain_to": "ethereum"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let view: DashboardView = body_json(response).await;
        assert_eq!(view.chain_to, Chain::Ethereum);
        assert_eq!(view.status, ViewStatus::Idle);
        assert!(view.timeline.is_none());
    }

    #[tokio::test]
    async fn test_invalid_selection_rejected() {
        let (app, state) = create_test_app(ScriptedSource::empty(), Selection::default());

        for body in [r#"{"chain_from": "dogechain"}"#, r#"{"granularity": 3}"#] {
            let response = app
                .clone()
                .oneshot(put_json("/api/v1/selection", body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
        }

        assert_eq!(state.dashboard.view().chain_from, Chain::Ethereum);
    }

    #[tokio::test]
    async fn test_export_csv() {
        let (app, state) = create_test_app(
            ScriptedSource::returning(sample_response(3)),
            Selection::default(),
        );
        wait_ready(&state).await;

        let response = app
            .oneshot(get("/api/v1/export?format=csv"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "text/csv");

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.starts_with("date,blockchain,cumulative\n2024-01-01,0,100"));
        assert_eq!(text.lines().count(), 4);
    }

    #[tokio::test]
    async fn test_export_unknown_format_rejected() {
        let (app, state) = create_test_app(
            ScriptedSource::returning(sample_response(3)),
            Selection::default(),
        );
        wait_ready(&state).await;

        let response = app
            .clone()
            .oneshot(get("/api/v1/export?format=xml"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let response = app.oneshot(get("/api/v1/export?format=JSON")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "application/json");
    }

    #[tokio::test]
    async fn test_export_without_timeline() {
        let (app, _state) = create_test_app(
            ScriptedSource::empty(),
            Selection::new(Chain::Solana, Chain::Solana),
        );
        let response = app.oneshot(get("/api/v1/export")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let source = ScriptedSource::empty();
        let _gate = source.gate(Chain::Ethereum, Chain::Solana);
        let (app, _state) = create_test_app(source, Selection::default());
        let response = app.oneshot(get("/api/v1/export")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}

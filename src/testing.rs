//! Test fixtures shared across modules
//!
//! - [`sample_response`]: deterministic timeline payloads
//! - [`MockEndpoint`]: local axum server standing in for the TokenGuard endpoint
//! - [`ScriptedSource`]: in-process [`TimelineSource`] with per-pair gates
//! - [`CapturedLogs`]: in-memory log writer

use async_trait::async_trait;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use chrono::{Duration, TimeZone, Utc};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::chains::Chain;
use crate::timeline::{MetricGroup, TimelinePoint, TimelineResponse};
use crate::tokenguard::{TimelineRequest, TimelineSource, TokenGuardConfig, TokenGuardError};

const MOCK_PATH: &str = "/db-api/growth-index/basic-timeline-data";

/// `len` weekly points per group: blockchain values `0..len`, cumulative `100..100+len`
pub fn sample_response(len: usize) -> TimelineResponse {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let series = |offset: f64| {
        (0..len)
            .map(|i| {
                let date = start + Duration::weeks(i as i64);
                TimelinePoint::new(date.to_rfc3339(), offset + i as f64)
            })
            .collect()
    };

    TimelineResponse {
        cumulative: MetricGroup::new(series(100.0)),
        blockchain: MetricGroup::new(series(0.0)),
    }
}

struct MockState {
    status: StatusCode,
    body: serde_json::Value,
    requests: tokio::sync::Mutex<Vec<TimelineRequest>>,
}

/// Local HTTP server answering every timeline request with a fixed body
pub struct MockEndpoint {
    addr: SocketAddr,
    state: Arc<MockState>,
    server: JoinHandle<()>,
}

impl MockEndpoint {
    pub async fn start(response: TimelineResponse) -> Self {
        let body = serde_json::to_value(response).unwrap();
        Self::serve(StatusCode::OK, body).await
    }

    /// Answer 200 with an arbitrary JSON body
    pub async fn replying(body: serde_json::Value) -> Self {
        Self::serve(StatusCode::OK, body).await
    }

    pub async fn failing(status: u16) -> Self {
        let status = StatusCode::from_u16(status).unwrap();
        Self::serve(status, serde_json::json!({"error": "upstream failure"})).await
    }

    async fn serve(status: StatusCode, body: serde_json::Value) -> Self {
        let state = Arc::new(MockState {
            status,
            body,
            requests: tokio::sync::Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route(MOCK_PATH, post(handle_timeline))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            state,
            server,
        }
    }

    /// Client configuration pointing at this server
    pub fn config(&self) -> TokenGuardConfig {
        TokenGuardConfig {
            endpoint: format!("http://{}{}", self.addr, MOCK_PATH),
            request_timeout: Some(std::time::Duration::from_secs(5)),
        }
    }

    /// Request bodies received so far
    pub async fn requests(&self) -> Vec<TimelineRequest> {
        self.state.requests.lock().await.clone()
    }
}

impl Drop for MockEndpoint {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn handle_timeline(
    State(state): State<Arc<MockState>>,
    Json(request): Json<TimelineRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    state.requests.lock().await.push(request);
    (state.status, Json(state.body.clone()))
}

type GateResult = Result<TimelineResponse, TokenGuardError>;

/// Timeline source answering from memory
///
/// Pairs with a gate wait until the test releases them; other pairs get the
/// default response, or `Unavailable` when there is none.
pub struct ScriptedSource {
    response: Option<TimelineResponse>,
    calls: Mutex<Vec<(Chain, Chain)>>,
    gates: Mutex<HashMap<(Chain, Chain), oneshot::Receiver<GateResult>>>,
}

impl ScriptedSource {
    pub fn returning(response: TimelineResponse) -> Self {
        Self {
            response: Some(response),
            calls: Mutex::new(Vec::new()),
            gates: Mutex::new(HashMap::new()),
        }
    }

    pub fn empty() -> Self {
        Self {
            response: None,
            calls: Mutex::new(Vec::new()),
            gates: Mutex::new(HashMap::new()),
        }
    }

    /// Hold the next fetch for this pair until the returned sender fires
    pub fn gate(&self, chain_from: Chain, chain_to: Chain) -> oneshot::Sender<GateResult> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert((chain_from, chain_to), rx);
        tx
    }

    pub fn calls(&self) -> Vec<(Chain, Chain)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TimelineSource for ScriptedSource {
    async fn fetch(
        &self,
        chain_from: Chain,
        chain_to: Chain,
    ) -> Result<TimelineResponse, TokenGuardError> {
        self.calls.lock().unwrap().push((chain_from, chain_to));

        let gate = self.gates.lock().unwrap().remove(&(chain_from, chain_to));
        if let Some(gate) = gate {
            return gate.await.unwrap_or(Err(TokenGuardError::Unavailable));
        }

        self.response.clone().ok_or(TokenGuardError::Unavailable)
    }
}

/// Log sink collecting formatted events in memory
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

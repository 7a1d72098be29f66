//! HTTP surface: `POST /analyze` and `GET /health`.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use mosaic_ai::{AnalysisError, Analyzer, AnalyzerCell};
use mosaic_core::{AnalysisResult, AnalyzeRequest, AnalyzerConfig};
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

#[derive(Clone)]
struct AppState {
    cell: Arc<AnalyzerCell>,
}

pub fn router(cell: Arc<AnalyzerCell>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/analyze", post(analyze))
        .with_state(AppState { cell })
}

/// Load the analyzer, then serve until Ctrl-C.
///
/// The listener is only bound once loading succeeds; a load failure aborts
/// startup instead of serving a broken analyzer.
pub async fn run(config: AnalyzerConfig, bind: SocketAddr) -> anyhow::Result<()> {
    let cell = Arc::new(AnalyzerCell::new());

    let loader = cell.clone();
    tokio::task::spawn_blocking(move || loader.init(|| Analyzer::load(&config)))
        .await
        .context("analyzer loader panicked")?
        .context("loading analyzer")?;

    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("binding {bind}"))?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, router(cell))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

// ── Handlers ──

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    if state.cell.is_ready() {
        (StatusCode::OK, Json(json!({ "status": "ok" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "loading" })),
        )
    }
}

async fn analyze(
    State(state): State<AppState>,
    request: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let Json(request) = request?;
    let analyzer = state.cell.get().ok_or(ApiError::NotReady)?;
    // The forward pass is CPU-bound; keep it off the async workers.
    let result = tokio::task::spawn_blocking(move || analyzer.analyze(&request.text))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;
    Ok(Json(result))
}

// ── Errors ──

#[derive(Debug)]
enum ApiError {
    /// The body is not a well-formed `AnalyzeRequest`.
    BadRequest(String),
    NotReady,
    Analysis(AnalysisError),
    Internal(String),
}

impl From<AnalysisError> for ApiError {
    fn from(e: AnalysisError) -> Self {
        Self::Analysis(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotReady => (
                StatusCode::SERVICE_UNAVAILABLE,
                "analyzer is still loading".to_string(),
            ),
            Self::Analysis(e @ AnalysisError::InvalidInput(_)) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            Self::Analysis(e) => {
                error!(error = %e, "analysis failed");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            Self::Internal(msg) => {
                error!(error = %msg, "analysis task failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

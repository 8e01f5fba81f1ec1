//! HTTP surface.
//!
//! Flat result envelope: handler-level failures stay HTTP 200 with
//! `status: error`; only an empty/missing task is a 400 and only a missing
//! file on `/read` is a 404.

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Json, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::info;

use crate::config::AgentConfig;
use crate::dispatch::{Dispatcher, OperationOutcome};
use crate::errors::AgentError;
use crate::oracle::Oracle;
use crate::registry::OperationRegistry;

struct AppState {
    dispatcher: Dispatcher,
    data_root: PathBuf,
}

/// The agent server. Owns the dispatcher and the data root.
pub struct Agent {
    state: Arc<AppState>,
}

impl Agent {
    pub fn new(config: &AgentConfig, oracle: Arc<dyn Oracle>) -> Self {
        let registry = Arc::new(OperationRegistry::standard());
        let dispatcher = Dispatcher::new(registry, oracle, config.data_root.clone());
        Self {
            state: Arc::new(AppState {
                dispatcher,
                data_root: config.data_root.clone(),
            }),
        }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/run", post(run_handler))
            .route("/read", get(read_handler))
            .route("/health", get(health_handler))
            .with_state(self.state.clone())
    }

    pub async fn serve(self, bind_addr: &str) -> Result<(), String> {
        let listener = TcpListener::bind(bind_addr)
            .await
            .map_err(|e| format!("bind error on {}: {}", bind_addr, e))?;
        info!(bind_addr, "agent listening");
        axum::serve(listener, self.router().into_make_service())
            .await
            .map_err(|e| format!("server error: {}", e))
    }
}

#[derive(Debug, Deserialize)]
struct RunQuery {
    task: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RunBody {
    task: Option<String>,
}

async fn run_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RunQuery>,
    body: Option<Json<RunBody>>,
) -> (StatusCode, Json<OperationOutcome>) {
    // Body wins over the query parameter when both are present.
    let task = body
        .and_then(|Json(b)| b.task)
        .or(query.task)
        .unwrap_or_default();

    if task.trim().is_empty() {
        let outcome = OperationOutcome::failure(AgentError::InvalidInput(
            "task text is empty".to_string(),
        ));
        return (StatusCode::BAD_REQUEST, Json(outcome));
    }

    let outcome = state.dispatcher.run(&task).await;
    (StatusCode::OK, Json(outcome))
}

#[derive(Debug, Deserialize)]
struct ReadQuery {
    path: Option<String>,
}

async fn read_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReadQuery>,
) -> Result<String, StatusCode> {
    let path = query.path.ok_or(StatusCode::BAD_REQUEST)?;
    let trimmed = path
        .trim_start_matches("./")
        .trim_start_matches('/')
        .trim_start_matches("data/");
    let full = state.data_root.join(trimmed);
    match tokio::fs::read_to_string(&full).await {
        Ok(content) => Ok(content),
        Err(_) => Err(StatusCode::NOT_FOUND),
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

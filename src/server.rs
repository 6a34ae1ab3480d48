//! Webhook receiver — the authenticated HTTP surface.
//!
//! `POST /webhook` creates a job; `GET /jobs` and `GET /swarm` expose the
//! status tracker and the swarm view; `GET /health` is an unauthenticated
//! liveness probe. Internal failures are logged server-side and reported as a
//! generic 500 — no detail is serialized into the response.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::jobs::dispatch::{JobCreator, JobOptions};
use crate::jobs::status::StatusTracker;
use crate::jobs::swarm::SwarmAggregator;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    dispatcher: Arc<dyn JobCreator>,
    status: Arc<StatusTracker>,
    swarm: Arc<SwarmAggregator>,
    api_key: SecretString,
}

impl AppState {
    pub fn new(
        dispatcher: Arc<dyn JobCreator>,
        status: Arc<StatusTracker>,
        swarm: Arc<SwarmAggregator>,
        api_key: SecretString,
    ) -> Self {
        Self {
            dispatcher,
            status,
            swarm,
            api_key,
        }
    }
}

/// Build the receiver router. Everything except `/health` sits behind the
/// shared-secret check.
pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/webhook", post(create_job_handler))
        .route("/jobs", get(job_status_handler))
        .route("/swarm", get(swarm_status_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    Router::new()
        .route("/health", get(health))
        .merge(protected)
        .with_state(state)
}

/// Bind and serve until the process exits.
pub async fn serve(state: AppState, port: u16) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(port, "webhook receiver listening");
    axum::serve(listener, app(state)).await
}

/// Reject requests whose `x-api-key` header does not match the configured
/// secret, before any job logic runs.
async fn require_api_key(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let provided = req
        .headers()
        .get("x-api-key")
        .and_then(|value| value.to_str().ok());

    if provided != Some(state.api_key.expose_secret()) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": "Unauthorized" })),
        )
            .into_response();
    }
    next.run(req).await
}

#[derive(Debug, Deserialize)]
struct WebhookBody {
    job: Option<String>,
}

async fn create_job_handler(
    State(state): State<AppState>,
    Json(body): Json<WebhookBody>,
) -> Response {
    let Some(job) = body.job.filter(|job| !job.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "Missing job field" })),
        )
            .into_response();
    };

    match state.dispatcher.create_job(&job, &JobOptions::default()).await {
        Ok(created) => (StatusCode::OK, Json(created)).into_response(),
        Err(e) => {
            tracing::error!("job creation failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Failed to create job" })),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
struct StatusQuery {
    job: Option<String>,
}

async fn job_status_handler(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Response {
    match state.status.job_status(query.job.as_deref()).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => {
            tracing::error!("status query failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Failed to fetch job status" })),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
struct SwarmQuery {
    #[serde(default = "default_page")]
    page: u32,
}

fn default_page() -> u32 {
    1
}

async fn swarm_status_handler(
    State(state): State<AppState>,
    Query(query): Query<SwarmQuery>,
) -> Response {
    match state.swarm.swarm_status(query.page).await {
        Ok(status) => (StatusCode::OK, Json(status)).into_response(),
        Err(e) => {
            tracing::error!("swarm query failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Failed to fetch swarm status" })),
            )
                .into_response()
        }
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

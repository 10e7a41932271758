use std::net::SocketAddr;

use anyhow::Result;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use tower_http::cors::CorsLayer;

use zenith_core::relay::Relay;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Request parsing
// ---------------------------------------------------------------------------

/// Pull a non-empty string field out of a JSON request body.
///
/// A body that is missing, not JSON, or not an object is treated the same
/// as a body without the field.
fn required_field(body: &Bytes, field: &str) -> Result<String, AppError> {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| v.get(field).and_then(Value::as_str).map(str::to_string))
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::bad_request(format!("Missing {field}")))
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(relay: Relay) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/generate-plan", post(generate_plan))
        .route("/api/atomize", post(atomize))
        .route("/api/resources", post(resources))
        .layer(CorsLayer::permissive())
        .with_state(relay)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(relay: Relay, bind: &str, port: u16) -> Result<()> {
    let app = build_router(relay);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!("zenith serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("zenith serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install Ctrl+C handler: {err}");
        std::future::pending::<()>().await;
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn health() -> Json<Value> {
    Json(serde_json::json!({ "ok": true }))
}

async fn generate_plan(
    State(relay): State<Relay>,
    body: Bytes,
) -> Result<axum::response::Response, AppError> {
    let prompt = required_field(&body, "prompt")?;
    let plan = relay.plan.handle(&prompt).await;
    Ok(Json(plan).into_response())
}

async fn atomize(
    State(relay): State<Relay>,
    body: Bytes,
) -> Result<axum::response::Response, AppError> {
    let task_text = required_field(&body, "taskText")?;
    let result = relay.atomize.handle(&task_text).await;
    Ok(Json(result).into_response())
}

async fn resources(
    State(relay): State<Relay>,
    body: Bytes,
) -> Result<axum::response::Response, AppError> {
    let task_text = required_field(&body, "taskText")?;
    let result = relay.resources.handle(&task_text).await;
    Ok(Json(result).into_response())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! HTTP host for the tool registry: discovery at `GET /tools`, dispatch at
//! `POST /tools/:id`.

pub mod errors;
pub mod models;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::HeaderMap,
    response::Json,
    routing::get,
    Router,
};
use errors::ApiError;
use models::HealthResponse;
use oms_core::ExecutionContext;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tooling::{SharedRegistry, ToolDescriptor, ToolError, ToolInput};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

pub const APP_KEY_HEADER: &str = "x-vtex-api-appkey";
pub const APP_TOKEN_HEADER: &str = "x-vtex-api-apptoken";
pub const BASE_URL_HEADER: &str = "x-vtex-base-url";

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<SharedRegistry>,
    /// Context used when a request carries no overrides.
    pub defaults: ExecutionContext,
}

impl AppState {
    pub fn new(registry: Arc<SharedRegistry>, defaults: ExecutionContext) -> Self {
        Self { registry, defaults }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/tools", get(list_tools))
        .route("/tools/:id", get(describe_tool).post(call_tool))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        tools: state.registry.snapshot().tool_count(),
    })
}

async fn list_tools(State(state): State<AppState>) -> Json<Vec<ToolDescriptor>> {
    Json(state.registry.snapshot().descriptors())
}

async fn describe_tool(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ToolDescriptor>, ApiError> {
    Ok(Json(state.registry.snapshot().descriptor(&id)?))
}

async fn call_tool(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let request_id = Uuid::new_v4();
    let span = info_span!("tool_call", %request_id, tool = %id);

    dispatch(&state, &id, &headers, &body).instrument(span).await
}

async fn dispatch(
    state: &AppState,
    id: &str,
    headers: &HeaderMap,
    body: &Bytes,
) -> Result<Json<Value>, ApiError> {
    let ctx = context_from_headers(&state.defaults, headers)?;
    let input = ToolInput::from_value(id, parse_body(body)?)?;
    let registry = state.registry.snapshot();

    let started = Instant::now();
    match registry.execute_tool(input, &ctx).await {
        Ok(output) => {
            info!(elapsed_ms = started.elapsed().as_millis() as u64, "Tool call succeeded");
            Ok(Json(output))
        }
        Err(e) => {
            warn!(kind = e.kind(), error = %e, "Tool call failed");
            Err(e.into())
        }
    }
}

fn parse_body(body: &Bytes) -> Result<Value, ToolError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body)
        .map_err(|e| ToolError::validation("", format!("request body is not valid JSON: {}", e)))
}

/// Applies per-request credential and base URL overrides on top of the
/// configured defaults.
///
/// A base URL override is only honoured when the request also carries its
/// own credential pair.
pub fn context_from_headers(
    defaults: &ExecutionContext,
    headers: &HeaderMap,
) -> Result<ExecutionContext, ApiError> {
    let mut ctx = defaults.clone();

    let app_key = header_value(headers, APP_KEY_HEADER)?;
    let app_token = header_value(headers, APP_TOKEN_HEADER)?;
    let base_url = header_value(headers, BASE_URL_HEADER)?;

    if base_url.is_some() && (app_key.is_none() || app_token.is_none()) {
        return Err(ApiError::BaseUrlWithoutCredentials(BASE_URL_HEADER.to_string()));
    }

    if let Some(app_key) = app_key {
        ctx = ctx.with_app_key(app_key);
    }
    if let Some(app_token) = app_token {
        ctx = ctx.with_app_token(app_token);
    }
    if let Some(base_url) = base_url {
        ctx = ctx.with_base_url(base_url);
    }

    Ok(ctx)
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Result<Option<&'a str>, ApiError> {
    headers
        .get(name)
        .map(|value| {
            value
                .to_str()
                .map_err(|_| ApiError::InvalidHeader(name.to_string()))
        })
        .transpose()
}

//! Code generation, improvement, and autocomplete routes.
//!
//! Handlers are thin: validated body in, gateway call, response out.
//! Provider failures map to a 500 with a human-readable `detail`
//! message; malformed bodies never get this far (axum's `Json`
//! extractor rejects them with a 422).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

use crate::api::models::{
    AutocompleteRequest, AutocompleteResponse, GenerateCodeRequest, GenerateCodeResponse,
    ImproveCodeRequest, ImproveCodeResponse,
};
use crate::api::server::AppState;
use crate::error::CopilotError;

fn operation_failed(operation: &str, err: &CopilotError) -> Response {
    error!("{operation} failed: {err}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "detail": format!("{operation} failed: {err}") })),
    )
        .into_response()
}

/// POST /api/v1/code/generate
pub async fn generate_code(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateCodeRequest>,
) -> Response {
    let preview: String = req.prompt.chars().take(50).collect();
    info!(prompt = %preview, use_cache = req.use_cache, "generating code");

    match state
        .gateway
        .generate_code(&req.prompt, req.context.as_deref(), req.use_cache)
        .await
    {
        Ok(generated) => Json(GenerateCodeResponse {
            code: generated.code,
            cached: generated.cached,
            prompt: req.prompt,
        })
        .into_response(),
        Err(e) => operation_failed("Code generation", &e),
    }
}

/// POST /api/v1/code/improve
pub async fn improve_code(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ImproveCodeRequest>,
) -> Response {
    info!(chars = req.code.len(), "analyzing code");

    match state.gateway.improve_code(&req.code, req.focus_areas).await {
        Ok(improvement) => Json(ImproveCodeResponse {
            original_code: improvement.original_code,
            suggestions: improvement.suggestions,
            focus_areas: improvement.focus_areas,
        })
        .into_response(),
        Err(e) => operation_failed("Code improvement", &e),
    }
}

/// POST /api/v1/code/autocomplete
pub async fn autocomplete(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AutocompleteRequest>,
) -> Response {
    match state
        .gateway
        .autocomplete(&req.code_prefix, req.context.as_deref())
        .await
    {
        Ok(completions) => Json(AutocompleteResponse {
            completions,
            code_prefix: req.code_prefix,
        })
        .into_response(),
        Err(e) => operation_failed("Autocomplete", &e),
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Raw prompt passthrough and the provider connectivity probe.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info};

use crate::errors::{AppError, AppJson};
use crate::state::AppState;

const DEFAULT_MAX_TOKENS: u32 = 800;
const PROBE_MAX_TOKENS: u32 = 20;

#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    pub prompt: Option<String>,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub text: String,
}

/// POST /api/ai/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    AppJson(request): AppJson<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let prompt = request
        .prompt
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| AppError::Validation("prompt is required".to_string()))?;
    let max_tokens = request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS);

    info!(
        "Generate via {} ({}): {} chars, {max_tokens} tokens",
        state.llm.name(),
        state.llm.model(),
        prompt.len()
    );
    let text = state.llm.generate(prompt, max_tokens).await?;
    Ok(Json(GenerateResponse { text }))
}

/// GET /api/ai/test
///
/// Failures are reported as `{ok: false, error}` with 503 rather than the
/// usual error body, so the frontend can show a connection banner.
pub async fn handle_test(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let provider = state.llm.name();
    let prompt = format!("Reply with exactly: {provider} is working!");

    match state.llm.generate(&prompt, PROBE_MAX_TOKENS).await {
        Ok(response) => (
            StatusCode::OK,
            Json(json!({
                "ok": true,
                "provider": provider,
                "model": state.llm.model(),
                "response": response,
            })),
        ),
        Err(e) => {
            error!("Provider probe failed: {e}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "ok": false, "error": e.to_string() })),
            )
        }
    }
}

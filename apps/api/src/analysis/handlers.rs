//! Axum route handlers for the Resume API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::models::{AnalysisResult, MatchResult};
use crate::analysis::{pdf, service};
use crate::errors::{AppError, AppJson};
use crate::state::AppState;

/// Shortest resume text worth sending to the model.
pub const MIN_RESUME_CHARS: usize = 50;

/// Largest accepted PDF, counted on the file itself.
pub const MAX_PDF_BYTES: usize = 10 * 1024 * 1024;

const PDF_FIELD: &str = "resume";
const PDF_MIME: &str = "application/pdf";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct ParsePdfResponse {
    pub text: String,
    pub filename: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub resume_text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    pub resume_text: Option<String>,
    pub job_description: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Validation
// ────────────────────────────────────────────────────────────────────────────

fn validate_resume_text(text: Option<&str>) -> Result<&str, AppError> {
    match text {
        Some(t) if t.trim().chars().count() >= MIN_RESUME_CHARS => Ok(t),
        _ => Err(AppError::Validation(
            "Resume text is too short or missing".to_string(),
        )),
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.trim().is_empty())
}

fn validate_match(request: &MatchRequest) -> Result<(&str, &str), AppError> {
    match (present(&request.resume_text), present(&request.job_description)) {
        (Some(resume), Some(job)) => Ok((resume, job)),
        _ => Err(AppError::Validation(
            "Both resumeText and jobDescription are required".to_string(),
        )),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/resume/parse-pdf
///
/// Multipart upload; the PDF must arrive in the `resume` field. Files over
/// `MAX_PDF_BYTES` get a 413.
pub async fn handle_parse_pdf(mut multipart: Multipart) -> Result<Json<ParsePdfResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::upload(e, MAX_PDF_BYTES))?
    {
        if field.name() != Some(PDF_FIELD) {
            continue;
        }

        if field.content_type() != Some(PDF_MIME) {
            return Err(AppError::Validation("File must be a PDF".to_string()));
        }

        let filename = field.file_name().unwrap_or("resume.pdf").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::upload(e, MAX_PDF_BYTES))?;
        if data.len() > MAX_PDF_BYTES {
            return Err(AppError::UploadTooLarge {
                limit_mb: MAX_PDF_BYTES / (1024 * 1024),
            });
        }

        let text = pdf::extract_text(data).await?;
        info!("Parsed PDF '{filename}': {} chars", text.len());

        return Ok(Json(ParsePdfResponse { text, filename }));
    }

    Err(AppError::Validation("No PDF file uploaded".to_string()))
}

/// POST /api/resume/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    AppJson(request): AppJson<AnalyzeRequest>,
) -> Result<Json<AnalysisResult>, AppError> {
    let resume_text = validate_resume_text(request.resume_text.as_deref())?;
    let analysis = service::analyze_resume(state.llm.as_ref(), resume_text).await?;
    Ok(Json(analysis))
}

/// POST /api/resume/match
pub async fn handle_match(
    State(state): State<AppState>,
    AppJson(request): AppJson<MatchRequest>,
) -> Result<Json<MatchResult>, AppError> {
    let (resume_text, job_description) = validate_match(&request)?;
    let result = service::match_job(state.llm.as_ref(), resume_text, job_description).await?;
    Ok(Json(result))
}

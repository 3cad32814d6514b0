use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;

/// Extracts plain text from an uploaded PDF.
/// Parsing is CPU-bound and runs inside `spawn_blocking`. A panic inside the
/// parser surfaces as a PDF error.
pub async fn extract_text(data: Bytes) -> Result<String, AppError> {
    let size = data.len();
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
        .await
        .map_err(|e| AppError::Pdf(format!("extraction aborted: {e}")))?
        .map_err(|e| AppError::Pdf(e.to_string()))?;

    debug!("Extracted {} chars from {} byte PDF", text.len(), size);
    Ok(text.trim().to_string())
}

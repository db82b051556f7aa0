//! Axum route handlers for the Analysis API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::analysis::pipeline::{analyze_text, AnalysisReport};
use crate::errors::AppError;
use crate::extraction::extract_on_blocking_pool;
use crate::state::AppState;

/// Multipart field names accepted for the uploaded document.
const FILE_FIELDS: &[&str] = &["file", "resume"];

/// Content types accepted for the uploaded document.
const ACCEPTED_CONTENT_TYPES: &[&str] = &["application/pdf", "application/octet-stream"];

#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    pub text: String,
}

/// POST /api/v1/analyze
///
/// Accepts a multipart upload (field `file` or `resume`), extracts its text, and runs
/// the full analysis pipeline.
pub async fn handle_analyze_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisReport>, AppError> {
    let mut document: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        let is_file_field = field.name().is_some_and(|n| FILE_FIELDS.contains(&n));
        if !is_file_field {
            continue;
        }
        if let Some(content_type) = field.content_type() {
            if !ACCEPTED_CONTENT_TYPES.contains(&content_type) {
                return Err(AppError::Validation(format!(
                    "Unsupported content type '{content_type}'; upload a PDF"
                )));
            }
        }
        let file_name = field.file_name().unwrap_or("upload.pdf").to_string();
        let bytes = field.bytes().await?;
        document = Some((file_name, bytes.to_vec()));
        break;
    }

    let (file_name, bytes) = document.ok_or_else(|| {
        AppError::Validation("Multipart field 'file' with a PDF document is required".to_string())
    })?;
    if bytes.is_empty() {
        return Err(AppError::Validation(format!("Uploaded file '{file_name}' is empty")));
    }

    info!("Extracting text from '{file_name}' ({} bytes)", bytes.len());
    let text = extract_on_blocking_pool(state.extractor.clone(), bytes).await?;

    Ok(Json(analyze_text(&text, &state.critic).await))
}

/// POST /api/v1/analyze/text
///
/// Runs the pipeline on text that was already extracted by the caller.
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeTextRequest>,
) -> Result<Json<AnalysisReport>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }

    Ok(Json(analyze_text(&request.text, &state.critic).await))
}

//! Axum route handlers for the Job-Posting Extractor.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use tracing::info;

use crate::errors::AppError;
use crate::extraction::{create_job_from_posting, extract_pdf_text, ExtractionOutcome};
use crate::state::AppState;

/// POST /api/v1/jobs/extract
///
/// Multipart fields: `file` (the PDF posting, required), `job_name` (optional),
/// `prefer_generative` (optional, `true` unless set to `false`).
pub async fn handle_extract_job(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractionOutcome>, AppError> {
    let mut pdf: Option<Bytes> = None;
    let mut job_name: Option<String> = None;
    let mut prefer_generative = true;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                pdf = Some(field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read uploaded file: {e}"))
                })?);
            }
            "job_name" | "prefer_generative" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid field '{name}': {e}")))?;
                if name == "job_name" {
                    job_name = Some(value);
                } else {
                    prefer_generative = !value.trim().eq_ignore_ascii_case("false");
                }
            }
            _ => {}
        }
    }

    let pdf = pdf
        .filter(|b| !b.is_empty())
        .ok_or_else(|| AppError::Validation("multipart field 'file' is required".to_string()))?;
    info!("Processing PDF job posting ({} bytes)", pdf.len());

    let text = extract_pdf_text(pdf.to_vec()).await?;
    let outcome = create_job_from_posting(
        &state.extractor,
        &state.store,
        &text,
        job_name.as_deref(),
        prefer_generative,
    )
    .await?;

    info!("Created job {} from PDF posting", outcome.job_id);
    Ok(Json(outcome))
}

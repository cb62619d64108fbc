//! Axum route handlers for job analysis.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::analysis::{analyze_job, JobAnalysis, JobAnalysisOutcome};
use crate::errors::AppError;
use crate::models::default_true;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeJobRequest {
    /// Posting text; when absent the job's stored description is analyzed.
    #[serde(default)]
    pub job_text: Option<String>,
    #[serde(default = "default_true")]
    pub prefer_generative: bool,
    /// Recompute even when an analysis is already stored.
    #[serde(default)]
    pub force: bool,
}

/// POST /api/v1/jobs/:job_id/analysis
pub async fn handle_analyze_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Json(req): Json<AnalyzeJobRequest>,
) -> Result<Json<JobAnalysisOutcome>, AppError> {
    let outcome = analyze_job(
        &state.analyzer,
        &state.store,
        &job_id,
        req.job_text.as_deref(),
        req.prefer_generative,
        req.force,
    )
    .await?;
    Ok(Json(outcome))
}

/// GET /api/v1/jobs/:job_id/analysis
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<JobAnalysis>, AppError> {
    let analysis = state
        .store
        .load_analysis(&job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No analysis stored for job {job_id}")))?;
    Ok(Json(analysis))
}

//! Axum route handlers for the Content Optimizer.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::{analyze_job, JobAnalysis};
use crate::errors::AppError;
use crate::models::{default_true, Achievement, TailoredRole};
use crate::optimization::selection::{tailor_roles, CandidateProfile};
use crate::optimization::{derive_strategy, ContentStrategy, OptimizedContent};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Job-scoped
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jobs/:job_id/strategy
pub async fn handle_job_strategy(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<ContentStrategy>, AppError> {
    let analysis = state
        .store
        .load_analysis(&job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No analysis stored for job {job_id}")))?;
    Ok(Json(derive_strategy(&analysis)))
}

#[derive(Debug, Deserialize)]
pub struct TailorRequest {
    #[serde(flatten)]
    pub profile: CandidateProfile,
    /// When false, no analysis is run and the job's content preferences drive
    /// a basic selection.
    #[serde(default = "default_true")]
    pub prefer_generative: bool,
    #[serde(default)]
    pub force_reanalysis: bool,
}

#[derive(Debug, Serialize)]
pub struct TailorResponse {
    pub job_id: String,
    pub analysis_used: bool,
    pub roles: Vec<TailoredRole>,
}

/// POST /api/v1/jobs/:job_id/tailor
pub async fn handle_tailor(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Json(req): Json<TailorRequest>,
) -> Result<Json<TailorResponse>, AppError> {
    if !state.store.exists(&job_id)? {
        return Err(AppError::NotFound(format!("Job {job_id} not found")));
    }
    if req.profile.roles.is_empty() {
        return Err(AppError::Validation("roles must not be empty".to_string()));
    }

    let preferences = state
        .store
        .load_prompt_vars(&job_id)
        .await?
        .map(|vars| vars.content_preferences)
        .unwrap_or_default();

    let analysis = if req.prefer_generative {
        match analyze_job(
            &state.analyzer,
            &state.store,
            &job_id,
            None,
            true,
            req.force_reanalysis,
        )
        .await
        {
            Ok(outcome) => Some(outcome.analysis),
            // Nothing to analyze yet: tailor from the job's preferences alone.
            Err(AppError::NotFound(msg)) => {
                info!("{msg}; using basic content selection");
                None
            }
            Err(e) => return Err(e),
        }
    } else {
        None
    };

    info!(
        "Tailoring {} roles for job {job_id} (analysis: {})",
        req.profile.roles.len(),
        analysis.is_some()
    );
    let roles = tailor_roles(
        &state.optimizer,
        &req.profile,
        analysis.as_ref(),
        &preferences,
        req.prefer_generative,
    )
    .await;

    Ok(Json(TailorResponse {
        job_id,
        analysis_used: analysis.is_some(),
        roles,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Stateless
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct OptimizeAchievementRequest {
    pub achievement: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default = "default_true")]
    pub prefer_generative: bool,
}

/// POST /api/v1/achievements/optimize
pub async fn handle_optimize_achievement(
    State(state): State<AppState>,
    Json(req): Json<OptimizeAchievementRequest>,
) -> Result<Json<OptimizedContent>, AppError> {
    if req.achievement.trim().is_empty() {
        return Err(AppError::Validation(
            "achievement must not be empty".to_string(),
        ));
    }

    let content = state
        .optimizer
        .optimize(
            &req.achievement,
            &req.requirements,
            req.context.as_deref(),
            req.prefer_generative,
        )
        .await;
    Ok(Json(content))
}

#[derive(Debug, Deserialize)]
pub struct PrioritizeRequest {
    pub achievements: Vec<Achievement>,
    pub analysis: JobAnalysis,
    #[serde(default = "default_true")]
    pub prefer_generative: bool,
}

/// POST /api/v1/achievements/prioritize
pub async fn handle_prioritize(
    State(state): State<AppState>,
    Json(req): Json<PrioritizeRequest>,
) -> Result<Json<Vec<Achievement>>, AppError> {
    let analysis = req.analysis.capped();
    let ordered = state
        .optimizer
        .prioritize(req.achievements, &analysis, req.prefer_generative)
        .await;
    Ok(Json(ordered))
}

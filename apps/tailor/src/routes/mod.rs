pub mod backends;
pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::extraction::handlers as extraction;
use crate::optimization::handlers as optimization;
use crate::state::AppState;

/// Upload cap for PDF postings.
const MAX_PDF_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/backends", get(backends::backends_handler))
        // Job analysis
        .route(
            "/api/v1/jobs/:job_id/analysis",
            get(analysis::handle_get_analysis).post(analysis::handle_analyze_job),
        )
        // Content optimization
        .route(
            "/api/v1/jobs/:job_id/strategy",
            post(optimization::handle_job_strategy),
        )
        .route("/api/v1/jobs/:job_id/tailor", post(optimization::handle_tailor))
        .route(
            "/api/v1/achievements/optimize",
            post(optimization::handle_optimize_achievement),
        )
        .route(
            "/api/v1/achievements/prioritize",
            post(optimization::handle_prioritize),
        )
        // Job-posting extraction
        .route(
            "/api/v1/jobs/extract",
            post(extraction::handle_extract_job).layer(DefaultBodyLimit::max(MAX_PDF_BYTES)),
        )
        .with_state(state)
}

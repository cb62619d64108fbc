//! Job-Posting Extractor — bootstraps a job folder from a PDF posting.
//!
//! PDF bytes → text → `ExtractedJobInfo` (generative parse, rule-based fallback)
//! → `job_description.md` + `prompt_vars.yaml` in the job store.

use std::sync::Arc;

use chrono::Local;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::analysis::AnalysisError;
use crate::errors::AppError;
use crate::llm_client::{Gateway, GenerationRequest};
use crate::store::JobStore;

pub mod handlers;
pub mod job_folder;
pub mod parse;
pub mod prompts;

const EXTRACTION_MAX_TOKENS: u32 = 2000;
const EXTRACTION_TEMPERATURE: f32 = 0.1;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Failed to read PDF: {0}")]
    Pdf(String),

    #[error("PDF contains no extractable text")]
    EmptyText,
}

/// Structured fields of one job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedJobInfo {
    pub company: String,
    pub role: String,
    pub location: String,
    pub job_type: String,
    pub raw_description: String,
    pub key_requirements: Vec<String>,
    pub nice_to_have: Vec<String>,
    pub company_culture: String,
    pub salary_range: String,
    /// As written in the posting; empty when not stated.
    pub experience_level: String,
}

/// Extracts the text layer of a PDF. Runs on the blocking pool since parsing
/// is CPU-bound and `pdf-extract` can panic on malformed input.
pub async fn extract_pdf_text(bytes: Vec<u8>) -> Result<String, ExtractionError> {
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| ExtractionError::Pdf(e.to_string()))?
        .map_err(|e| ExtractionError::Pdf(e.to_string()))?;

    if text.trim().is_empty() {
        return Err(ExtractionError::EmptyText);
    }
    info!("Extracted {} characters of PDF text", text.chars().count());
    Ok(text)
}

pub struct JobExtractor {
    /// Present only when the gateway's default backend is configured.
    gateway: Option<Arc<Gateway>>,
}

impl JobExtractor {
    pub fn new(gateway: Option<Arc<Gateway>>) -> Self {
        Self {
            gateway: gateway.filter(|g| g.default_available()),
        }
    }

    pub fn rule_based_only() -> Self {
        Self { gateway: None }
    }

    /// Extracts job fields from posting text. Never fails: generative failures
    /// are logged and the rule-based extraction is used instead.
    pub async fn extract(&self, text: &str, prefer_generative: bool) -> ExtractedJobInfo {
        if let Some(gateway) = self.gateway.as_deref().filter(|_| prefer_generative) {
            match generative_extraction(gateway, text).await {
                Ok(info) => {
                    info!("Extracted job info for: {} - {}", info.company, info.role);
                    return info;
                }
                Err(e) => warn!("Generative extraction failed: {e}"),
            }
        }

        info!("Using rule-based job extraction");
        parse::rule_based_extraction(text)
    }
}

async fn generative_extraction(
    gateway: &Gateway,
    text: &str,
) -> Result<ExtractedJobInfo, AnalysisError> {
    let request = GenerationRequest::new(prompts::job_extraction_prompt(text))
        .max_tokens(EXTRACTION_MAX_TOKENS)
        .temperature(EXTRACTION_TEMPERATURE);

    let reply = gateway
        .generate(request)
        .await?
        .into_result()
        .map_err(AnalysisError::Generation)?;

    parse::parse_extraction_reply(&reply, text)
}

/// Result of bootstrapping a job from a posting.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionOutcome {
    pub job_id: String,
    pub job_dir: String,
    pub job_info: ExtractedJobInfo,
}

/// Extracts job fields from posting text and writes a new job folder. The job
/// identifier defaults to `YYYY-MM-DD_company_role`.
pub async fn create_job_from_posting(
    extractor: &JobExtractor,
    store: &JobStore,
    text: &str,
    job_name: Option<&str>,
    prefer_generative: bool,
) -> Result<ExtractionOutcome, AppError> {
    let job_info = extractor.extract(text, prefer_generative).await;

    let job_id = match job_name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => name.to_string(),
        None => job_folder::job_name(&job_info, Local::now().date_naive()),
    };

    let dir = store
        .create_job(
            &job_id,
            &job_folder::description_markdown(&job_info),
            &job_folder::prompt_vars_for(&job_info),
        )
        .await?;

    Ok(ExtractionOutcome {
        job_id,
        job_dir: dir.display().to_string(),
        job_info,
    })
}

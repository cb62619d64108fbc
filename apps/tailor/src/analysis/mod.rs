//! Job Analyzer — turns raw job-posting text into a structured `JobAnalysis`.
//!
//! Two interchangeable strategies implement `Analyzer`: a generative parser that
//! goes through the gateway, and a deterministic rule-based extractor. `JobAnalyzer`
//! tries the former and falls back to the latter on any failure, so analysis
//! itself never fails.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::{Gateway, GatewayError};
use crate::store::JobStore;

pub mod generative;
pub mod handlers;
pub mod heuristics;
pub mod prompts;
pub mod rule_based;

pub use generative::GenerativeAnalyzer;
pub use rule_based::RuleBasedAnalyzer;

pub const MAX_REQUIRED_SKILLS: usize = 10;
pub const MAX_PREFERRED_SKILLS: usize = 8;
pub const MAX_RESPONSIBILITIES: usize = 8;
pub const MAX_CULTURE_SIGNALS: usize = 6;
pub const MAX_OPTIMIZATION_KEYWORDS: usize = 15;

// ────────────────────────────────────────────────────────────────────────────
// Closed vocabularies
// ────────────────────────────────────────────────────────────────────────────

/// Whether the role leans technical, people-leadership, or both.
/// Unrecognized values always degrade to `Hybrid`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleFocus {
    Technical,
    Leadership,
    #[default]
    Hybrid,
}

impl RoleFocus {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "technical" => RoleFocus::Technical,
            "leadership" => RoleFocus::Leadership,
            _ => RoleFocus::Hybrid,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleFocus::Technical => "technical",
            RoleFocus::Leadership => "leadership",
            RoleFocus::Hybrid => "hybrid",
        }
    }
}

/// Seniority of the posting. Unrecognized values always degrade to `Mid`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Junior,
    #[default]
    Mid,
    Senior,
    Executive,
}

impl ExperienceLevel {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "junior" => ExperienceLevel::Junior,
            "mid" => ExperienceLevel::Mid,
            "senior" => ExperienceLevel::Senior,
            "executive" => ExperienceLevel::Executive,
            _ => ExperienceLevel::Mid,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Junior => "junior",
            ExperienceLevel::Mid => "mid",
            ExperienceLevel::Senior => "senior",
            ExperienceLevel::Executive => "executive",
        }
    }
}

/// Industry of the hiring company. `Technology` is the catch-all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndustryDomain {
    Fintech,
    Healthcare,
    Enterprise,
    Consumer,
    Ecommerce,
    Media,
    #[default]
    Technology,
}

impl IndustryDomain {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "fintech" => IndustryDomain::Fintech,
            "healthcare" => IndustryDomain::Healthcare,
            "enterprise" => IndustryDomain::Enterprise,
            "consumer" => IndustryDomain::Consumer,
            "ecommerce" => IndustryDomain::Ecommerce,
            "media" => IndustryDomain::Media,
            _ => IndustryDomain::Technology,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IndustryDomain::Fintech => "fintech",
            IndustryDomain::Healthcare => "healthcare",
            IndustryDomain::Enterprise => "enterprise",
            IndustryDomain::Consumer => "consumer",
            IndustryDomain::Ecommerce => "ecommerce",
            IndustryDomain::Media => "media",
            IndustryDomain::Technology => "technology",
        }
    }
}

// Stored records are read leniently: an unknown value becomes the default variant.
impl<'de> Deserialize<'de> for RoleFocus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(RoleFocus::parse(&String::deserialize(deserializer)?))
    }
}

impl<'de> Deserialize<'de> for ExperienceLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(ExperienceLevel::parse(&String::deserialize(deserializer)?))
    }
}

impl<'de> Deserialize<'de> for IndustryDomain {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(IndustryDomain::parse(&String::deserialize(deserializer)?))
    }
}

impl fmt::Display for RoleFocus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for IndustryDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// JobAnalysis
// ────────────────────────────────────────────────────────────────────────────

/// Structured insight extracted from one job posting.
///
/// Field order is the persisted field order. Every construction path ends in
/// `capped()`, so list caps hold no matter where the record came from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobAnalysis {
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub key_responsibilities: Vec<String>,
    pub company_culture: Vec<String>,
    pub optimization_keywords: Vec<String>,
    pub role_focus: RoleFocus,
    pub experience_level: ExperienceLevel,
    pub industry_domain: IndustryDomain,
}

impl JobAnalysis {
    /// Truncates every list to its cap.
    pub fn capped(mut self) -> Self {
        self.required_skills.truncate(MAX_REQUIRED_SKILLS);
        self.preferred_skills.truncate(MAX_PREFERRED_SKILLS);
        self.key_responsibilities.truncate(MAX_RESPONSIBILITIES);
        self.company_culture.truncate(MAX_CULTURE_SIGNALS);
        self.optimization_keywords.truncate(MAX_OPTIMIZATION_KEYWORDS);
        self
    }

    /// Required skills followed by responsibilities: the requirement set used
    /// for ranking and rewriting.
    pub fn requirements(&self) -> Vec<String> {
        self.required_skills
            .iter()
            .chain(self.key_responsibilities.iter())
            .cloned()
            .collect()
    }

    /// Required skills followed by preferred skills.
    pub fn all_skills(&self) -> Vec<String> {
        self.required_skills
            .iter()
            .chain(self.preferred_skills.iter())
            .cloned()
            .collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Strategy pair
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("generation unavailable: {0}")]
    Gateway(#[from] GatewayError),

    #[error("generation failed: {0}")]
    Generation(String),

    #[error("unusable generation reply: {0}")]
    UnusableReply(String),
}

/// One way of producing a `JobAnalysis` from posting text.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Short label for logs.
    fn name(&self) -> &'static str;

    async fn analyze(&self, text: &str) -> Result<JobAnalysis, AnalysisError>;
}

/// Tries the generative analyzer when one is configured and preferred, and falls
/// back to the rule-based analyzer on any failure.
pub struct JobAnalyzer {
    primary: Option<Box<dyn Analyzer>>,
    fallback: RuleBasedAnalyzer,
}

impl JobAnalyzer {
    /// The generative path is enabled only when the gateway's default backend is configured.
    pub fn new(gateway: Option<Arc<Gateway>>) -> Self {
        let primary = gateway
            .filter(|g| g.default_available())
            .map(|g| Box::new(GenerativeAnalyzer::new(g)) as Box<dyn Analyzer>);
        Self {
            primary,
            fallback: RuleBasedAnalyzer,
        }
    }

    pub fn rule_based_only() -> Self {
        Self {
            primary: None,
            fallback: RuleBasedAnalyzer,
        }
    }

    pub fn generative_available(&self) -> bool {
        self.primary.is_some()
    }

    /// Analyzes a posting. Never fails: generative failures are logged and the
    /// deterministic path is used instead.
    pub async fn analyze(&self, text: &str, prefer_generative: bool) -> JobAnalysis {
        info!("Starting job description analysis...");

        match (&self.primary, prefer_generative) {
            (Some(primary), true) => match primary.analyze(text).await {
                Ok(analysis) => return analysis,
                Err(e) => {
                    warn!("{} analysis failed: {e}", primary.name());
                    info!("Falling back to rule-based analysis");
                }
            },
            _ => info!("Using rule-based analysis (generation not available or disabled)"),
        }

        self.fallback.analyze_text(text)
    }
}

/// Result of `analyze_job`: the analysis plus whether it came from the store.
#[derive(Debug, Clone, Serialize)]
pub struct JobAnalysisOutcome {
    pub job_id: String,
    pub cached: bool,
    pub analysis: JobAnalysis,
}

/// Returns the stored analysis for `job_id` unless `force` is set; otherwise
/// analyzes `job_text` (or the job's stored description) and persists the result.
pub async fn analyze_job(
    analyzer: &JobAnalyzer,
    store: &JobStore,
    job_id: &str,
    job_text: Option<&str>,
    prefer_generative: bool,
    force: bool,
) -> Result<JobAnalysisOutcome, AppError> {
    if !force {
        if let Some(analysis) = store.load_analysis(job_id).await? {
            info!("Using existing job analysis for {job_id}");
            return Ok(JobAnalysisOutcome {
                job_id: job_id.to_string(),
                cached: true,
                analysis,
            });
        }
    }

    let description = match job_text.map(str::trim).filter(|t| !t.is_empty()) {
        Some(text) => text.to_string(),
        None => store
            .load_job_description(job_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job description not found for {job_id}")))?,
    };

    let analysis = analyzer.analyze(&description, prefer_generative).await;
    store.save_analysis(&analysis, job_id).await?;

    Ok(JobAnalysisOutcome {
        job_id: job_id.to_string(),
        cached: false,
        analysis,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::{gateway_with, ScriptedBackend};
    use crate::llm_client::BackendKind;

    const POSTING: &str = "Senior Backend Engineer. Experience with Rust, PostgreSQL and Kafka. \
        You will design payment APIs, mentor engineers, and own on-call rotations.";

    #[test]
    fn test_closed_enums_degrade_unknown_values() {
        assert_eq!(RoleFocus::parse("player-coach"), RoleFocus::Hybrid);
        assert_eq!(ExperienceLevel::parse("principal"), ExperienceLevel::Mid);
        assert_eq!(IndustryDomain::parse("aerospace"), IndustryDomain::Technology);
        assert_eq!(ExperienceLevel::parse(" Senior "), ExperienceLevel::Senior);
    }

    #[test]
    fn test_closed_enums_deserialize_leniently() {
        let json = r#"{"role_focus": "visionary", "experience_level": "staff", "industry_domain": "fintech"}"#;
        let analysis: JobAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.role_focus, RoleFocus::Hybrid);
        assert_eq!(analysis.experience_level, ExperienceLevel::Mid);
        assert_eq!(analysis.industry_domain, IndustryDomain::Fintech);
        assert!(analysis.required_skills.is_empty());
    }

    #[test]
    fn test_closed_enums_serialize_lowercase() {
        let analysis = JobAnalysis::default();
        let value = serde_json::to_value(&analysis).unwrap();
        assert_eq!(value["role_focus"], "hybrid");
        assert_eq!(value["experience_level"], "mid");
        assert_eq!(value["industry_domain"], "technology");
    }

    #[test]
    fn test_capped_enforces_every_list_cap() {
        let many = |n: usize| (0..n).map(|i| format!("item {i}")).collect::<Vec<_>>();
        let analysis = JobAnalysis {
            required_skills: many(20),
            preferred_skills: many(20),
            key_responsibilities: many(20),
            company_culture: many(20),
            optimization_keywords: many(20),
            ..JobAnalysis::default()
        }
        .capped();

        assert_eq!(analysis.required_skills.len(), MAX_REQUIRED_SKILLS);
        assert_eq!(analysis.preferred_skills.len(), MAX_PREFERRED_SKILLS);
        assert_eq!(analysis.key_responsibilities.len(), MAX_RESPONSIBILITIES);
        assert_eq!(analysis.company_culture.len(), MAX_CULTURE_SIGNALS);
        assert_eq!(analysis.optimization_keywords.len(), MAX_OPTIMIZATION_KEYWORDS);
        assert_eq!(analysis.required_skills[0], "item 0");
    }

    #[test]
    fn test_requirements_are_skills_then_responsibilities() {
        let analysis = JobAnalysis {
            required_skills: vec!["Rust".to_string()],
            preferred_skills: vec!["Go".to_string()],
            key_responsibilities: vec!["Own payments".to_string()],
            ..JobAnalysis::default()
        };
        assert_eq!(analysis.requirements(), vec!["Rust", "Own payments"]);
        assert_eq!(analysis.all_skills(), vec!["Rust", "Go"]);
    }

    #[tokio::test]
    async fn test_generative_reply_is_used_when_preferred() {
        let reply = "1. REQUIRED SKILLS\n- Rust\n\n6. ROLE FOCUS\nTechnical";
        let backend = Arc::new(ScriptedBackend::new(BackendKind::OpenAi).reply(reply));
        let analyzer = JobAnalyzer::new(Some(gateway_with(backend)));

        let analysis = analyzer.analyze(POSTING, true).await;
        assert_eq!(analysis.required_skills, vec!["Rust"]);
        assert_eq!(analysis.role_focus, RoleFocus::Technical);
    }

    #[tokio::test]
    async fn test_generation_failure_falls_back_to_rules() {
        let backend = Arc::new(ScriptedBackend::new(BackendKind::OpenAi).fail("timeout"));
        let analyzer = JobAnalyzer::new(Some(gateway_with(backend)));

        let analysis = analyzer.analyze(POSTING, true).await;
        assert_eq!(analysis, RuleBasedAnalyzer.analyze_text(POSTING));
    }

    #[tokio::test]
    async fn test_unusable_reply_falls_back_to_rules() {
        let backend = Arc::new(
            ScriptedBackend::new(BackendKind::OpenAi).reply("Sorry, I cannot help with that."),
        );
        let analyzer = JobAnalyzer::new(Some(gateway_with(backend)));

        let analysis = analyzer.analyze(POSTING, true).await;
        assert_eq!(analysis, RuleBasedAnalyzer.analyze_text(POSTING));
    }

    #[tokio::test]
    async fn test_not_preferred_skips_generation() {
        let backend = Arc::new(ScriptedBackend::new(BackendKind::OpenAi).reply("unused"));
        let analyzer = JobAnalyzer::new(Some(gateway_with(backend.clone())));

        analyzer.analyze(POSTING, false).await;
        assert!(backend.prompts().is_empty());
    }

    #[test]
    fn test_unconfigured_default_backend_disables_generation() {
        let backend = Arc::new(ScriptedBackend::new(BackendKind::Anthropic));
        let gateway = Gateway::new(BackendKind::OpenAi, std::time::Duration::ZERO)
            .with_backend(backend);
        let analyzer = JobAnalyzer::new(Some(Arc::new(gateway)));
        assert!(!analyzer.generative_available());
    }

    #[tokio::test]
    async fn test_analyze_job_uses_cache_unless_forced() {
        let dir = tempfile::tempdir().unwrap();
        let store = JobStore::new(dir.path());
        let analyzer = JobAnalyzer::rule_based_only();

        let first = analyze_job(&analyzer, &store, "acme", Some(POSTING), false, false)
            .await
            .unwrap();
        assert!(!first.cached);

        let second = analyze_job(&analyzer, &store, "acme", None, false, false)
            .await
            .unwrap();
        assert!(second.cached);
        assert_eq!(second.analysis, first.analysis);

        let forced = analyze_job(&analyzer, &store, "acme", Some("Junior analyst role."), false, true)
            .await
            .unwrap();
        assert!(!forced.cached);
        assert_eq!(forced.analysis.experience_level, ExperienceLevel::Junior);
    }

    #[tokio::test]
    async fn test_analyze_job_without_description_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = JobStore::new(dir.path());
        let analyzer = JobAnalyzer::rule_based_only();

        let err = analyze_job(&analyzer, &store, "missing", None, false, false)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}

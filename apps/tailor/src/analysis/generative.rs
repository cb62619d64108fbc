//! Generative job analysis: one gateway call, then section-anchored parsing of
//! the free-text reply.

use std::sync::Arc;

use async_trait::async_trait;
use lazy_static::lazy_static;
use tracing::info;

use crate::analysis::prompts::job_analysis_prompt;
use crate::analysis::{heuristics, AnalysisError, Analyzer, JobAnalysis, RoleFocus};
use crate::llm_client::sections::{list_items, Header, SectionScanner};
use crate::llm_client::{Gateway, GenerationRequest};

const ANALYSIS_MAX_TOKENS: u32 = 1500;

lazy_static! {
    static ref REQUIRED_SKILLS: Header = Header::inline("REQUIRED SKILLS");
    static ref PREFERRED_SKILLS: Header = Header::inline("PREFERRED SKILLS");
    static ref KEY_RESPONSIBILITIES: Header = Header::inline("KEY RESPONSIBILITIES");
    static ref COMPANY_CULTURE: Header = Header::inline("COMPANY CULTURE(?: INDICATORS)?");
    static ref KEYWORDS: Header = Header::inline("KEYWORDS(?: FOR OPTIMIZATION)?");
    static ref ROLE_FOCUS: Header = Header::inline("ROLE FOCUS");
}

pub struct GenerativeAnalyzer {
    gateway: Arc<Gateway>,
}

impl GenerativeAnalyzer {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl Analyzer for GenerativeAnalyzer {
    fn name(&self) -> &'static str {
        "generative"
    }

    async fn analyze(&self, text: &str) -> Result<JobAnalysis, AnalysisError> {
        info!("Performing generative job analysis...");

        let request = GenerationRequest::new(job_analysis_prompt(text)).max_tokens(ANALYSIS_MAX_TOKENS);
        let reply = self
            .gateway
            .generate(request)
            .await?
            .into_result()
            .map_err(AnalysisError::Generation)?;

        let analysis = parse_analysis_reply(&reply)?;
        info!("Generative analysis completed successfully");
        Ok(analysis)
    }
}

/// Parses a reply to the job analysis prompt.
///
/// Missing sections take their defaults. A reply with no recognizable section
/// at all is rejected so the caller can fall back.
pub fn parse_analysis_reply(reply: &str) -> Result<JobAnalysis, AnalysisError> {
    if reply.trim().is_empty() {
        return Err(AnalysisError::UnusableReply("empty reply".to_string()));
    }

    let scanner = SectionScanner::NUMBERED;
    let required = scanner.section(reply, &REQUIRED_SKILLS);
    let preferred = scanner.section(reply, &PREFERRED_SKILLS);
    let responsibilities = scanner.section(reply, &KEY_RESPONSIBILITIES);
    let culture = scanner.section(reply, &COMPANY_CULTURE);
    let keywords = scanner.section(reply, &KEYWORDS);
    let role_focus = scanner.section(reply, &ROLE_FOCUS);

    let found = [required, preferred, responsibilities, culture, keywords, role_focus];
    if found.iter().all(Option::is_none) {
        return Err(AnalysisError::UnusableReply(
            "no recognizable sections".to_string(),
        ));
    }

    let items = |section: Option<&str>| section.map(|s| list_items(s, 0)).unwrap_or_default();

    Ok(JobAnalysis {
        required_skills: items(required),
        preferred_skills: items(preferred),
        key_responsibilities: items(responsibilities),
        company_culture: items(culture),
        optimization_keywords: items(keywords),
        role_focus: role_focus
            .map(heuristics::role_focus_from_section)
            .unwrap_or(RoleFocus::Hybrid),
        // The reply rarely isolates these, so they are read from the whole text.
        experience_level: heuristics::experience_level(reply),
        industry_domain: heuristics::industry_domain(reply),
    }
    .capped())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{ExperienceLevel, IndustryDomain};
    use crate::llm_client::testing::{gateway_with, ScriptedBackend};
    use crate::llm_client::BackendKind;

    const REPLY: &str = "\
1. REQUIRED SKILLS (must-have technical and soft skills)
- Rust
- Distributed systems
- 5+ years building backend services

2. PREFERRED SKILLS
- Kafka

3. KEY RESPONSIBILITIES
- Design payments infrastructure
- Mentor engineers

4. COMPANY CULTURE INDICATORS
- Remote-first

5. KEYWORDS FOR OPTIMIZATION
- latency
- reliability

6. ROLE FOCUS
Technical, with light mentoring";

    #[test]
    fn test_parse_full_reply() {
        let analysis = parse_analysis_reply(REPLY).unwrap();

        assert_eq!(
            analysis.required_skills,
            vec!["Rust", "Distributed systems", "5+ years building backend services"]
        );
        assert_eq!(analysis.preferred_skills, vec!["Kafka"]);
        assert_eq!(
            analysis.key_responsibilities,
            vec!["Design payments infrastructure", "Mentor engineers"]
        );
        assert_eq!(analysis.company_culture, vec!["Remote-first"]);
        assert_eq!(analysis.optimization_keywords, vec!["latency", "reliability"]);
        assert_eq!(analysis.role_focus, RoleFocus::Technical);
        assert_eq!(analysis.experience_level, ExperienceLevel::Senior);
        assert_eq!(analysis.industry_domain, IndustryDomain::Fintech);
    }

    #[test]
    fn test_parse_partial_reply_uses_defaults() {
        let analysis = parse_analysis_reply("REQUIRED SKILLS:\n- SQL\n- Excel").unwrap();

        assert_eq!(analysis.required_skills, vec!["SQL", "Excel"]);
        assert!(analysis.preferred_skills.is_empty());
        assert!(analysis.optimization_keywords.is_empty());
        assert_eq!(analysis.role_focus, RoleFocus::Hybrid);
        assert_eq!(analysis.experience_level, ExperienceLevel::Mid);
        assert_eq!(analysis.industry_domain, IndustryDomain::Technology);
    }

    #[test]
    fn test_parse_caps_long_sections() {
        let skills = (0..25).map(|i| format!("- skill {i}")).collect::<Vec<_>>().join("\n");
        let reply = format!("1. REQUIRED SKILLS\n{skills}\n5. KEYWORDS\n{skills}");
        let analysis = parse_analysis_reply(&reply).unwrap();

        assert_eq!(analysis.required_skills.len(), 10);
        assert_eq!(analysis.optimization_keywords.len(), 15);
    }

    #[test]
    fn test_parse_rejects_unstructured_reply() {
        let err = parse_analysis_reply("I'm not able to analyze this posting.").unwrap_err();
        assert!(matches!(err, AnalysisError::UnusableReply(_)));
    }

    #[test]
    fn test_parse_rejects_empty_reply() {
        assert!(parse_analysis_reply("  \n").is_err());
    }

    #[tokio::test]
    async fn test_analyze_sends_posting_in_prompt() {
        let backend = Arc::new(ScriptedBackend::new(BackendKind::Anthropic).reply(REPLY));
        let analyzer = GenerativeAnalyzer::new(gateway_with(backend.clone()));

        let analysis = analyzer.analyze("Staff engineer, payments").await.unwrap();
        assert_eq!(analysis.preferred_skills, vec!["Kafka"]);

        let prompts = backend.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Staff engineer, payments"));
    }

    #[tokio::test]
    async fn test_analyze_reports_transport_failure() {
        let backend = Arc::new(ScriptedBackend::new(BackendKind::OpenAi).fail("overloaded"));
        let analyzer = GenerativeAnalyzer::new(gateway_with(backend));

        let err = analyzer.analyze("posting").await.unwrap_err();
        assert!(matches!(err, AnalysisError::Generation(ref msg) if msg.contains("overloaded")));
    }
}

//! Reading an `ExtractedJobInfo` out of a generative reply, or out of the
//! posting itself when generation is not used.

use lazy_static::lazy_static;

use crate::analysis::rule_based::RuleBasedAnalyzer;
use crate::analysis::AnalysisError;
use crate::extraction::ExtractedJobInfo;
use crate::llm_client::sections::{labeled_field, list_items, Header, SectionScanner};

/// Characters of the posting kept as the description when the reply has none.
const DESCRIPTION_FALLBACK_CHARS: usize = 2000;
const MAX_LIST_ITEMS: usize = 15;
/// List lines this short are noise ("-", "N/A").
const MIN_ITEM_CHARS: usize = 3;

pub const UNKNOWN_COMPANY: &str = "Unknown Company";
pub const UNKNOWN_ROLE: &str = "Unknown Role";
pub const UNKNOWN_LOCATION: &str = "Unknown Location";
pub const DEFAULT_JOB_TYPE: &str = "Full-time";

lazy_static! {
    static ref JOB_DESCRIPTION: Header = Header::line("## JOB DESCRIPTION");
    static ref KEY_REQUIREMENTS: Header = Header::line("## KEY REQUIREMENTS");
    static ref NICE_TO_HAVE: Header = Header::line("## NICE TO HAVE");
    static ref COMPANY_CULTURE: Header = Header::line("## COMPANY CULTURE");
}

/// Parses a reply to the extraction prompt. Missing fields take their
/// defaults; a reply with neither a labeled field nor a known section is rejected.
pub fn parse_extraction_reply(reply: &str, source: &str) -> Result<ExtractedJobInfo, AnalysisError> {
    if reply.trim().is_empty() {
        return Err(AnalysisError::UnusableReply("empty reply".to_string()));
    }

    let scanner = SectionScanner::MARKDOWN;
    let company = labeled_field(reply, "Company Name");
    let role = labeled_field(reply, "Job Title");
    let description = scanner.section(reply, &JOB_DESCRIPTION);
    let requirements = scanner.section(reply, &KEY_REQUIREMENTS);
    let nice_to_have = scanner.section(reply, &NICE_TO_HAVE);
    let culture = scanner.section(reply, &COMPANY_CULTURE);

    if company.is_none()
        && role.is_none()
        && [description, requirements, nice_to_have, culture]
            .iter()
            .all(Option::is_none)
    {
        return Err(AnalysisError::UnusableReply(
            "no job fields or sections".to_string(),
        ));
    }

    Ok(ExtractedJobInfo {
        company: company.unwrap_or_else(|| UNKNOWN_COMPANY.to_string()),
        role: role.unwrap_or_else(|| UNKNOWN_ROLE.to_string()),
        location: labeled_field(reply, "Location").unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
        job_type: labeled_field(reply, "Job Type").unwrap_or_else(|| DEFAULT_JOB_TYPE.to_string()),
        raw_description: description
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| leading_chars(source)),
        key_requirements: requirements.map(extracted_items).unwrap_or_default(),
        nice_to_have: nice_to_have.map(extracted_items).unwrap_or_default(),
        company_culture: culture.unwrap_or_default().to_string(),
        salary_range: labeled_field(reply, "Salary Range").unwrap_or_default(),
        experience_level: labeled_field(reply, "Experience Level").unwrap_or_default(),
    })
}

/// Deterministic extraction: the rule-based job analysis supplies requirements
/// and seniority; everything the posting does not label takes its default.
pub fn rule_based_extraction(source: &str) -> ExtractedJobInfo {
    let analysis = RuleBasedAnalyzer.analyze_text(source);

    ExtractedJobInfo {
        company: UNKNOWN_COMPANY.to_string(),
        role: UNKNOWN_ROLE.to_string(),
        location: UNKNOWN_LOCATION.to_string(),
        job_type: DEFAULT_JOB_TYPE.to_string(),
        raw_description: leading_chars(source),
        key_requirements: analysis.required_skills,
        nice_to_have: analysis.preferred_skills,
        company_culture: String::new(),
        salary_range: String::new(),
        experience_level: analysis.experience_level.to_string(),
    }
}

fn extracted_items(content: &str) -> Vec<String> {
    list_items(content, MIN_ITEM_CHARS)
        .into_iter()
        .take(MAX_LIST_ITEMS)
        .collect()
}

fn leading_chars(source: &str) -> String {
    source
        .trim()
        .chars()
        .take(DESCRIPTION_FALLBACK_CHARS)
        .collect()
}

//! Turning an `ExtractedJobInfo` into the files of a new job folder.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

use crate::extraction::ExtractedJobInfo;
use crate::llm_client::prompts::bullet_list;
use crate::models::{AiInstructions, ContentPreferences, PromptVars};

const EMPHASIS_AREAS: usize = 5;
const STARTUP_MARKERS: &[&str] = &["startup", "fast-paced", "agile"];
const LEADERSHIP_TITLE_MARKERS: &[&str] = &["manager", "lead", "director"];
const SENIOR_LEVELS: &[&str] = &["senior", "executive"];

lazy_static! {
    static ref NAME_NOISE: Regex = Regex::new(r"[^\w\s-]").unwrap();
}

/// Default job identifier: `YYYY-MM-DD_company_role`.
pub fn job_name(info: &ExtractedJobInfo, date: NaiveDate) -> String {
    format!(
        "{}_{}_{}",
        date.format("%Y-%m-%d"),
        name_part(&info.company),
        name_part(&info.role)
    )
}

fn name_part(value: &str) -> String {
    NAME_NOISE
        .replace_all(value, "")
        .replace(' ', "_")
        .to_lowercase()
}

/// The `job_description.md` document for a newly extracted job.
pub fn description_markdown(info: &ExtractedJobInfo) -> String {
    let mut doc = format!(
        "# Job Description\n\n\
         **Company:** {}\n\
         **Role:** {}\n\
         **Location:** {}\n\
         **Type:** {}\n",
        info.company, info.role, info.location, info.job_type
    );
    if !info.experience_level.is_empty() {
        doc.push_str(&format!("**Experience Level:** {}\n", info.experience_level));
    }
    if !info.salary_range.is_empty() {
        doc.push_str(&format!("**Salary Range:** {}\n", info.salary_range));
    }

    doc.push_str(&format!("\n## Job Description\n\n{}\n", info.raw_description));
    doc.push_str(&format!("\n## Key Requirements\n{}\n", bullet_list(&info.key_requirements)));
    doc.push_str(&format!("\n## Nice to Have\n{}\n", bullet_list(&info.nice_to_have)));
    if !info.company_culture.is_empty() {
        doc.push_str(&format!(
            "\n## Company Culture Notes\n{}\n",
            info.company_culture
        ));
    }

    doc.push_str("\n---\n*Auto-generated from PDF job posting*\n");
    doc
}

/// Initial `prompt_vars.yaml` content for a newly extracted job.
pub fn prompt_vars_for(info: &ExtractedJobInfo) -> PromptVars {
    let culture = info.company_culture.to_lowercase();
    let company_culture = if STARTUP_MARKERS.iter().any(|m| culture.contains(m)) {
        "startup"
    } else {
        "enterprise"
    };

    let level = info.experience_level.trim().to_lowercase();
    let max_achievements_per_role = if SENIOR_LEVELS.contains(&level.as_str()) {
        4
    } else {
        3
    };

    let title = info.role.to_lowercase();
    let focus = if LEADERSHIP_TITLE_MARKERS.iter().any(|m| title.contains(m)) {
        "leadership"
    } else {
        "technical"
    };

    PromptVars {
        target_role: info.role.clone(),
        company_name: info.company.clone(),
        company_culture: company_culture.to_string(),
        key_requirements: info.key_requirements.clone(),
        nice_to_have: info.nice_to_have.clone(),
        emphasis_areas: info
            .key_requirements
            .iter()
            .take(EMPHASIS_AREAS)
            .cloned()
            .collect(),
        content_preferences: ContentPreferences {
            max_achievements_per_role,
            ..ContentPreferences::default()
        },
        ai_instructions: AiInstructions {
            focus: focus.to_string(),
            ..AiInstructions::default()
        },
    }
}

//! Deterministic job analysis: lead-in phrase patterns plus keyword heuristics.
//! Needs no backend and always produces a structurally valid `JobAnalysis`.

use std::collections::HashSet;

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;

use crate::analysis::{heuristics, AnalysisError, Analyzer, JobAnalysis};

const MAX_SKILLS: usize = 15;
const MAX_KEYWORDS: usize = 10;
const MAX_RESPONSIBILITIES: usize = 8;
/// Share of the skill list treated as required; the rest is preferred.
const REQUIRED_SHARE: f64 = 0.6;

lazy_static! {
    static ref SKILL_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?:experience with|knowledge of|proficient in|skilled in)\s+([^.]+)").unwrap(),
        Regex::new(r"(?:required|must have|essential).*?:\s*([^.]+)").unwrap(),
        Regex::new(r"(?:technologies|tools|languages).*?:\s*([^.]+)").unwrap(),
    ];
    static ref SKILL_SEPARATOR: Regex = Regex::new(r"[,;]|\s+and\s+|\s+or\s+").unwrap();
    static ref RESPONSIBILITY_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?:responsibilities|duties|will be responsible for).*?:\s*([^.]+)").unwrap(),
        Regex::new(r"(?:you will|the role involves|responsibilities include)\s+([^.]+)").unwrap(),
    ];
    static ref CLAUSE_SEPARATOR: Regex = Regex::new(r"[,;]").unwrap();
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedAnalyzer;

impl RuleBasedAnalyzer {
    pub fn analyze_text(&self, text: &str) -> JobAnalysis {
        let lower = text.to_lowercase();

        let skills = extract_skills(&lower);
        let split_point = ((skills.len() as f64 * REQUIRED_SHARE) as usize)
            .max(1)
            .min(skills.len());

        JobAnalysis {
            required_skills: skills[..split_point].to_vec(),
            preferred_skills: skills[split_point..].to_vec(),
            key_responsibilities: extract_responsibilities(&lower),
            company_culture: Vec::new(),
            optimization_keywords: skills.iter().take(MAX_KEYWORDS).cloned().collect(),
            role_focus: heuristics::role_focus_from_posting(&lower),
            experience_level: heuristics::experience_level(text),
            industry_domain: heuristics::industry_domain(text),
        }
        .capped()
    }
}

#[async_trait]
impl Analyzer for RuleBasedAnalyzer {
    fn name(&self) -> &'static str {
        "rule-based"
    }

    async fn analyze(&self, text: &str) -> Result<JobAnalysis, AnalysisError> {
        Ok(self.analyze_text(text))
    }
}

/// Ordered, de-duplicated, title-cased skill tokens.
fn extract_skills(lower: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut skills = Vec::new();

    for pattern in SKILL_PATTERNS.iter() {
        for caps in pattern.captures_iter(lower) {
            for token in SKILL_SEPARATOR.split(&caps[1]) {
                let token = token.trim();
                let len = token.chars().count();
                if len <= 2 || len >= 30 {
                    continue;
                }
                let skill = title_case(token);
                if seen.insert(skill.clone()) {
                    skills.push(skill);
                }
            }
        }
    }

    skills.truncate(MAX_SKILLS);
    skills
}

fn extract_responsibilities(lower: &str) -> Vec<String> {
    let mut responsibilities = Vec::new();

    for pattern in RESPONSIBILITY_PATTERNS.iter() {
        for caps in pattern.captures_iter(lower) {
            for clause in CLAUSE_SEPARATOR.split(&caps[1]) {
                let clause = clause.trim();
                if clause.chars().count() > 10 {
                    responsibilities.push(capitalize(clause));
                }
            }
        }
    }

    responsibilities.truncate(MAX_RESPONSIBILITIES);
    responsibilities
}

/// Upper-cases the first letter of every run of letters: `ci/cd` → `Ci/Cd`.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

//! Deterministic keyword-overlap scoring.
//!
//! A requirement "matches" a text when any whitespace-separated word of the
//! requirement occurs as a substring of the text, both lowercased.

use crate::models::Achievement;

/// Verbs that mark an achievement as impact-oriented.
pub const IMPACT_VERBS: &[&str] = &[
    "led",
    "managed",
    "increased",
    "reduced",
    "improved",
    "generated",
    "delivered",
];

const QUANTIFIED_BONUS: f64 = 0.5;
const IMPACT_BONUS: f64 = 0.3;
/// Relevance against an empty requirement list: no evidence either way.
const NEUTRAL_RELEVANCE: f64 = 0.5;

fn matches(text_lower: &str, requirement: &str) -> bool {
    requirement
        .to_lowercase()
        .split_whitespace()
        .any(|word| text_lower.contains(word))
}

/// Requirements with any word overlap with `text`, in requirement order.
pub fn matched_requirements<'a>(text: &str, requirements: &'a [String]) -> Vec<&'a str> {
    let lower = text.to_lowercase();
    requirements
        .iter()
        .filter(|req| matches(&lower, req))
        .map(String::as_str)
        .collect()
}

/// Share of requirements matched, capped at 1. An empty list scores 0.5.
pub fn relevance_score(text: &str, requirements: &[String]) -> f64 {
    if requirements.is_empty() {
        return NEUTRAL_RELEVANCE;
    }
    let matched = matched_requirements(text, requirements).len();
    (matched as f64 / requirements.len() as f64).min(1.0)
}

/// Share of requirements matched with the denominator floored at 1, so an
/// empty list scores 0.
pub fn overlap_fraction(matched: usize, requirements: usize) -> f64 {
    matched as f64 / requirements.max(1) as f64
}

/// Ranking score: matched requirements, plus bonuses for being quantified and
/// for using an impact verb.
pub fn composite_score(achievement: &Achievement, requirements: &[String]) -> f64 {
    let text = achievement.achievement.to_lowercase();
    let mut score = requirements.iter().filter(|req| matches(&text, req)).count() as f64;

    if achievement.quantified {
        score += QUANTIFIED_BONUS;
    }
    if IMPACT_VERBS.iter().any(|verb| text.contains(verb)) {
        score += IMPACT_BONUS;
    }
    score
}

/// Sorts by composite score, highest first. Ties keep their input order.
pub fn rank_by_score(achievements: Vec<Achievement>, requirements: &[String]) -> Vec<Achievement> {
    let mut scored: Vec<(f64, Achievement)> = achievements
        .into_iter()
        .map(|a| (composite_score(&a, requirements), a))
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().map(|(_, a)| a).collect()
}

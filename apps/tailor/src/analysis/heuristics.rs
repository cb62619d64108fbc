//! Keyword heuristics shared by both analyzers.
//!
//! All matching is case-insensitive substring matching. Lists are checked in
//! order and the first hit wins.

use crate::analysis::{ExperienceLevel, IndustryDomain, RoleFocus};

const JUNIOR_MARKERS: &[&str] = &["entry level", "junior", "0-2 years", "new grad"];
const SENIOR_MARKERS: &[&str] = &["senior", "5+ years", "7+ years", "experienced"];
const EXECUTIVE_MARKERS: &[&str] = &["director", "vp", "executive", "c-level"];

const DOMAIN_MARKERS: &[(IndustryDomain, &[&str])] = &[
    (
        IndustryDomain::Fintech,
        &["fintech", "financial", "banking", "payments", "crypto"],
    ),
    (
        IndustryDomain::Healthcare,
        &["healthcare", "medical", "health", "pharma", "biotech"],
    ),
    (
        IndustryDomain::Enterprise,
        &["enterprise", "b2b", "saas", "cloud", "infrastructure"],
    ),
    (
        IndustryDomain::Consumer,
        &["consumer", "b2c", "mobile", "social", "gaming"],
    ),
    (
        IndustryDomain::Ecommerce,
        &["ecommerce", "retail", "marketplace", "commerce"],
    ),
    (
        IndustryDomain::Media,
        &["media", "streaming", "content", "entertainment", "advertising"],
    ),
];

const LEADERSHIP_MARKERS: &[&str] = &["manager", "lead", "director", "leadership", "team"];
const TECHNICAL_MARKERS: &[&str] = &["engineer", "developer", "programmer", "technical"];
const TECHNICAL_LEADERSHIP_MARKERS: &[&str] = &["technical", "engineering", "development"];

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// junior → senior → executive, defaulting to mid.
pub fn experience_level(text: &str) -> ExperienceLevel {
    let lower = text.to_lowercase();
    if contains_any(&lower, JUNIOR_MARKERS) {
        ExperienceLevel::Junior
    } else if contains_any(&lower, SENIOR_MARKERS) {
        ExperienceLevel::Senior
    } else if contains_any(&lower, EXECUTIVE_MARKERS) {
        ExperienceLevel::Executive
    } else {
        ExperienceLevel::Mid
    }
}

pub fn industry_domain(text: &str) -> IndustryDomain {
    let lower = text.to_lowercase();
    DOMAIN_MARKERS
        .iter()
        .find(|(_, markers)| contains_any(&lower, markers))
        .map(|(domain, _)| *domain)
        .unwrap_or_default()
}

/// Role focus as stated in a generated ROLE FOCUS section. Naming both (or
/// neither) reads as hybrid.
pub fn role_focus_from_section(section: &str) -> RoleFocus {
    let lower = section.to_lowercase();
    match (lower.contains("technical"), lower.contains("leadership")) {
        (true, false) => RoleFocus::Technical,
        (false, true) => RoleFocus::Leadership,
        _ => RoleFocus::Hybrid,
    }
}

/// Role focus inferred from the posting itself.
pub fn role_focus_from_posting(text: &str) -> RoleFocus {
    let lower = text.to_lowercase();
    if contains_any(&lower, LEADERSHIP_MARKERS) {
        if contains_any(&lower, TECHNICAL_LEADERSHIP_MARKERS) {
            RoleFocus::Hybrid
        } else {
            RoleFocus::Leadership
        }
    } else if contains_any(&lower, TECHNICAL_MARKERS) {
        RoleFocus::Technical
    } else {
        RoleFocus::Hybrid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experience_level_junior_wins_over_senior() {
        assert_eq!(
            experience_level("Junior role reporting to a senior engineer"),
            ExperienceLevel::Junior
        );
    }

    #[test]
    fn test_experience_level_senior_from_years() {
        assert_eq!(experience_level("5+ years of Go"), ExperienceLevel::Senior);
    }

    #[test]
    fn test_experience_level_executive() {
        assert_eq!(experience_level("VP of Engineering"), ExperienceLevel::Executive);
    }

    #[test]
    fn test_experience_level_defaults_to_mid() {
        assert_eq!(experience_level("Backend engineer"), ExperienceLevel::Mid);
    }

    #[test]
    fn test_industry_domain_first_list_wins() {
        // "payments" (fintech) is checked before "cloud" (enterprise)
        assert_eq!(
            industry_domain("Cloud payments platform"),
            IndustryDomain::Fintech
        );
        assert_eq!(industry_domain("Biotech research"), IndustryDomain::Healthcare);
        assert_eq!(industry_domain("Online marketplace"), IndustryDomain::Ecommerce);
    }

    #[test]
    fn test_industry_domain_defaults_to_technology() {
        assert_eq!(industry_domain("Compiler engineer"), IndustryDomain::Technology);
    }

    #[test]
    fn test_role_focus_from_section() {
        assert_eq!(role_focus_from_section("Technical IC"), RoleFocus::Technical);
        assert_eq!(role_focus_from_section("Leadership"), RoleFocus::Leadership);
        assert_eq!(role_focus_from_section("Both"), RoleFocus::Hybrid);
        assert_eq!(
            role_focus_from_section("Technical leadership"),
            RoleFocus::Hybrid
        );
    }

    #[test]
    fn test_role_focus_from_posting_leadership_only() {
        assert_eq!(
            role_focus_from_posting("Sales manager for our regional office"),
            RoleFocus::Leadership
        );
    }

    #[test]
    fn test_role_focus_from_posting_technical_leadership_is_hybrid() {
        assert_eq!(
            role_focus_from_posting("Engineering manager for the platform group"),
            RoleFocus::Hybrid
        );
    }

    #[test]
    fn test_role_focus_from_posting_technical() {
        assert_eq!(
            role_focus_from_posting("Backend developer writing Rust"),
            RoleFocus::Technical
        );
    }

    #[test]
    fn test_role_focus_from_posting_defaults_to_hybrid() {
        assert_eq!(role_focus_from_posting("Data analyst"), RoleFocus::Hybrid);
    }
}

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::{ExperienceLevel, JobAnalysis, RoleFocus};

/// Voice the tailored content should carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tone {
    Technical,
    Leadership,
    ResultsFocused,
}

impl From<RoleFocus> for Tone {
    fn from(focus: RoleFocus) -> Self {
        match focus {
            RoleFocus::Technical => Tone::Technical,
            RoleFocus::Leadership => Tone::Leadership,
            RoleFocus::Hybrid => Tone::ResultsFocused,
        }
    }
}

/// Emphasis rules for tailoring content to one job analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentStrategy {
    pub focus_areas: Vec<String>,
    pub keywords_to_include: Vec<String>,
    pub tone: Tone,
    pub max_achievements_per_role: usize,
    pub prioritize_quantified: bool,
}

pub fn max_achievements_for(level: ExperienceLevel) -> usize {
    match level {
        ExperienceLevel::Junior => 2,
        ExperienceLevel::Mid => 3,
        ExperienceLevel::Senior => 4,
        ExperienceLevel::Executive => 5,
    }
}

pub fn derive_strategy(analysis: &JobAnalysis) -> ContentStrategy {
    let focus_areas = analysis
        .required_skills
        .iter()
        .take(5)
        .chain(analysis.key_responsibilities.iter().take(3))
        .cloned()
        .collect();

    let keywords_to_include = analysis
        .optimization_keywords
        .iter()
        .take(10)
        .chain(analysis.required_skills.iter().take(5))
        .cloned()
        .collect();

    let strategy = ContentStrategy {
        focus_areas,
        keywords_to_include,
        tone: analysis.role_focus.into(),
        max_achievements_per_role: max_achievements_for(analysis.experience_level),
        prioritize_quantified: true,
    };

    info!(
        "Strategy created - tone: {:?}, max achievements: {}",
        strategy.tone, strategy.max_achievements_per_role
    );
    strategy
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{prefix}{i}")).collect()
    }

    #[test]
    fn test_focus_areas_and_keywords() {
        let analysis = JobAnalysis {
            required_skills: strings("req", 8),
            key_responsibilities: strings("resp", 6),
            optimization_keywords: strings("kw", 12),
            ..JobAnalysis::default()
        };
        let strategy = derive_strategy(&analysis);

        assert_eq!(
            strategy.focus_areas,
            vec!["req0", "req1", "req2", "req3", "req4", "resp0", "resp1", "resp2"]
        );
        assert_eq!(strategy.keywords_to_include.len(), 15);
        assert_eq!(strategy.keywords_to_include[9], "kw9");
        assert_eq!(strategy.keywords_to_include[10], "req0");
        assert!(strategy.prioritize_quantified);
    }

    #[test]
    fn test_tone_follows_role_focus() {
        let mut analysis = JobAnalysis::default();
        assert_eq!(derive_strategy(&analysis).tone, Tone::ResultsFocused);

        analysis.role_focus = RoleFocus::Leadership;
        assert_eq!(derive_strategy(&analysis).tone, Tone::Leadership);

        analysis.role_focus = RoleFocus::Technical;
        assert_eq!(derive_strategy(&analysis).tone, Tone::Technical);
    }

    #[test]
    fn test_executive_gets_five_achievements() {
        let analysis = JobAnalysis {
            experience_level: ExperienceLevel::Executive,
            ..JobAnalysis::default()
        };
        assert_eq!(derive_strategy(&analysis).max_achievements_per_role, 5);
    }

    #[test]
    fn test_unrecognized_level_gets_three_achievements() {
        let level = ExperienceLevel::parse("distinguished");
        assert_eq!(max_achievements_for(level), 3);
        assert_eq!(max_achievements_for(ExperienceLevel::Junior), 2);
        assert_eq!(max_achievements_for(ExperienceLevel::Senior), 4);
    }

    #[test]
    fn test_tone_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_value(Tone::ResultsFocused).unwrap(),
            "results-focused"
        );
    }
}

//! Achievement prioritization: a generative ranking with the composite-score
//! sort as fallback. The output is always a permutation of the input.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::analysis::JobAnalysis;
use crate::llm_client::sections::{Header, SectionScanner};
use crate::llm_client::{Gateway, GenerationRequest};
use crate::models::Achievement;
use crate::optimization::prompts::prioritization_prompt;
use crate::optimization::scoring::rank_by_score;
use crate::optimization::{ContentOptimizer, OptimizeError};

const PRIORITIZE_MAX_TOKENS: u32 = 800;

lazy_static! {
    static ref RANKED_ACHIEVEMENTS: Header = Header::inline(r"\d+\.[ \t]*RANKED(?: ACHIEVEMENTS)?|RANKED ACHIEVEMENTS");
    static ref INDEX: Regex = Regex::new(r"\b\d+\b").unwrap();
}

/// Reads the 0-based ranking out of a reply's RANKED ACHIEVEMENTS section.
///
/// Numbers are 1-based in the reply. Out-of-range numbers are dropped and
/// repeats keep their first position. No section, or no usable number, is empty.
pub fn parse_ranking(reply: &str, count: usize) -> Vec<usize> {
    let Some(section) = SectionScanner::NUMBERED.section(reply, &RANKED_ACHIEVEMENTS) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    INDEX
        .find_iter(section)
        .filter_map(|m| m.as_str().parse::<usize>().ok())
        .filter(|n| (1..=count).contains(n))
        .map(|n| n - 1)
        .filter(|i| seen.insert(*i))
        .collect()
}

/// Reorders `items` by `ranking`; items never mentioned follow in input order.
pub fn apply_ranking<T>(items: Vec<T>, ranking: &[usize]) -> Vec<T> {
    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let mut ordered = Vec::with_capacity(slots.len());

    for &index in ranking {
        if let Some(item) = slots.get_mut(index).and_then(Option::take) {
            ordered.push(item);
        }
    }
    ordered.extend(slots.into_iter().flatten());
    ordered
}

impl ContentOptimizer {
    /// Orders achievements by relevance to the analysed job. Never drops one.
    pub async fn prioritize(
        &self,
        achievements: Vec<Achievement>,
        analysis: &JobAnalysis,
        prefer_generative: bool,
    ) -> Vec<Achievement> {
        info!(
            "Prioritizing {} achievements for job relevance...",
            achievements.len()
        );
        if achievements.len() < 2 {
            return achievements;
        }

        if let Some(gateway) = self.generative(prefer_generative) {
            match generative_ranking(gateway, &achievements, analysis).await {
                Ok(ranking) => {
                    info!("Generative prioritization completed successfully");
                    return apply_ranking(achievements, &ranking);
                }
                Err(e) => warn!("Generative prioritization failed: {e}"),
            }
        }

        let ranked = rank_by_score(achievements, &analysis.requirements());
        info!("Rule-based prioritization completed");
        ranked
    }
}

async fn generative_ranking(
    gateway: &Gateway,
    achievements: &[Achievement],
    analysis: &JobAnalysis,
) -> Result<Vec<usize>, OptimizeError> {
    let texts: Vec<&str> = achievements.iter().map(|a| a.achievement.as_str()).collect();
    let prompt = prioritization_prompt(&texts, &analysis.all_skills(), &analysis.requirements());

    let reply = gateway
        .generate(GenerationRequest::new(prompt).max_tokens(PRIORITIZE_MAX_TOKENS))
        .await?
        .into_result()
        .map_err(OptimizeError::Generation)?;

    let ranking = parse_ranking(&reply, achievements.len());
    if ranking.is_empty() {
        return Err(OptimizeError::NoRanking);
    }
    Ok(ranking)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::llm_client::testing::{gateway_with, ScriptedBackend};
    use crate::llm_client::BackendKind;

    fn achievements(texts: &[&str]) -> Vec<Achievement> {
        texts.iter().map(|t| Achievement::new(*t)).collect()
    }

    fn texts(items: &[Achievement]) -> Vec<&str> {
        items.iter().map(|a| a.achievement.as_str()).collect()
    }

    fn analysis() -> JobAnalysis {
        JobAnalysis {
            required_skills: vec!["team leadership".to_string()],
            key_responsibilities: vec!["payments".to_string()],
            ..JobAnalysis::default()
        }
    }

    #[test]
    fn test_parse_ranking_inline() {
        assert_eq!(parse_ranking("RANKED ACHIEVEMENTS: 3, 1, 2", 3), vec![2, 0, 1]);
    }

    #[test]
    fn test_parse_ranking_numbered_sections() {
        let reply = "1. RANKED ACHIEVEMENTS (most relevant first)\n#2, #4, #1\n\n\
2. PRIORITY SKILLS\n3, 3, 3";
        assert_eq!(parse_ranking(reply, 4), vec![1, 3, 0]);
    }

    #[test]
    fn test_parse_ranking_drops_out_of_range_and_repeats() {
        assert_eq!(parse_ranking("RANKED ACHIEVEMENTS: 0, 2, 9, 2, 1", 3), vec![1, 0]);
    }

    #[test]
    fn test_parse_ranking_without_section_is_empty() {
        assert!(parse_ranking("I would put the second one first.", 3).is_empty());
    }

    #[test]
    fn test_apply_ranking_appends_unranked_in_order() {
        let ordered = apply_ranking(vec!['a', 'b', 'c', 'd'], &[2]);
        assert_eq!(ordered, vec!['c', 'a', 'b', 'd']);
    }

    #[test]
    fn test_apply_ranking_is_always_a_permutation() {
        let rankings: [&[usize]; 4] = [&[], &[3, 2, 1, 0], &[1, 1, 7], &[0, 4]];
        for ranking in rankings {
            let mut ordered = apply_ranking(vec![0, 1, 2, 3, 4], ranking);
            assert_eq!(ordered.len(), 5);
            ordered.sort();
            assert_eq!(ordered, vec![0, 1, 2, 3, 4]);
        }
    }

    #[tokio::test]
    async fn test_generative_ranking_reorders() {
        let backend = Arc::new(
            ScriptedBackend::new(BackendKind::OpenAi).reply("RANKED ACHIEVEMENTS: 3, 1, 2"),
        );
        let optimizer = ContentOptimizer::new(Some(gateway_with(backend.clone())), 3.0);

        let ordered = optimizer
            .prioritize(achievements(&["one", "two", "three"]), &analysis(), true)
            .await;
        assert_eq!(texts(&ordered), vec!["three", "one", "two"]);
        assert!(backend.prompts()[0].contains("1. one\n2. two\n3. three"));
    }

    #[tokio::test]
    async fn test_reply_without_ranking_falls_back_to_scores() {
        let backend = Arc::new(ScriptedBackend::new(BackendKind::OpenAi).reply("No idea."));
        let optimizer = ContentOptimizer::new(Some(gateway_with(backend)), 3.0);

        let ordered = optimizer
            .prioritize(
                achievements(&[
                    "Organized the office party",
                    "Led a team of 5 engineers to build a payment system",
                ]),
                &analysis(),
                true,
            )
            .await;
        assert_eq!(ordered[0].achievement, "Led a team of 5 engineers to build a payment system");
    }

    #[tokio::test]
    async fn test_failed_call_falls_back_to_scores() {
        let backend = Arc::new(ScriptedBackend::new(BackendKind::OpenAi).fail("503"));
        let optimizer = ContentOptimizer::new(Some(gateway_with(backend)), 3.0);

        let ordered = optimizer
            .prioritize(
                vec![
                    Achievement::new("Wrote docs"),
                    Achievement::new("Cut costs").quantified(),
                ],
                &analysis(),
                true,
            )
            .await;
        assert_eq!(texts(&ordered), vec!["Cut costs", "Wrote docs"]);
    }

    #[tokio::test]
    async fn test_rule_based_when_not_preferred() {
        let backend = Arc::new(ScriptedBackend::new(BackendKind::OpenAi).reply("RANKED: 2, 1"));
        let optimizer = ContentOptimizer::new(Some(gateway_with(backend.clone())), 3.0);

        let ordered = optimizer
            .prioritize(achievements(&["alpha", "beta"]), &analysis(), false)
            .await;
        assert_eq!(texts(&ordered), vec!["alpha", "beta"]);
        assert!(backend.prompts().is_empty());
    }
}

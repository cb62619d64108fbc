//! Single-achievement rewrite against a requirement list.

use serde::Serialize;
use tracing::{debug, warn};

use crate::llm_client::{strip_code_fences, Gateway, GenerationRequest};
use crate::optimization::prompts::achievement_rewrite_prompt;
use crate::optimization::scoring::{matched_requirements, overlap_fraction, relevance_score};
use crate::optimization::{ContentOptimizer, OptimizeError};

const REWRITE_MAX_TOKENS: u32 = 300;
const REWRITE_TEMPERATURE: f32 = 0.3;
/// How many requirements the generative note names.
const NOTED_REQUIREMENTS: usize = 3;

/// Original and rewritten text of one achievement, with its relevance score
/// and a note on how it was produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizedContent {
    pub original_achievement: String,
    pub optimized_achievement: String,
    /// Always within [0, 1].
    pub relevance_score: f64,
    pub optimization_notes: String,
}

impl ContentOptimizer {
    /// Rewrites one achievement. Falls back to echoing it unchanged when
    /// generation is unavailable, not preferred, or fails.
    pub async fn optimize(
        &self,
        achievement: &str,
        requirements: &[String],
        context: Option<&str>,
        prefer_generative: bool,
    ) -> OptimizedContent {
        debug!(
            "Optimizing achievement: {}...",
            achievement.chars().take(50).collect::<String>()
        );

        if let Some(gateway) = self.generative(prefer_generative) {
            match self
                .generative_rewrite(gateway, achievement, requirements, context)
                .await
            {
                Ok(content) => return content,
                Err(e) => warn!("Generative rewrite failed: {e}"),
            }
        }

        echo_rewrite(achievement, requirements)
    }

    async fn generative_rewrite(
        &self,
        gateway: &Gateway,
        achievement: &str,
        requirements: &[String],
        context: Option<&str>,
    ) -> Result<OptimizedContent, OptimizeError> {
        let prompt = achievement_rewrite_prompt(achievement, requirements, context);
        let request = GenerationRequest::new(prompt)
            .max_tokens(REWRITE_MAX_TOKENS)
            .temperature(REWRITE_TEMPERATURE);

        let reply = gateway
            .generate(request)
            .await?
            .into_result()
            .map_err(OptimizeError::Generation)?;

        let optimized = clean_rewrite(&reply, achievement, self.max_length_ratio())
            .ok_or(OptimizeError::EmptyRewrite)?;
        let relevance_score = relevance_score(&optimized, requirements);

        let targeted = requirements
            .iter()
            .take(NOTED_REQUIREMENTS)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");

        Ok(OptimizedContent {
            original_achievement: achievement.to_string(),
            optimized_achievement: optimized,
            relevance_score,
            optimization_notes: format!("Generative rewrite targeting: {targeted}"),
        })
    }
}

/// Trims a rewrite reply. A reply much longer than the original probably carries
/// an explanation, so only its first line is kept. `None` when nothing is left.
pub fn clean_rewrite(reply: &str, original: &str, max_length_ratio: f64) -> Option<String> {
    let text = strip_code_fences(reply).trim();
    let limit = original.chars().count() as f64 * max_length_ratio;

    let text = if text.chars().count() as f64 > limit {
        text.lines().next().unwrap_or_default().trim()
    } else {
        text
    };

    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// The achievement unchanged, scored by plain requirement overlap.
pub fn echo_rewrite(achievement: &str, requirements: &[String]) -> OptimizedContent {
    let matched = matched_requirements(achievement, requirements);

    OptimizedContent {
        original_achievement: achievement.to_string(),
        optimized_achievement: achievement.to_string(),
        relevance_score: overlap_fraction(matched.len(), requirements.len()),
        optimization_notes: format!(
            "Rule-based optimization. Keywords found: {}",
            matched.join(", ")
        ),
    }
}

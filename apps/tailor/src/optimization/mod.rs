//! Content Optimizer — ranks and rewrites a candidate's achievements for one job.
//!
//! Every generative step (ranking, rewriting) has a deterministic fallback, so
//! the optimizer never fails: a generation problem is logged and the rule-based
//! result is returned instead.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::analysis::JobAnalysis;
use crate::llm_client::{Gateway, GatewayError};
use crate::models::{Achievement, Role, TailoredAchievement, TailoredRole};

pub mod handlers;
pub mod prompts;
pub mod ranking;
pub mod rewrite;
pub mod scoring;
pub mod selection;
pub mod strategy;

pub use rewrite::OptimizedContent;
pub use strategy::{derive_strategy, ContentStrategy, Tone};

/// Requirements each kept achievement is rewritten against.
const ROLE_REWRITE_REQUIREMENTS: usize = 5;

/// Why a generative step was abandoned in favour of its fallback.
#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("generation unavailable: {0}")]
    Gateway(#[from] GatewayError),

    #[error("generation failed: {0}")]
    Generation(String),

    #[error("rewrite reply was empty")]
    EmptyRewrite,

    #[error("reply contained no usable ranking")]
    NoRanking,
}

pub struct ContentOptimizer {
    /// Present only when the gateway's default backend is configured.
    gateway: Option<Arc<Gateway>>,
    max_length_ratio: f64,
}

impl ContentOptimizer {
    pub fn new(gateway: Option<Arc<Gateway>>, max_length_ratio: f64) -> Self {
        Self {
            gateway: gateway.filter(|g| g.default_available()),
            max_length_ratio,
        }
    }

    pub fn rule_based_only() -> Self {
        Self {
            gateway: None,
            max_length_ratio: 3.0,
        }
    }

    pub fn generative_available(&self) -> bool {
        self.gateway.is_some()
    }

    pub fn max_length_ratio(&self) -> f64 {
        self.max_length_ratio
    }

    /// The gateway to use for a generative attempt, if one should be made.
    fn generative(&self, prefer_generative: bool) -> Option<&Gateway> {
        if prefer_generative {
            self.gateway.as_deref()
        } else {
            None
        }
    }

    /// Prioritizes a role's achievements, keeps the strategy's cap, and rewrites
    /// each survivor against the top requirements with the role as context.
    /// Tags are left empty for the caller to attach.
    pub async fn optimize_role(
        &self,
        role: &Role,
        achievements: Vec<Achievement>,
        strategy: &ContentStrategy,
        analysis: &JobAnalysis,
        prefer_generative: bool,
    ) -> TailoredRole {
        info!("Optimizing content for {} role...", role.company);

        let mut selected = self
            .prioritize(achievements, analysis, prefer_generative)
            .await;
        selected.truncate(strategy.max_achievements_per_role);

        let requirements: Vec<String> = analysis
            .requirements()
            .into_iter()
            .take(ROLE_REWRITE_REQUIREMENTS)
            .collect();
        let context = format!("Role: {}, Company: {}", role.title, role.company);

        // Sequential on purpose: the gateway spaces calls per backend anyway.
        let mut tailored = Vec::with_capacity(selected.len());
        for achievement in &selected {
            let optimized = self
                .optimize(
                    &achievement.achievement,
                    &requirements,
                    Some(context.as_str()),
                    prefer_generative,
                )
                .await;
            tailored.push(TailoredAchievement {
                content: optimized.optimized_achievement,
                relevance_score: Some(optimized.relevance_score),
                optimization_notes: Some(optimized.optimization_notes),
            });
        }

        info!("Optimized {} achievements for role", tailored.len());
        TailoredRole {
            role: role.clone(),
            achievements: tailored,
            tags: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ExperienceLevel;
    use crate::llm_client::testing::{gateway_with, ScriptedBackend};
    use crate::llm_client::BackendKind;

    fn analysis() -> JobAnalysis {
        JobAnalysis {
            required_skills: vec!["Rust".to_string(), "Kafka".to_string()],
            key_responsibilities: vec!["Own payments reliability".to_string()],
            experience_level: ExperienceLevel::Junior,
            ..JobAnalysis::default()
        }
    }

    fn achievements() -> Vec<Achievement> {
        vec![
            Achievement::new("Organized hack week"),
            Achievement::new("Built Kafka consumers in Rust").quantified(),
            Achievement::new("Improved payments reliability to 99.99%"),
        ]
    }

    #[tokio::test]
    async fn test_optimize_role_rule_based() {
        let optimizer = ContentOptimizer::rule_based_only();
        let analysis = analysis();
        let strategy = derive_strategy(&analysis);
        let role = Role::new("Acme Pay", "Backend Engineer");

        let tailored = optimizer
            .optimize_role(&role, achievements(), &strategy, &analysis, true)
            .await;

        // junior → 2 achievements; both survivors echo unchanged
        assert_eq!(tailored.achievements.len(), 2);
        assert_eq!(tailored.achievements[0].content, "Built Kafka consumers in Rust");
        assert_eq!(
            tailored.achievements[1].content,
            "Improved payments reliability to 99.99%"
        );
        assert!(tailored
            .achievements
            .iter()
            .all(|a| a.relevance_score.is_some() && a.optimization_notes.is_some()));
        assert_eq!(tailored.role, role);
        assert!(tailored.tags.is_empty());
    }

    #[tokio::test]
    async fn test_optimize_role_generative_uses_role_context() {
        let backend = Arc::new(
            ScriptedBackend::new(BackendKind::OpenAi)
                .reply("RANKED ACHIEVEMENTS: 3, 2, 1")
                .reply("Raised payments reliability to 99.99%")
                .reply("Shipped Rust Kafka consumers"),
        );
        let optimizer = ContentOptimizer::new(Some(gateway_with(backend.clone())), 3.0);
        let analysis = analysis();
        let strategy = derive_strategy(&analysis);
        let role = Role::new("Acme Pay", "Backend Engineer");

        let tailored = optimizer
            .optimize_role(&role, achievements(), &strategy, &analysis, true)
            .await;

        let contents: Vec<_> = tailored.achievements.iter().map(|a| a.content.as_str()).collect();
        assert_eq!(
            contents,
            vec!["Raised payments reliability to 99.99%", "Shipped Rust Kafka consumers"]
        );

        let prompts = backend.prompts();
        assert_eq!(prompts.len(), 3);
        assert!(prompts[1].contains("COMPANY CONTEXT: Role: Backend Engineer, Company: Acme Pay"));
        assert!(prompts[1].contains("- Rust\n- Kafka\n- Own payments reliability"));
    }

    #[test]
    fn test_unconfigured_default_backend_disables_generation() {
        let backend = Arc::new(ScriptedBackend::new(BackendKind::Anthropic));
        let gateway = Gateway::new(BackendKind::OpenAi, std::time::Duration::ZERO)
            .with_backend(backend);
        let optimizer = ContentOptimizer::new(Some(Arc::new(gateway)), 3.0);
        assert!(!optimizer.generative_available());
    }
}

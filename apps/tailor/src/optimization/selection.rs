//! Per-role achievement selection for one job.
//!
//! With a job analysis every role goes through `ContentOptimizer::optimize_role`.
//! Without one, a basic selection applies the job's content preferences.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::info;

use crate::analysis::JobAnalysis;
use crate::models::{Achievement, ContentPreferences, Role, TailoredAchievement, TailoredRole};
use crate::optimization::{derive_strategy, ContentOptimizer};

/// The candidate data tailoring works on. Maps are keyed by `Role::company_key`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateProfile {
    pub roles: Vec<Role>,
    #[serde(default)]
    pub achievements_by_company: HashMap<String, Vec<Achievement>>,
    #[serde(default)]
    pub skills_by_company: HashMap<String, Vec<String>>,
}

impl CandidateProfile {
    fn achievements_for(&self, role: &Role) -> Option<&[Achievement]> {
        self.achievements_by_company
            .get(&role.company_key())
            .map(Vec::as_slice)
            .filter(|a| !a.is_empty())
    }

    fn tags_for(&self, role: &Role) -> Vec<String> {
        self.skills_by_company
            .get(&role.company_key())
            .cloned()
            .unwrap_or_default()
    }
}

/// Builds the tailored role list, in input order.
pub async fn tailor_roles(
    optimizer: &ContentOptimizer,
    profile: &CandidateProfile,
    analysis: Option<&JobAnalysis>,
    preferences: &ContentPreferences,
    prefer_generative: bool,
) -> Vec<TailoredRole> {
    let Some(analysis) = analysis else {
        info!("Using basic content selection (no job analysis)");
        return profile
            .roles
            .iter()
            .map(|role| TailoredRole {
                role: role.clone(),
                achievements: profile
                    .achievements_for(role)
                    .map(|a| basic_selection(a, preferences))
                    .unwrap_or_default(),
                tags: profile.tags_for(role),
            })
            .collect();
    };

    let strategy = derive_strategy(analysis);
    let mut tailored = Vec::with_capacity(profile.roles.len());

    for role in &profile.roles {
        let mut entry = match profile.achievements_for(role) {
            Some(achievements) => {
                optimizer
                    .optimize_role(
                        role,
                        achievements.to_vec(),
                        &strategy,
                        analysis,
                        prefer_generative,
                    )
                    .await
            }
            None => TailoredRole {
                role: role.clone(),
                achievements: Vec::new(),
                tags: Vec::new(),
            },
        };
        entry.tags = profile.tags_for(role);
        tailored.push(entry);
    }

    info!("Tailored {} roles", tailored.len());
    tailored
}

/// Quantified achievements first when preferred (stable), then the first
/// `max_achievements_per_role`, rendered with their impact clause.
pub fn basic_selection(
    achievements: &[Achievement],
    preferences: &ContentPreferences,
) -> Vec<TailoredAchievement> {
    let mut ordered: Vec<&Achievement> = achievements.iter().collect();
    if preferences.prioritize_quantified {
        ordered.sort_by_key(|a| !a.quantified);
    }

    ordered
        .into_iter()
        .take(preferences.max_achievements_per_role)
        .map(|a| TailoredAchievement {
            content: a.display_text(),
            relevance_score: None,
            optimization_notes: None,
        })
        .collect()
}

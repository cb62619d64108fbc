// Prompt builders for the Content Optimizer.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::{bullet_list, AUTHENTICITY_INSTRUCTION};

/// Rewrite prompt for one achievement. `context` is a one-line role/company hint.
pub fn achievement_rewrite_prompt(
    achievement: &str,
    requirements: &[String],
    context: Option<&str>,
) -> String {
    let context_line = context
        .filter(|c| !c.trim().is_empty())
        .map(|c| format!("COMPANY CONTEXT: {c}\n\n"))
        .unwrap_or_default();

    format!(
        "Rewrite this professional achievement to better align with the target job requirements \
while maintaining accuracy and authenticity:

ORIGINAL ACHIEVEMENT:
{achievement}

TARGET JOB REQUIREMENTS:
{requirements}

{context_line}Please rewrite the achievement to:
1. Emphasize aspects most relevant to the target role
2. Use keywords that align with job requirements
{AUTHENTICITY_INSTRUCTION}

Provide only the rewritten achievement without explanation.",
        requirements = bullet_list(requirements),
    )
}

/// Ranking prompt. Achievements are numbered from 1; the reply's RANKED
/// ACHIEVEMENTS section is expected to list those numbers.
pub fn prioritization_prompt(
    achievements: &[&str],
    skills: &[String],
    requirements: &[String],
) -> String {
    let numbered = achievements
        .iter()
        .enumerate()
        .map(|(i, text)| format!("{}. {text}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Given these professional achievements and skills, prioritize and rank them for relevance \
to the target job:

ACHIEVEMENTS:
{numbered}

SKILLS:
{skills}

TARGET JOB REQUIREMENTS:
{requirements}

Please provide:
1. RANKED ACHIEVEMENTS (list numbers in priority order, most relevant first)
2. PRIORITY SKILLS (list skills in order of relevance)
3. JUSTIFICATION (brief explanation of ranking rationale)

Focus on direct relevance to job requirements and potential impact.",
        skills = skills.join(", "),
        requirements = bullet_list(requirements),
    )
}

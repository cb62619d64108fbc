// Shared prompt constants.
// Each component that needs generation defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt sent with every generation call, whatever the backend.
pub const RESUME_STRATEGIST_SYSTEM: &str = "You are an expert resume strategist and \
    job description analyst. Follow the requested output format exactly. \
    Never invent experience, employers, metrics, or skills.";

/// Authenticity rules embedded in every prompt that rewrites candidate content.
pub const AUTHENTICITY_INSTRUCTION: &str = "\
3. Maintain factual accuracy - do not exaggerate or fabricate
4. Keep the professional tone and impact-focused language
5. Ensure it remains authentic to the original accomplishment";

/// Renders a list as `- item` lines.
pub fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub mod achievement;
pub mod job;

pub use achievement::{Achievement, Role, TailoredAchievement, TailoredRole};
pub use job::{AiInstructions, ContentPreferences, PromptVars};

/// Serde default for request flags that are on unless switched off.
pub(crate) fn default_true() -> bool {
    true
}

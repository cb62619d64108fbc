use serde::{Deserialize, Serialize};

/// Per-job tailoring variables, persisted as `prompt_vars.yaml`.
///
/// Hand-edited files are common, so every field has a default and unknown keys
/// are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptVars {
    pub target_role: String,
    pub company_name: String,
    /// `startup` or `enterprise`.
    pub company_culture: String,
    pub key_requirements: Vec<String>,
    pub nice_to_have: Vec<String>,
    pub emphasis_areas: Vec<String>,
    pub content_preferences: ContentPreferences,
    pub ai_instructions: AiInstructions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentPreferences {
    pub max_achievements_per_role: usize,
    pub prioritize_quantified: bool,
    pub include_patents: bool,
    pub highlight_recent_roles: bool,
}

impl Default for ContentPreferences {
    fn default() -> Self {
        Self {
            max_achievements_per_role: 3,
            prioritize_quantified: true,
            include_patents: true,
            highlight_recent_roles: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiInstructions {
    pub tone: String,
    /// `leadership` or `technical`.
    pub focus: String,
    pub industry_keywords: Vec<String>,
}

impl Default for AiInstructions {
    fn default() -> Self {
        Self {
            tone: "professional".to_string(),
            focus: "technical".to_string(),
            industry_keywords: Vec::new(),
        }
    }
}

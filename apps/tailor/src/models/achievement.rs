use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One accomplishment statement tied to an employer.
///
/// Fields beyond the three below (categories, dates, ...) are carried through
/// untouched so reordered achievements come back exactly as they went in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub achievement: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
    #[serde(default)]
    pub quantified: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Achievement {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            achievement: text.into(),
            impact: None,
            quantified: false,
            extra: Map::new(),
        }
    }

    pub fn quantified(mut self) -> Self {
        self.quantified = true;
        self
    }

    pub fn with_impact(mut self, impact: impl Into<String>) -> Self {
        self.impact = Some(impact.into());
        self
    }

    /// Achievement text followed by its impact clause, when there is one.
    pub fn display_text(&self) -> String {
        match self.impact.as_deref().map(str::trim).filter(|i| !i.is_empty()) {
            Some(impact) => format!("{}, {impact}", self.achievement),
            None => self.achievement.clone(),
        }
    }
}

/// A position in the candidate's background. Only `company` and `title` are
/// interpreted; everything else (dates, location, ...) passes through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub company: String,
    #[serde(default)]
    pub title: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Role {
    pub fn new(company: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            title: title.into(),
            extra: Map::new(),
        }
    }

    /// Key used to look the role up in per-company achievement and skill maps.
    pub fn company_key(&self) -> String {
        self.company.replace(' ', "_")
    }
}

/// An achievement as handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailoredAchievement {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimization_notes: Option<String>,
}

/// A role record augmented with its selected achievements and skill tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailoredRole {
    #[serde(flatten)]
    pub role: Role,
    pub achievements: Vec<TailoredAchievement>,
    pub tags: Vec<String>,
}

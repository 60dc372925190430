use serde::{Deserialize, Serialize};

// ── Analysis result ──

/// The six readings the model returns for a conversation.
/// Serialized with the camelCase names the prompt asks the model to use.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub interest_level: String,
    pub flirting_score: String,
    pub red_flags: String,
    pub mood: String,
    pub ghosting_risk: String,
    pub insights: String,
}

impl AnalysisResult {
    /// Value of a single field, looked up by its wire name.
    pub fn get(&self, field: RequiredField) -> &str {
        match field {
            RequiredField::InterestLevel => &self.interest_level,
            RequiredField::FlirtingScore => &self.flirting_score,
            RequiredField::RedFlags => &self.red_flags,
            RequiredField::Mood => &self.mood,
            RequiredField::GhostingRisk => &self.ghosting_risk,
            RequiredField::Insights => &self.insights,
        }
    }
}

/// Fields every model response must carry, in validation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    InterestLevel,
    FlirtingScore,
    RedFlags,
    Mood,
    GhostingRisk,
    Insights,
}

impl RequiredField {
    /// Validation order. The first failing field names the error.
    pub const ALL: [RequiredField; 6] = [
        Self::InterestLevel,
        Self::FlirtingScore,
        Self::RedFlags,
        Self::Mood,
        Self::GhostingRisk,
        Self::Insights,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InterestLevel => "interestLevel",
            Self::FlirtingScore => "flirtingScore",
            Self::RedFlags => "redFlags",
            Self::Mood => "mood",
            Self::GhostingRisk => "ghostingRisk",
            Self::Insights => "insights",
        }
    }
}

impl std::fmt::Display for RequiredField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

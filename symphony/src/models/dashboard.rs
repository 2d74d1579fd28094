use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Warning,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Warning => write!(f, "warning"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DetectedIssue {
    pub id: String,
    pub database: String,
    pub severity: Severity,
    pub description: String,
    pub status: String,
    pub detected_at: String,
    pub recommendation: String,
    pub ai_confidence: u8,
    #[serde(default)]
    pub affected_tables: Vec<String>,
    pub estimated_impact: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealingOutcome {
    Success,
    Failed,
}

impl std::fmt::Display for HealingOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealingEvent {
    pub id: String,
    pub database: String,
    pub timestamp: String,
    pub description: String,
    pub status: HealingOutcome,
    pub duration: String,
    pub impact: String,
    pub ai_confidence: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub id: String,
    pub title: String,
    pub description: String,
    pub recommendation: String,
    pub confidence: u8,
    pub category: String,
    pub timestamp: String,
}

use serde::{Deserialize, Serialize};

use crate::error::SymphonyError;

/// Extended assistant behaviours that can be switched on and off at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    AutonomousOrchestration,
    QueryOptimization,
    ContinuousLearning,
    FederatedLearning,
    CognitiveIndexing,
    PredictiveThreat,
    WorkloadShaping,
}

impl Capability {
    pub const ALL: [Capability; 7] = [
        Capability::AutonomousOrchestration,
        Capability::QueryOptimization,
        Capability::ContinuousLearning,
        Capability::FederatedLearning,
        Capability::CognitiveIndexing,
        Capability::PredictiveThreat,
        Capability::WorkloadShaping,
    ];

    /// camelCase key, as used by the dashboard and in configuration
    pub fn key(self) -> &'static str {
        match self {
            Self::AutonomousOrchestration => "autonomousOrchestration",
            Self::QueryOptimization => "queryOptimization",
            Self::ContinuousLearning => "continuousLearning",
            Self::FederatedLearning => "federatedLearning",
            Self::CognitiveIndexing => "cognitiveIndexing",
            Self::PredictiveThreat => "predictiveThreat",
            Self::WorkloadShaping => "workloadShaping",
        }
    }

    pub fn display_name(self) -> String {
        title_case(self.key())
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl std::str::FromStr for Capability {
    type Err = SymphonyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Capability::ALL
            .into_iter()
            .find(|cap| cap.key().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SymphonyError::UnknownCapability(wanted.to_string()))
    }
}

/// Convert a camelCase identifier to Title Case with spaces.
///
/// A space is inserted before every uppercase letter and the first letter is
/// capitalised: `queryOptimization` becomes `Query Optimization`.
pub fn title_case(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len() + 4);
    for ch in ident.chars() {
        if ch.is_uppercase() {
            out.push(' ');
        }
        out.push(ch);
    }

    let mut chars = out.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

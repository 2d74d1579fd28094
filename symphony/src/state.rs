use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::intelligence::CapabilityGate;
use crate::knowledge::KnowledgeStore;

/// Outcome of simulated training and learning cycles.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrainingRecord {
    pub trained: bool,
    pub accuracy: f64,
    pub adaptive_models: Vec<String>,
    pub learning_iterations: u32,
    pub last_trained_at: Option<DateTime<Utc>>,
    /// Names of the databases analysed during the last training run.
    pub database_patterns: Vec<String>,
    pub is_training: bool,
    pub is_learning: bool,
}

/// Mutable assistant state shared by a session and its learning task.
#[derive(Debug, Clone, Default)]
pub struct AssistantState {
    pub gate: CapabilityGate,
    pub store: KnowledgeStore,
    pub training: TrainingRecord,
}

pub type SharedState = Arc<RwLock<AssistantState>>;

impl AssistantState {
    pub fn new(gate: CapabilityGate, store: KnowledgeStore) -> Self {
        Self {
            gate,
            store,
            training: TrainingRecord::default(),
        }
    }

    pub fn shared(self) -> SharedState {
        Arc::new(RwLock::new(self))
    }
}

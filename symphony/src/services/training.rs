use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use tracing::{debug, info};

use crate::error::{Result, SymphonyError};
use crate::knowledge::templates::TRAINED_TEMPLATES;
use crate::knowledge::Template;
use crate::models::{Capability, MetricRecord};
use crate::state::{SharedState, TrainingRecord};

/// Models registered by every successful training run.
pub const BASE_MODELS: &[&str] = &[
    "Query Pattern Analyzer",
    "Anomaly Detection Network",
    "Resource Allocation Optimizer",
    "Predictive Failure Model",
];

pub const ACCURACY_FLOOR: f64 = 87.0;
pub const ACCURACY_CEILING: f64 = 97.0;
pub const LEARNING_ACCURACY_CAP: f64 = 99.5;

/// Every n-th learning iteration registers a new adaptive model.
const MODEL_EVERY_ITERATIONS: u32 = 3;

/// Simulated model training backed by fixed delays and random accuracy.
#[derive(Clone)]
pub struct TrainingService {
    state: SharedState,
    train_delay: Duration,
    learning_delay: Duration,
}

impl TrainingService {
    pub fn new(state: SharedState, train_delay: Duration, learning_delay: Duration) -> Self {
        Self {
            state,
            train_delay,
            learning_delay,
        }
    }

    /// Train the model against the given databases.
    ///
    /// Always completes. Base model names are never duplicated across runs and
    /// the knowledge store gains the trained topics.
    pub async fn train(&self, records: &[MetricRecord]) -> TrainingRecord {
        self.state.write().await.training.is_training = true;
        info!(databases = records.len(), "Starting model training");

        tokio::time::sleep(self.train_delay).await;

        let accuracy = rand::rng().random_range(ACCURACY_FLOOR..ACCURACY_CEILING);

        let mut state = self.state.write().await;
        let added_topics = state.store.widen(
            TRAINED_TEMPLATES
                .iter()
                .map(|(keyword, body)| Template::new(*keyword, *body)),
        );

        let training = &mut state.training;
        training.trained = true;
        training.accuracy = accuracy;
        for model in BASE_MODELS {
            if !training.adaptive_models.iter().any(|m| m == model) {
                training.adaptive_models.push(model.to_string());
            }
        }
        training.database_patterns = records.iter().map(|r| r.name.clone()).collect();
        training.last_trained_at = Some(Utc::now());
        training.is_training = false;

        info!(
            accuracy = %format!("{accuracy:.1}"),
            models = training.adaptive_models.len(),
            added_topics,
            "Model training complete"
        );

        training.clone()
    }

    /// Run one continuous-learning iteration. Requires a trained model.
    pub async fn run_learning_cycle(&self) -> Result<TrainingRecord> {
        {
            let mut state = self.state.write().await;
            if !state.training.trained {
                return Err(SymphonyError::NotTrained);
            }
            state.training.is_learning = true;
        }

        debug!("Learning cycle started");
        tokio::time::sleep(self.learning_delay).await;

        let increment = rand::rng().random_range(0.1_f64..0.5);

        let mut state = self.state.write().await;
        let training = &mut state.training;
        training.is_learning = false;

        // A reset during the delay discards the cycle.
        if !training.trained {
            return Err(SymphonyError::NotTrained);
        }

        training.learning_iterations += 1;
        training.accuracy = (training.accuracy + increment).min(LEARNING_ACCURACY_CAP);

        if training.learning_iterations % MODEL_EVERY_ITERATIONS == 0 {
            let model = format!(
                "Adaptive Model v{}",
                training.learning_iterations / MODEL_EVERY_ITERATIONS
            );
            info!(model = %model, "Registered adaptive model");
            training.adaptive_models.push(model);
        }

        info!(
            iteration = training.learning_iterations,
            accuracy = %format!("{:.1}", training.accuracy),
            "Learning cycle complete"
        );

        Ok(training.clone())
    }

    /// Clear the in-progress marker of a learning cycle dropped before completion.
    pub async fn abandon_learning_cycle(&self) {
        self.state.write().await.training.is_learning = false;
    }

    /// Forget all training and drop the trained topics. Capability flags are kept.
    pub async fn reset(&self) {
        let mut state = self.state.write().await;
        state.training = TrainingRecord::default();
        state.store.reset();
        info!("Training state reset");
    }

    pub async fn snapshot(&self) -> TrainingRecord {
        self.state.read().await.training.clone()
    }

    pub async fn capability_enabled(&self, capability: Capability) -> bool {
        self.state.read().await.gate.is_enabled(capability)
    }
}

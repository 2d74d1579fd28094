use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::fixtures::DataProvider;
use crate::intelligence::{Counters, ResponseResolver};
use crate::state::SharedState;

/// Asynchronous producer of assistant replies.
///
/// Failures are the caller's to handle; a chat session replaces them with a
/// fixed apology.
#[async_trait]
pub trait ResponseSource: Send + Sync {
    async fn respond(&self, query: &str) -> Result<String>;
}

/// Resolves queries locally after a fixed "thinking" delay.
#[derive(Clone)]
pub struct SimulatedAssistant {
    state: SharedState,
    data: Arc<dyn DataProvider>,
    latency: Duration,
}

impl SimulatedAssistant {
    pub fn new(state: SharedState, data: Arc<dyn DataProvider>, latency: Duration) -> Self {
        Self {
            state,
            data,
            latency,
        }
    }
}

#[async_trait]
impl ResponseSource for SimulatedAssistant {
    async fn respond(&self, query: &str) -> Result<String> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let records = self.data.metric_records();
        let state = self.state.read().await;
        let counters = Counters::new(state.training.learning_iterations, records.len());

        Ok(ResponseResolver::new(&state.store, &state.gate).resolve(query, records, counters))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::FixtureSet;
    use crate::intelligence::DEFAULT_RESPONSE;
    use crate::models::Capability;
    use crate::state::AssistantState;

    fn assistant(state: SharedState) -> SimulatedAssistant {
        SimulatedAssistant::new(state, Arc::new(FixtureSet::dashboard()), Duration::ZERO)
    }

    #[tokio::test]
    async fn test_respond_uses_fixture_records() {
        let assistant = assistant(AssistantState::default().shared());
        let reply = assistant.respond("What's the health of Archive DB?").await.unwrap();
        assert!(reply.starts_with("Database health is currently at 71%."));
    }

    #[tokio::test]
    async fn test_respond_sees_flag_changes_immediately() {
        let state = AssistantState::default().shared();
        let assistant = assistant(state.clone());

        assert_eq!(
            assistant.respond("federated status").await.unwrap(),
            DEFAULT_RESPONSE
        );

        state.write().await.gate.enable(Capability::FederatedLearning);
        let reply = assistant.respond("federated status").await.unwrap();
        assert!(reply.contains("across 4 databases"));
    }
}

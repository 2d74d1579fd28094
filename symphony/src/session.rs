//! Chat session and the provider that scopes it
//!
//! A [`ChatSession`] owns everything that used to be ambient UI state: the
//! conversation, the capability flags, the knowledge store, the training
//! record and the continuous learning task. [`ChatProvider`] is the enclosing
//! scope; session operations requested without one fail with a configuration
//! error.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::assistant::{ResponseSource, SimulatedAssistant};
use crate::config::Config;
use crate::error::{Result, SymphonyError};
use crate::fixtures::DataProvider;
use crate::intelligence::CapabilityGate;
use crate::knowledge::KnowledgeStore;
use crate::models::{Capability, ConversationMessage, MetricRecord};
use crate::services::{ContinuousLearningTask, TrainingService};
use crate::state::{AssistantState, SharedState, TrainingRecord};

pub const GREETING: &str = "Hello! I'm your AI database co-pilot. How can I help manage your database ecosystem today? Try asking about \"capabilities\" to see what I can do.";

/// Shown in place of a reply when the response fetch fails or times out.
pub const FALLBACK_RESPONSE: &str =
    "I'm having trouble processing that request. My training model might need a refresh.";

pub const TRAINING_STARTED: &str =
    "Training advanced database model... This will enhance my responses with autonomous capabilities.";

/// Query fragments that switch a capability on after a successful reply.
const AUTO_ENABLE_TRIGGERS: &[(&str, Capability)] = &[
    ("learn", Capability::ContinuousLearning),
    ("optimize", Capability::QueryOptimization),
];

pub struct ChatSession {
    config: Config,
    state: SharedState,
    data: Arc<dyn DataProvider>,
    source: Arc<dyn ResponseSource>,
    trainer: TrainingService,
    messages: Vec<ConversationMessage>,
    is_typing: bool,
    shutdown: CancellationToken,
    learning_task: Option<ContinuousLearningTask>,
}

impl ChatSession {
    pub fn new(config: Config, data: Arc<dyn DataProvider>) -> Self {
        let state = AssistantState::new(CapabilityGate::new(), KnowledgeStore::default()).shared();
        let source: Arc<dyn ResponseSource> = Arc::new(SimulatedAssistant::new(
            state.clone(),
            data.clone(),
            config.assistant.response_latency(),
        ));
        let trainer = TrainingService::new(
            state.clone(),
            config.training.train_delay(),
            config.training.learning_delay(),
        );

        Self {
            config,
            state,
            data,
            source,
            trainer,
            messages: vec![ConversationMessage::assistant(GREETING)],
            is_typing: false,
            shutdown: CancellationToken::new(),
            learning_task: None,
        }
    }

    /// Replace the response source, e.g. with a remote model client.
    pub fn with_source(mut self, source: Arc<dyn ResponseSource>) -> Self {
        self.source = source;
        self
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    pub fn is_typing(&self) -> bool {
        self.is_typing
    }

    pub fn records(&self) -> &[MetricRecord] {
        self.data.metric_records()
    }

    pub fn data(&self) -> &dyn DataProvider {
        self.data.as_ref()
    }

    pub fn shared_state(&self) -> SharedState {
        self.state.clone()
    }

    /// Send a user message and append the assistant's reply.
    ///
    /// Blank input is ignored. Upstream failures never propagate: the reply
    /// becomes [`FALLBACK_RESPONSE`] and the typing indicator is cleared.
    pub async fn send(&mut self, input: &str) -> Option<&ConversationMessage> {
        let query = input.trim();
        if query.is_empty() {
            return None;
        }

        self.messages.push(ConversationMessage::user(query));
        self.is_typing = true;

        let reply = match self.fetch_reply(query).await {
            Ok(text) => {
                self.apply_auto_enable(query).await;
                text
            }
            Err(e) => {
                warn!(error = %e, "Response fetch failed, using fallback");
                FALLBACK_RESPONSE.to_string()
            }
        };

        self.is_typing = false;
        self.messages.push(ConversationMessage::assistant(reply));
        self.messages.last()
    }

    async fn fetch_reply(&self, query: &str) -> Result<String> {
        let timeout = self.config.assistant.response_timeout();
        match tokio::time::timeout(timeout, self.source.respond(query)).await {
            Ok(result) => result,
            Err(_) => Err(SymphonyError::Timeout {
                timeout_ms: timeout.as_millis() as u64,
            }),
        }
    }

    async fn apply_auto_enable(&mut self, query: &str) {
        let lowered = query.to_lowercase();
        for (trigger, capability) in AUTO_ENABLE_TRIGGERS {
            if lowered.contains(trigger) && !self.is_enabled(*capability).await {
                self.enable(*capability).await;
            }
        }
    }

    pub async fn is_enabled(&self, capability: Capability) -> bool {
        self.state.read().await.gate.is_enabled(capability)
    }

    pub async fn capabilities(&self) -> Vec<(Capability, bool)> {
        self.state.read().await.gate.snapshot()
    }

    pub async fn enable(&mut self, capability: Capability) {
        self.state.write().await.gate.enable(capability);
        info!("{} enabled", capability.display_name());
        self.sync_learning_task().await;
    }

    pub async fn disable(&mut self, capability: Capability) {
        self.state.write().await.gate.disable(capability);
        info!("{} disabled", capability.display_name());
        self.sync_learning_task().await;
    }

    /// Flip a capability and return its new state.
    pub async fn toggle_capability(&mut self, capability: Capability) -> bool {
        let enabled = self.state.write().await.gate.toggle(capability);
        info!(
            "{} {}",
            capability.display_name(),
            if enabled { "enabled" } else { "disabled" }
        );
        self.sync_learning_task().await;
        enabled
    }

    pub fn is_learning_scheduled(&self) -> bool {
        self.learning_task
            .as_ref()
            .is_some_and(ContinuousLearningTask::is_running)
    }

    async fn sync_learning_task(&mut self) {
        let wanted = self.config.training.auto_learning
            && self.is_enabled(Capability::ContinuousLearning).await;

        if wanted && !self.is_learning_scheduled() {
            self.learning_task = Some(ContinuousLearningTask::spawn(
                self.trainer.clone(),
                self.config.training.learning_interval(),
                self.shutdown.child_token(),
            ));
        } else if !wanted {
            if let Some(task) = self.learning_task.take() {
                debug!("Stopping continuous learning task");
                task.stop().await;
            }
        }
    }

    pub async fn training(&self) -> TrainingRecord {
        self.trainer.snapshot().await
    }

    pub async fn knowledge_topics(&self) -> usize {
        self.state.read().await.store.len()
    }

    pub async fn train(&mut self) -> TrainingRecord {
        self.messages.push(ConversationMessage::system(TRAINING_STARTED));

        let record = self.trainer.train(self.data.metric_records()).await;

        let finished_at = record
            .last_trained_at
            .map(|at| at.format("%H:%M:%S").to_string())
            .unwrap_or_default();
        self.messages.push(ConversationMessage::system(format!(
            "Model training complete at {finished_at}. Accuracy: {:.1}%. Added {} adaptive models.",
            record.accuracy,
            record.adaptive_models.len()
        )));

        record
    }

    /// Reset all training and train again from scratch.
    pub async fn retrain(&mut self) -> TrainingRecord {
        self.trainer.reset().await;
        self.train().await
    }

    pub async fn reset_training(&mut self) {
        self.trainer.reset().await;
    }

    pub async fn run_learning_cycle(&mut self) -> Result<TrainingRecord> {
        let current = self.trainer.snapshot().await;
        if !current.trained {
            return Err(SymphonyError::NotTrained);
        }

        if self.is_enabled(Capability::ContinuousLearning).await {
            self.messages.push(ConversationMessage::system(format!(
                "Continuous learning cycle {} in progress...",
                current.learning_iterations + 1
            )));
        }

        self.trainer.run_learning_cycle().await
    }

    /// Drop the conversation back to the greeting.
    pub fn clear_chat(&mut self) {
        self.messages = vec![ConversationMessage::assistant(GREETING)];
        info!("Chat history cleared");
    }

    /// Cancel background work owned by this session.
    pub async fn shutdown(&mut self) {
        self.shutdown.cancel();
        if let Some(task) = self.learning_task.take() {
            task.stop().await;
        }
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Enclosing scope for a chat session plus the open/closed state of the
/// chat panel.
#[derive(Default)]
pub struct ChatProvider {
    is_open: bool,
    session: Option<ChatSession>,
}

impl ChatProvider {
    pub fn new(session: ChatSession) -> Self {
        Self {
            is_open: false,
            session: Some(session),
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn open_chat(&mut self) {
        self.is_open = true;
    }

    pub fn close_chat(&mut self) {
        self.is_open = false;
    }

    pub fn toggle_chat(&mut self) {
        self.is_open = !self.is_open;
    }

    /// Install a session, returning the one it replaces.
    pub fn install(&mut self, session: ChatSession) -> Option<ChatSession> {
        self.session.replace(session)
    }

    pub fn session(&self) -> Result<&ChatSession> {
        self.session.as_ref().ok_or_else(missing_session)
    }

    pub fn session_mut(&mut self) -> Result<&mut ChatSession> {
        self.session.as_mut().ok_or_else(missing_session)
    }

    /// Shut down and remove the installed session.
    pub async fn teardown(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.shutdown().await;
        }
        self.is_open = false;
    }
}

fn missing_session() -> SymphonyError {
    SymphonyError::Configuration(
        "chat session operations must be used within a ChatProvider".to_string(),
    )
}

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::TrainingService;
use crate::error::SymphonyError;
use crate::models::Capability;

/// Repeating learning cycle owned by a session.
///
/// The loop exits on cancellation, even mid-cycle, or once continuous
/// learning is switched off. Dropping the handle cancels it.
pub struct ContinuousLearningTask {
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl ContinuousLearningTask {
    pub fn spawn(trainer: TrainingService, interval: Duration, token: CancellationToken) -> Self {
        info!(
            interval_ms = interval.as_millis() as u64,
            "Starting continuous learning task"
        );

        let task_token = token.clone();
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = task_token.cancelled() => {
                        info!("Continuous learning task shutting down...");
                        break;
                    }
                    _ = tokio::time::sleep(interval) => {
                        if !trainer.capability_enabled(Capability::ContinuousLearning).await {
                            info!("Continuous learning disabled, stopping task");
                            break;
                        }
                        tokio::select! {
                            _ = task_token.cancelled() => {
                                trainer.abandon_learning_cycle().await;
                                info!("Continuous learning task cancelled mid-cycle");
                                break;
                            }
                            result = trainer.run_learning_cycle() => match result {
                                Ok(record) => {
                                    debug!(iteration = record.learning_iterations, "Scheduled learning cycle finished");
                                }
                                Err(SymphonyError::NotTrained) => {
                                    debug!("Skipping scheduled learning cycle: model not trained");
                                }
                                Err(e) => {
                                    error!("Continuous learning error: {}", e);
                                }
                            },
                        }
                    }
                }
            }
        });

        Self {
            token,
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Cancel and wait for the loop to exit.
    pub async fn stop(mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                error!("Continuous learning task failed: {}", e);
            }
        }
    }
}

impl Drop for ContinuousLearningTask {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MetricRecord;
    use crate::state::{AssistantState, SharedState};

    fn trainer() -> (SharedState, TrainingService) {
        let state = AssistantState::default().shared();
        let trainer = TrainingService::new(state.clone(), Duration::ZERO, Duration::ZERO);
        (state, trainer)
    }

    async fn wait_for_iterations(trainer: &TrainingService, wanted: u32) -> bool {
        for _ in 0..200 {
            if trainer.snapshot().await.learning_iterations >= wanted {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        false
    }

    #[tokio::test]
    async fn test_task_runs_learning_cycles_while_enabled() {
        let (state, trainer) = trainer();
        state.write().await.gate.enable(Capability::ContinuousLearning);
        trainer.train(&[MetricRecord::new("Production DB")]).await;

        let task = ContinuousLearningTask::spawn(
            trainer.clone(),
            Duration::from_millis(5),
            CancellationToken::new(),
        );

        assert!(wait_for_iterations(&trainer, 2).await);
        assert!(task.is_running());
        task.stop().await;
    }

    #[tokio::test]
    async fn test_stop_halts_further_cycles() {
        let (state, trainer) = trainer();
        state.write().await.gate.enable(Capability::ContinuousLearning);
        trainer.train(&[]).await;

        let task = ContinuousLearningTask::spawn(
            trainer.clone(),
            Duration::from_millis(5),
            CancellationToken::new(),
        );
        assert!(wait_for_iterations(&trainer, 1).await);
        task.stop().await;

        let after_stop = trainer.snapshot().await.learning_iterations;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(trainer.snapshot().await.learning_iterations, after_stop);
    }

    #[tokio::test]
    async fn test_stop_does_not_wait_for_running_cycle() {
        let state = AssistantState::default().shared();
        let trainer =
            TrainingService::new(state.clone(), Duration::ZERO, Duration::from_secs(3600));
        state.write().await.gate.enable(Capability::ContinuousLearning);
        trainer.train(&[]).await;

        let task = ContinuousLearningTask::spawn(
            trainer.clone(),
            Duration::from_millis(5),
            CancellationToken::new(),
        );

        let mut started = false;
        for _ in 0..200 {
            if trainer.snapshot().await.is_learning {
                started = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(started);

        tokio::time::timeout(Duration::from_secs(1), task.stop())
            .await
            .expect("stop should not wait for the learning delay");

        let record = trainer.snapshot().await;
        assert!(!record.is_learning);
        assert_eq!(record.learning_iterations, 0);
    }

    #[tokio::test]
    async fn test_task_exits_when_capability_disabled() {
        let (_state, trainer) = trainer();

        let task = ContinuousLearningTask::spawn(
            trainer.clone(),
            Duration::from_millis(5),
            CancellationToken::new(),
        );

        for _ in 0..200 {
            if !task.is_running() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(!task.is_running());
    }

    #[tokio::test]
    async fn test_parent_token_cancels_task() {
        let (state, trainer) = trainer();
        state.write().await.gate.enable(Capability::ContinuousLearning);

        let parent = CancellationToken::new();
        let task = ContinuousLearningTask::spawn(
            trainer,
            Duration::from_secs(3600),
            parent.child_token(),
        );
        parent.cancel();

        for _ in 0..200 {
            if !task.is_running() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(!task.is_running());
    }
}

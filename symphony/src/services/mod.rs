mod learning;
mod training;

pub use learning::ContinuousLearningTask;
pub use training::{TrainingService, BASE_MODELS};

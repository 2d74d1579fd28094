//! Database co-pilot for the Self-Healing Database Symphony dashboard.
//!
//! The assistant answers free-text questions about monitored databases using a
//! keyword knowledge store, a set of capability flags and simulated training.

pub mod assistant;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod intelligence;
pub mod knowledge;
pub mod models;
pub mod services;
pub mod session;
pub mod state;

pub use error::{Result, SymphonyError};
pub use session::{ChatProvider, ChatSession};

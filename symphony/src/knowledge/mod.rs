//! Keyword-indexed response templates
//!
//! The store keeps templates in registration order; the first keyword found in
//! a query wins, with no ranking by specificity.

mod store;
pub mod templates;

pub use store::{KnowledgeStore, Template};

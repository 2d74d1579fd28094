pub mod capability;
pub mod resolver;

pub use capability::CapabilityGate;
pub use resolver::{Counters, ResponseResolver, DEFAULT_RESPONSE};

mod capability;
mod conversation;
mod dashboard;
mod metric;

pub use capability::*;
pub use conversation::*;
pub use dashboard::*;
pub use metric::*;

mod kinds;
mod registry;

pub use kinds::{LimitKind, LimitScope, Observed, Threshold};
pub use registry::{Limit, LimitCheck, LimitRegistry, LimitSelector, ReachedLimit};

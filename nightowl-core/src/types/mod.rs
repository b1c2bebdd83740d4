mod outcome;
mod range;
mod source;
mod target;

pub use outcome::{InteractionOutcome, UnfollowOutcome};
pub use range::{Percentage, ValueRange};
pub use source::Source;
pub use target::{ActionPlan, Identity, Target};

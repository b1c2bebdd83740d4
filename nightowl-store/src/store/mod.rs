mod trait_store;
mod types;

pub use trait_store::{InteractionStore, StoreError};
pub use types::{FollowedUser, InteractionRecord, NewEvent, NewInteraction, StoredEvent};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Source;

/// The account the automation is logged in as.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(username: impl Into<String>) -> Self {
        Self(username.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// An individual account discovered through a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub username: String,
    pub source: Source,
}

impl Target {
    pub fn new(username: impl Into<String>, source: Source) -> Self {
        Self {
            username: username.into(),
            source,
        }
    }
}

/// Actions sampled for one target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPlan {
    pub likes: u32,
    pub follow: bool,
    pub comment: bool,
    pub stories: u32,
    pub private_message: bool,
}

impl ActionPlan {
    pub fn is_empty(&self) -> bool {
        self.likes == 0 && !self.follow && !self.comment && self.stories == 0 && !self.private_message
    }
}

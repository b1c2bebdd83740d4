use serde::{Deserialize, Serialize};

/// Result of one interaction attempt with a target.
///
/// `failure` is an opaque classification reported by the driver when
/// `succeeded` is false (private account, filtered out, no posts, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionOutcome {
    pub succeeded: bool,
    #[serde(default)]
    pub followed: bool,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub commented: bool,
    #[serde(default)]
    pub messaged: bool,
    #[serde(default)]
    pub stories_watched: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl InteractionOutcome {
    pub fn success() -> Self {
        Self {
            succeeded: true,
            ..Default::default()
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            failure: Some(reason.into()),
            ..Default::default()
        }
    }

    pub fn with_likes(mut self, likes: u32) -> Self {
        self.likes = likes;
        self
    }

    pub fn with_follow(mut self) -> Self {
        self.followed = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UnfollowOutcome {
    Unfollowed,
    /// The account no longer follows back or was already unfollowed by hand.
    NotFollowing,
    Skipped { reason: String },
}

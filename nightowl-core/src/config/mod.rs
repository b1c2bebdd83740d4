//! Run configuration.
//!
//! A [`RunConfig`] is read from a YAML or JSON file (see [`parse_config_str`])
//! and then overridden field by field from command-line flags. Every section
//! has defaults, so an empty document is a valid starting point.

mod parse;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ValidationError, Violation};
use crate::types::{Percentage, Source, ValueRange};

pub use parse::{parse_config_str, ConfigFormat, ParsedConfig};

pub(crate) const MODE_CONFLICT: &str = "interact and unfollow cannot be combined in one run";
pub(crate) const MODE_MISSING: &str = "one of interact or unfollow must be specified";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Sources to interact with, in the order jobs should run.
    pub interact: Vec<Source>,
    /// Unfollow at most this many accounts previously followed by nightowl.
    pub unfollow: Option<u64>,
    pub actions: ActionConfig,
    pub limits: LimitsConfig,
    pub schedule: ScheduleConfig,
    pub retry: RetrySettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Interact(Vec<Source>),
    Unfollow(u64),
}

impl RunConfig {
    /// Resolve the run mode. Exactly one of `interact` and `unfollow` must be set.
    pub fn mode(&self) -> Result<Mode, ConfigError> {
        let message = match (self.interact.is_empty(), self.unfollow) {
            (false, None) => return Ok(Mode::Interact(self.interact.clone())),
            (true, Some(n)) => return Ok(Mode::Unfollow(n)),
            (false, Some(_)) => MODE_CONFLICT,
            (true, None) => MODE_MISSING,
        };
        Err(ConfigError::Validation(ValidationError::new(vec![
            Violation::new("mode", message),
        ])))
    }
}

/// Per-target action probabilities and counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ActionConfig {
    pub likes_count: ValueRange,
    pub likes_percentage: Percentage,
    pub follow_percentage: Percentage,
    pub comment_percentage: Percentage,
    pub pm_percentage: Percentage,
    pub stories_percentage: Percentage,
    pub stories_count: ValueRange,
    /// Chance that a discovered candidate is interacted with at all.
    pub interact_percentage: Percentage,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            likes_count: ValueRange::fixed(2),
            likes_percentage: Percentage::ALWAYS,
            follow_percentage: Percentage::NEVER,
            comment_percentage: Percentage::NEVER,
            pm_percentage: Percentage::NEVER,
            stories_percentage: Percentage::NEVER,
            stories_count: ValueRange::fixed(1),
            interact_percentage: Percentage::ALWAYS,
        }
    }
}

/// Numeric limits. `None` disables a limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    pub total_likes_limit: Option<u64>,
    /// Interactions per source.
    pub interactions_count: Option<u64>,
    /// Follows per source.
    pub follow_limit: Option<u64>,
    pub total_follows_limit: Option<u64>,
    pub total_unfollows_limit: Option<u64>,
    pub total_comments_limit: Option<u64>,
    pub total_pm_limit: Option<u64>,
    pub total_watches_limit: Option<u64>,
    pub total_interactions_limit: Option<u64>,
    pub total_successful_interactions_limit: Option<u64>,
    /// Session length in minutes, sampled per session.
    pub session_length: Option<ValueRange>,
    /// Minutes without a recorded interaction before the session stops.
    pub idle_timeout: Option<u64>,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            total_likes_limit: Some(1000),
            interactions_count: Some(100),
            follow_limit: None,
            total_follows_limit: None,
            total_unfollows_limit: None,
            total_comments_limit: None,
            total_pm_limit: None,
            total_watches_limit: None,
            total_interactions_limit: None,
            total_successful_interactions_limit: None,
            session_length: None,
            idle_timeout: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScheduleConfig {
    /// Minutes to wait before repeating the session; disabled when absent.
    pub repeat: Option<ValueRange>,
    /// Stop repeating after this many sessions.
    pub total_sessions: Option<u64>,
    /// Work on a random subset of this many sources per session.
    pub truncate_sources: Option<ValueRange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetrySettings {
    /// Pause in seconds before reopening the app after a transient error.
    pub delay_secs: ValueRange,
    /// Give up on a job after this many attempts; unbounded when absent.
    pub max_attempts: Option<usize>,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            delay_secs: ValueRange::between(1, 4),
            max_attempts: None,
        }
    }
}

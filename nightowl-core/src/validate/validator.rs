use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::{
    ActionConfig, LimitsConfig, RetrySettings, RunConfig, ScheduleConfig, MODE_CONFLICT,
    MODE_MISSING,
};
use crate::error::{ValidationError, Violation};
use crate::types::{Percentage, Source, ValueRange};

pub(crate) static ACCOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._]{1,30}$").expect("valid"));
pub(crate) static HASHTAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\p{N}_]{1,100}$").expect("valid"));

pub struct Validator {
    violations: Vec<Violation>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            violations: Vec::new(),
        }
    }

    pub fn finish(self) -> Result<(), ValidationError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(self.violations))
        }
    }

    pub(crate) fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.violations.push(Violation::new(path, message));
    }

    pub fn validate_config(&mut self, cfg: &RunConfig) {
        self.validate_mode(cfg);
        self.validate_sources(&cfg.interact);
        self.validate_actions(&cfg.actions);
        self.validate_limits(&cfg.limits);
        self.validate_schedule(&cfg.schedule, cfg.interact.len());
        self.validate_retry(&cfg.retry);
    }

    fn validate_mode(&mut self, cfg: &RunConfig) {
        match (cfg.interact.is_empty(), cfg.unfollow) {
            (false, Some(_)) => self.push("mode", MODE_CONFLICT),
            (true, None) => self.push("mode", MODE_MISSING),
            (true, Some(0)) => self.push("unfollow", "must be greater than 0"),
            _ => {}
        }
    }

    fn validate_sources(&mut self, sources: &[Source]) {
        let mut seen = HashSet::new();
        for (i, source) in sources.iter().enumerate() {
            let path = format!("interact[{i}]");
            let ok = if source.is_hashtag() {
                HASHTAG_RE.is_match(source.name())
            } else {
                ACCOUNT_RE.is_match(source.name())
            };
            if !ok {
                self.push(&path, format!("`{source}` is not a valid account or hashtag name"));
            }
            if !seen.insert(source.key()) {
                self.push(path, format!("duplicate source `{source}`"));
            }
        }
    }

    fn validate_actions(&mut self, actions: &ActionConfig) {
        if actions.likes_percentage > Percentage::NEVER && actions.likes_count.max() == 0 {
            self.push(
                "actions.likes_count",
                "must allow at least one like when likes_percentage is above 0",
            );
        }
        if actions.stories_percentage > Percentage::NEVER && actions.stories_count.max() == 0 {
            self.push(
                "actions.stories_count",
                "must allow at least one story when stories_percentage is above 0",
            );
        }
    }

    fn validate_limits(&mut self, limits: &LimitsConfig) {
        let counts = [
            ("limits.total_likes_limit", limits.total_likes_limit),
            ("limits.interactions_count", limits.interactions_count),
            ("limits.follow_limit", limits.follow_limit),
            ("limits.total_follows_limit", limits.total_follows_limit),
            ("limits.total_unfollows_limit", limits.total_unfollows_limit),
            ("limits.total_comments_limit", limits.total_comments_limit),
            ("limits.total_pm_limit", limits.total_pm_limit),
            ("limits.total_watches_limit", limits.total_watches_limit),
            ("limits.total_interactions_limit", limits.total_interactions_limit),
            (
                "limits.total_successful_interactions_limit",
                limits.total_successful_interactions_limit,
            ),
            ("limits.idle_timeout", limits.idle_timeout),
        ];
        for (path, value) in counts {
            if value == Some(0) {
                self.push(path, "must be greater than 0 (omit it to disable the limit)");
            }
        }
        if let Some(range) = limits.session_length {
            self.require_positive("limits.session_length", range);
        }
    }

    fn validate_schedule(&mut self, schedule: &ScheduleConfig, source_count: usize) {
        if schedule.total_sessions == Some(0) {
            self.push("schedule.total_sessions", "must be greater than 0");
        }
        if let Some(range) = schedule.truncate_sources {
            self.require_positive("schedule.truncate_sources", range);
            if source_count > 0 && range.min() > source_count as u64 {
                self.push(
                    "schedule.truncate_sources",
                    format!("cannot select {} of {source_count} sources", range.min()),
                );
            }
        }
    }

    fn validate_retry(&mut self, retry: &RetrySettings) {
        if retry.max_attempts == Some(0) {
            self.push("retry.max_attempts", "must be at least 1");
        }
    }

    fn require_positive(&mut self, path: &str, range: ValueRange) {
        if range.min() == 0 {
            self.push(path, "must be greater than 0");
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

//! Aggregation of session counters into a run-wide report.
//!
//! [`RunReport::build`] only reads the sessions it is given, so it can be
//! called at any point of a run (between sessions, after a fatal error, on
//! interrupt) and always describes the state at `now`.

mod format;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::session::SessionState;

pub use format::{format_duration, stringify_interactions};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    /// 1-based position of the session in the run.
    pub index: usize,
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub start_time: DateTime<Utc>,
    /// Finish time, or the report time for a session still running.
    pub finish_time: DateTime<Utc>,
    pub finished: bool,
    pub duration_secs: i64,
    pub total_interactions: BTreeMap<String, u64>,
    pub successful_interactions: BTreeMap<String, u64>,
    pub likes: u64,
    pub followed: u64,
    pub unfollowed: u64,
    pub comments: u64,
    pub private_messages: u64,
    pub story_watches: u64,
}

impl SessionSummary {
    fn from_session(index: usize, s: &SessionState, now: DateTime<Utc>) -> Self {
        Self {
            index,
            id: s.id(),
            username: s.my_username().map(|u| u.as_str().to_string()),
            start_time: s.start_time(),
            finish_time: s.finish_time().unwrap_or(now),
            finished: s.is_finished(),
            duration_secs: s.duration(now).num_seconds(),
            total_interactions: s.total_interactions().clone(),
            successful_interactions: s.successful_interactions().clone(),
            likes: s.total_likes(),
            followed: s.total_followed(),
            unfollowed: s.total_unfollowed(),
            comments: s.total_comments(),
            private_messages: s.total_private_messages(),
            story_watches: s.total_story_watches(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TotalsSummary {
    pub sessions: usize,
    pub completed_sessions: usize,
    pub duration_secs: i64,
    pub total_interactions: BTreeMap<String, u64>,
    pub successful_interactions: BTreeMap<String, u64>,
    pub likes: u64,
    pub followed: u64,
    pub unfollowed: u64,
    pub comments: u64,
    pub private_messages: u64,
    pub story_watches: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    pub sessions: Vec<SessionSummary>,
    pub totals: TotalsSummary,
}

impl RunReport {
    pub fn build(sessions: &[SessionState], now: DateTime<Utc>) -> Self {
        let summaries: Vec<SessionSummary> = sessions
            .iter()
            .enumerate()
            .map(|(i, s)| SessionSummary::from_session(i + 1, s, now))
            .collect();

        let mut totals = TotalsSummary {
            sessions: summaries.len(),
            ..Default::default()
        };
        for s in &summaries {
            if s.finished {
                totals.completed_sessions += 1;
            }
            totals.duration_secs += s.duration_secs;
            merge_counts(&mut totals.total_interactions, &s.total_interactions);
            merge_counts(&mut totals.successful_interactions, &s.successful_interactions);
            totals.likes += s.likes;
            totals.followed += s.followed;
            totals.unfollowed += s.unfollowed;
            totals.comments += s.comments;
            totals.private_messages += s.private_messages;
            totals.story_watches += s.story_watches;
        }

        Self {
            generated_at: now,
            sessions: summaries,
            totals,
        }
    }

    /// Human readable form. Per-session sections are only printed when the
    /// run has more than one session.
    pub fn render_text(&self) -> String {
        format::render_text(self)
    }
}

fn merge_counts(into: &mut BTreeMap<String, u64>, from: &BTreeMap<String, u64>) {
    for (k, v) in from {
        *into.entry(k.clone()).or_insert(0) += v;
    }
}

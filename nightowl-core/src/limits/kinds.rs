use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitKind {
    Likes,
    Follows,
    Unfollows,
    Comments,
    PrivateMessages,
    StoryWatches,
    TotalInteractions,
    SuccessfulInteractions,
    SourceInteractions,
    SourceFollows,
    SessionDuration,
    IdleTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitScope {
    /// Reaching it stops the session.
    Global,
    /// Reaching it moves on to the next source.
    PerSource,
    /// Reaching it only withholds the action; the job keeps going.
    Action,
}

impl LimitKind {
    pub const ALL: [LimitKind; 12] = [
        LimitKind::Likes,
        LimitKind::Follows,
        LimitKind::Unfollows,
        LimitKind::Comments,
        LimitKind::PrivateMessages,
        LimitKind::StoryWatches,
        LimitKind::TotalInteractions,
        LimitKind::SuccessfulInteractions,
        LimitKind::SourceInteractions,
        LimitKind::SourceFollows,
        LimitKind::SessionDuration,
        LimitKind::IdleTime,
    ];

    pub fn scope(&self) -> LimitScope {
        match self {
            LimitKind::SourceInteractions => LimitScope::PerSource,
            LimitKind::Follows | LimitKind::SourceFollows => LimitScope::Action,
            _ => LimitScope::Global,
        }
    }

    pub fn is_time_window(&self) -> bool {
        matches!(self, LimitKind::SessionDuration | LimitKind::IdleTime)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LimitKind::Likes => "likes",
            LimitKind::Follows => "follows",
            LimitKind::Unfollows => "unfollows",
            LimitKind::Comments => "comments",
            LimitKind::PrivateMessages => "private_messages",
            LimitKind::StoryWatches => "story_watches",
            LimitKind::TotalInteractions => "total_interactions",
            LimitKind::SuccessfulInteractions => "successful_interactions",
            LimitKind::SourceInteractions => "source_interactions",
            LimitKind::SourceFollows => "source_follows",
            LimitKind::SessionDuration => "session_duration",
            LimitKind::IdleTime => "idle_time",
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Threshold {
    Count(u64),
    Duration(Duration),
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Threshold::Count(n) => write!(f, "{n}"),
            Threshold::Duration(d) => write!(f, "{}s", d.as_secs()),
        }
    }
}

/// Value a limit was compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Observed {
    Count(u64),
    Elapsed(Duration),
}

impl fmt::Display for Observed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Observed::Count(n) => write!(f, "{n}"),
            Observed::Elapsed(d) => write!(f, "{}s", d.as_secs()),
        }
    }
}

//! JSON Lines messages exchanged with a driver subprocess.
//!
//! Every command is answered by exactly one reply. `walk` opens a source;
//! the caller then sends `next` until it receives `done` or decides to
//! `stop` early.

use nightowl_core::{ActionPlan, InteractionOutcome, Source, Target, UnfollowOutcome};
use serde::{Deserialize, Serialize};

use crate::driver::DriverErrorKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DriverCommand {
    OpenApp,
    CloseApp,
    CurrentUsername,
    Snapshot {
        label: String,
    },
    Interact {
        target: Target,
        plan: ActionPlan,
    },
    Walk {
        source: Source,
        is_self: bool,
        interact_percentage: u8,
    },
    Next,
    Stop,
    Unfollow {
        username: String,
    },
    Filter {
        target: Target,
    },
}

impl DriverCommand {
    pub fn name(&self) -> &'static str {
        match self {
            DriverCommand::OpenApp => "open_app",
            DriverCommand::CloseApp => "close_app",
            DriverCommand::CurrentUsername => "current_username",
            DriverCommand::Snapshot { .. } => "snapshot",
            DriverCommand::Interact { .. } => "interact",
            DriverCommand::Walk { .. } => "walk",
            DriverCommand::Next => "next",
            DriverCommand::Stop => "stop",
            DriverCommand::Unfollow { .. } => "unfollow",
            DriverCommand::Filter { .. } => "filter",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DriverReply {
    Ok,
    Username { username: String },
    Outcome { outcome: InteractionOutcome },
    Target { username: String },
    Done,
    Unfollowed { outcome: UnfollowOutcome },
    Verdict { interact: bool },
    Error { kind: DriverErrorKind, message: String },
}

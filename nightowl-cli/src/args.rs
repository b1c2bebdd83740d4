use std::path::PathBuf;

use clap::{Args, ValueEnum};
use nightowl_core::{Percentage, Source, ValueRange};

use crate::output::OutputFormat;

#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

#[derive(Debug, Args, Clone)]
pub struct StoreArgs {
    /// SQLite URL, or `memory` for a store that lives only as long as the run.
    #[arg(long)]
    pub store: Option<String>,
    #[arg(long, default_value_t = 5)]
    pub max_connections: u32,
}

#[derive(Debug, Args, Clone)]
pub struct DriverArgs {
    /// Helper process speaking the JSON Lines driver protocol.
    #[arg(long)]
    pub driver: String,
    #[arg(long = "driver-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub driver_args: Vec<String>,
    /// Seconds to wait for one driver reply.
    #[arg(long, default_value_t = 120)]
    pub driver_timeout: u64,
}

#[derive(Debug, Args, Clone)]
pub struct ModeArgs {
    #[arg(long, value_name = "SOURCE", num_args = 1..)]
    pub interact: Vec<Source>,
    #[arg(long, value_name = "N")]
    pub unfollow: Option<u64>,
}

#[derive(Debug, Args, Clone)]
pub struct ActionArgs {
    #[arg(long, value_name = "RANGE")]
    pub likes_count: Option<ValueRange>,
    #[arg(long, value_name = "PERCENT")]
    pub follow_percentage: Option<Percentage>,
    #[arg(long, value_name = "PERCENT")]
    pub interact_percentage: Option<Percentage>,
}

#[derive(Debug, Args, Clone)]
pub struct LimitArgs {
    #[arg(long)]
    pub total_likes_limit: Option<u64>,
    /// Interactions per source.
    #[arg(long)]
    pub interactions_count: Option<u64>,
    /// Follows per source.
    #[arg(long)]
    pub follow_limit: Option<u64>,
    /// Session length in minutes.
    #[arg(long, value_name = "RANGE")]
    pub session_length: Option<ValueRange>,
}

#[derive(Debug, Args, Clone)]
pub struct ScheduleArgs {
    /// Minutes between sessions.
    #[arg(long, value_name = "RANGE")]
    pub repeat: Option<ValueRange>,
    #[arg(long)]
    pub total_sessions: Option<u64>,
    #[arg(long, value_name = "RANGE")]
    pub truncate_sources: Option<ValueRange>,
}

#[derive(Debug, Args, Clone)]
pub struct RetryArgs {
    #[arg(long)]
    pub retry_max_attempts: Option<usize>,
    /// Seconds to wait before reopening the app.
    #[arg(long, value_name = "RANGE")]
    pub retry_delay: Option<ValueRange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EventsTarget {
    /// Append lifecycle events to the store.
    Store,
    /// Print lifecycle events as JSON lines on stdout.
    Stdout,
    None,
}

#[derive(Debug, Args, Clone)]
pub struct ConfigArgs {
    /// YAML or JSON run configuration; flags override its fields.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

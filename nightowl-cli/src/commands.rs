use std::path::PathBuf;

use clap::Subcommand;

use crate::args::*;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run interaction or unfollow sessions through a driver process.
    Run {
        #[command(flatten)]
        config: ConfigArgs,
        #[command(flatten)]
        mode: ModeArgs,
        #[command(flatten)]
        actions: ActionArgs,
        #[command(flatten)]
        limits: LimitArgs,
        #[command(flatten)]
        schedule: ScheduleArgs,
        #[command(flatten)]
        retry: RetryArgs,
        #[command(flatten)]
        driver: DriverArgs,
        #[arg(long, value_enum, default_value_t = EventsTarget::Store)]
        events: EventsTarget,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Parse and validate a run configuration file.
    Validate {
        path: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Aggregate stored sessions into a report.
    Report {
        /// Most recent sessions to include.
        #[arg(long, default_value_t = 50)]
        limit: i64,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Create the SQLite schema.
    Migrate {
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        store: StoreArgs,
    },
}

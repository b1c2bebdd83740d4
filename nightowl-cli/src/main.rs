use clap::Parser;
use tracing_subscriber::EnvFilter;

mod args;
mod cmd;
mod commands;
mod exit_codes;
mod output;

pub use args::*;
use commands::Command;

#[derive(Debug, Parser)]
#[command(name = "nightowl", version, about = "Rate-limited session runner")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    // Jobs, sources and sessions never run concurrently.
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: failed to create tokio runtime: {e}");
            std::process::exit(exit_codes::RUNTIME_ERROR);
        }
    };

    let exit_code = rt.block_on(run_command(cli.command));
    std::process::exit(exit_code);
}

// Logs go to stderr so reports and JSON output stay parseable on stdout.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_command(command: Command) -> i32 {
    match command {
        Command::Run {
            config,
            mode,
            actions,
            limits,
            schedule,
            retry,
            driver,
            events,
            output,
            store,
        } => {
            let overrides = cmd::config::Overrides {
                mode: &mode,
                actions: &actions,
                limits: &limits,
                schedule: &schedule,
                retry: &retry,
            };
            cmd::run::run_cmd(config, overrides, driver, events, output, store).await
        }
        Command::Validate { path, output } => cmd::validate::validate_cmd(&path, output).await,
        Command::Report {
            limit,
            output,
            store,
        } => cmd::report::report_cmd(limit, output, store).await,
        Command::Migrate { output, store } => cmd::migrate::migrate_cmd(store, output).await,
    }
}

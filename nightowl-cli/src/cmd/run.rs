use std::sync::Arc;
use std::time::Duration;

use nightowl_exec::{
    Collaborators, CompositeEventSink, EventSink, Interrupt, MemoryReportSink, NoOpEventSink,
    ProcessDriver, ProcessDriverConfig, ReportSink, RunContext, RunController, RunError,
    RunOutcome, StdoutEventSink, StdoutReportSink, StoreEventSink, TracingEventSink,
};
use serde::Serialize;
use tracing::{error, info};

use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::{ConfigArgs, DriverArgs, EventsTarget, OutputArgs, StoreArgs};

use super::config::{
    check_config, config_error_code, get_database_url, load_config, open_store, Overrides,
};

#[derive(Serialize)]
struct RunResult {
    outcome: &'static str,
    sessions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub async fn run_cmd(
    config: ConfigArgs,
    overrides: Overrides<'_>,
    driver: DriverArgs,
    events: EventsTarget,
    output: OutputArgs,
    store: StoreArgs,
) -> i32 {
    let mut cfg = match load_config(config.config.as_deref(), &output) {
        Ok(cfg) => cfg,
        Err(code) => return code,
    };
    overrides.apply(&mut cfg);
    // Nothing is spawned or opened for a configuration that cannot run.
    if let Err(code) = check_config(&cfg, &output) {
        return code;
    }

    let database_url = get_database_url(store.store);
    let interactions = match open_store(&database_url, store.max_connections).await {
        Ok(s) => s,
        Err(e) => {
            print_error(output.format, output.quiet, &format!("failed to open store: {e}"));
            return exit_codes::RUNTIME_ERROR;
        }
    };

    let driver_config = ProcessDriverConfig {
        command: driver.driver.clone(),
        args: driver.driver_args.clone(),
        reply_timeout: Duration::from_secs(driver.driver_timeout),
    };
    let process = match ProcessDriver::spawn(&driver_config) {
        Ok(d) => Arc::new(d),
        Err(e) => {
            print_error(output.format, output.quiet, &format!("failed to start driver: {e}"));
            return exit_codes::RUNTIME_ERROR;
        }
    };

    let mut sink = CompositeEventSink::new();
    sink.add(Box::new(TracingEventSink));
    match events {
        EventsTarget::Store => sink.add(Box::new(StoreEventSink::new(interactions.clone()))),
        EventsTarget::Stdout => sink.add(Box::new(StdoutEventSink)),
        EventsTarget::None => sink.add(Box::new(NoOpEventSink)),
    }

    let reports: Arc<dyn ReportSink> = if output.quiet {
        Arc::new(MemoryReportSink::new())
    } else {
        Arc::new(StdoutReportSink::new(output.format.into()))
    };

    let mut controller = match RunController::new(
        cfg,
        Collaborators::from_driver(process),
        interactions,
        Arc::new(sink) as Arc<dyn EventSink>,
        reports,
        Interrupt::ctrl_c(),
    ) {
        Ok(c) => c,
        Err(RunError::Config(e)) => return config_error_code(&e, &output),
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            return exit_codes::RUNTIME_ERROR;
        }
    };

    let mut ctx = RunContext::new();
    let result = controller.run(&mut ctx).await;
    let sessions = ctx.sessions().len();
    match result {
        Ok(RunOutcome::Finished) => {
            info!(sessions, "run finished");
            finish(&output, "finished", sessions, None);
            exit_codes::SUCCESS
        }
        Ok(RunOutcome::Interrupted) => {
            info!(sessions, "run interrupted by user");
            finish(&output, "interrupted", sessions, None);
            exit_codes::INTERRUPTED
        }
        Err(RunError::Config(e)) => config_error_code(&e, &output),
        Err(e) => {
            error!(sessions, error = %e, "run failed");
            print_error(output.format, output.quiet, &e.to_string());
            finish(&output, "failed", sessions, Some(e.to_string()));
            exit_codes::RUN_FAILED
        }
    }
}

// The text report has already been printed per session; JSON callers get a
// final summary line as well.
fn finish(output: &OutputArgs, outcome: &'static str, sessions: usize, error: Option<String>) {
    if output.format == OutputFormat::Json {
        let result = RunResult {
            outcome,
            sessions,
            error,
        };
        print_result(output.format, output.quiet, &result);
    }
}

use chrono::Utc;
use nightowl_core::RunReport;
use nightowl_store::InteractionStore;

use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::{OutputArgs, StoreArgs};

use super::config::{get_database_url, open_store};

pub async fn report_cmd(limit: i64, output: OutputArgs, store: StoreArgs) -> i32 {
    let database_url = get_database_url(store.store);
    let interactions = match open_store(&database_url, store.max_connections).await {
        Ok(s) => s,
        Err(e) => {
            print_error(output.format, output.quiet, &format!("failed to open store: {e}"));
            return exit_codes::RUNTIME_ERROR;
        }
    };

    let sessions = match interactions.list_sessions(limit).await {
        Ok(s) => s,
        Err(e) => {
            print_error(output.format, output.quiet, &format!("failed to load sessions: {e}"));
            return exit_codes::RUNTIME_ERROR;
        }
    };

    let report = RunReport::build(&sessions, Utc::now());
    if output.format == OutputFormat::Text && !output.quiet {
        println!("{}", report.render_text());
    } else {
        print_result(output.format, output.quiet, &report);
    }
    exit_codes::SUCCESS
}

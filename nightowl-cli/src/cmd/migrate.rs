use serde::Serialize;

use nightowl_store::{run_migrations, SqliteStore};

use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::{OutputArgs, StoreArgs};

use super::config::{get_database_url, MEMORY_STORE};

#[derive(Serialize)]
struct MigrateResult {
    success: bool,
    message: String,
}

pub async fn migrate_cmd(store: StoreArgs, output: OutputArgs) -> i32 {
    let database_url = get_database_url(store.store);
    if database_url == MEMORY_STORE {
        print_error(output.format, output.quiet, "the memory store has no schema to migrate");
        return exit_codes::RUNTIME_ERROR;
    }

    let sqlite = match SqliteStore::connect(&database_url, store.max_connections).await {
        Ok(s) => s,
        Err(e) => {
            print_error(output.format, output.quiet, &format!("failed to open sqlite: {e}"));
            return exit_codes::RUNTIME_ERROR;
        }
    };

    match run_migrations(sqlite.pool()).await {
        Ok(()) => {
            if output.format == OutputFormat::Text && !output.quiet {
                println!("ok: schema ready at {database_url}");
            } else {
                let result = MigrateResult {
                    success: true,
                    message: "schema ready".to_string(),
                };
                print_result(output.format, output.quiet, &result);
            }
            exit_codes::SUCCESS
        }
        Err(e) => {
            print_error(output.format, output.quiet, &format!("migration failed: {e}"));
            exit_codes::RUNTIME_ERROR
        }
    }
}

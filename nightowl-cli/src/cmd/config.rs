use std::path::Path;
use std::sync::Arc;

use nightowl_core::{
    parse_config_str, ConfigError, ConfigFormat, RunConfig, Validate, ValidationError,
};
use nightowl_store::{InteractionStore, MemoryStore, SqliteStore, StoreError};

use crate::exit_codes;
use crate::output::{print_error, print_violations};
use crate::{ActionArgs, LimitArgs, ModeArgs, OutputArgs, RetryArgs, ScheduleArgs};

pub const DEFAULT_STORE_URL: &str = "sqlite://nightowl.db";
pub const MEMORY_STORE: &str = "memory";

/// Read and parse a config file, or start from defaults without one.
/// Errors are printed; the exit code is returned.
pub fn load_config(path: Option<&Path>, output: &OutputArgs) -> Result<RunConfig, i32> {
    let Some(path) = path else {
        return Ok(RunConfig::default());
    };
    let content = std::fs::read_to_string(path).map_err(|e| {
        print_error(
            output.format,
            output.quiet,
            &format!("failed to read {}: {e}", path.display()),
        );
        exit_codes::RUNTIME_ERROR
    })?;
    parse_config_str(&content, ConfigFormat::Auto)
        .map(|parsed| parsed.config)
        .map_err(|e| {
            print_error(output.format, output.quiet, &e.to_string());
            exit_codes::VALIDATION_FAILED
        })
}

/// Overrides, one field at a time.
pub struct Overrides<'a> {
    pub mode: &'a ModeArgs,
    pub actions: &'a ActionArgs,
    pub limits: &'a LimitArgs,
    pub schedule: &'a ScheduleArgs,
    pub retry: &'a RetryArgs,
}

impl Overrides<'_> {
    pub fn apply(&self, cfg: &mut RunConfig) {
        if !self.mode.interact.is_empty() {
            cfg.interact = self.mode.interact.clone();
        }
        if let Some(n) = self.mode.unfollow {
            cfg.unfollow = Some(n);
        }

        if let Some(r) = self.actions.likes_count {
            cfg.actions.likes_count = r;
        }
        if let Some(p) = self.actions.follow_percentage {
            cfg.actions.follow_percentage = p;
        }
        if let Some(p) = self.actions.interact_percentage {
            cfg.actions.interact_percentage = p;
        }

        if let Some(n) = self.limits.total_likes_limit {
            cfg.limits.total_likes_limit = Some(n);
        }
        if let Some(n) = self.limits.interactions_count {
            cfg.limits.interactions_count = Some(n);
        }
        if let Some(n) = self.limits.follow_limit {
            cfg.limits.follow_limit = Some(n);
        }
        if let Some(r) = self.limits.session_length {
            cfg.limits.session_length = Some(r);
        }

        if let Some(r) = self.schedule.repeat {
            cfg.schedule.repeat = Some(r);
        }
        if let Some(n) = self.schedule.total_sessions {
            cfg.schedule.total_sessions = Some(n);
        }
        if let Some(r) = self.schedule.truncate_sources {
            cfg.schedule.truncate_sources = Some(r);
        }

        if let Some(n) = self.retry.retry_max_attempts {
            cfg.retry.max_attempts = Some(n);
        }
        if let Some(r) = self.retry.retry_delay {
            cfg.retry.delay_secs = r;
        }
    }
}

/// Print violations and map them to an exit code.
pub fn check_config(cfg: &RunConfig, output: &OutputArgs) -> Result<(), i32> {
    cfg.validate().map_err(|err| {
        print_violations(output.format, output.quiet, &violation_lines(&err));
        exit_codes::VALIDATION_FAILED
    })
}

pub fn violation_lines(err: &ValidationError) -> Vec<String> {
    err.violations
        .iter()
        .map(|v| format!("{}: {}", v.path, v.message))
        .collect()
}

/// Exit code for a configuration error raised after loading.
pub fn config_error_code(err: &ConfigError, output: &OutputArgs) -> i32 {
    match err {
        ConfigError::Validation(v) => {
            print_violations(output.format, output.quiet, &violation_lines(v))
        }
        other => print_error(output.format, output.quiet, &other.to_string()),
    }
    exit_codes::VALIDATION_FAILED
}

pub fn get_database_url(store_arg: Option<String>) -> String {
    store_arg
        .or_else(|| std::env::var("NIGHTOWL_DATABASE_URL").ok())
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| DEFAULT_STORE_URL.to_string())
}

/// Open the configured store, creating the schema when it is missing.
pub async fn open_store(
    url: &str,
    max_connections: u32,
) -> Result<Arc<dyn InteractionStore>, StoreError> {
    if url == MEMORY_STORE {
        return Ok(Arc::new(MemoryStore::new()));
    }
    let store = SqliteStore::open(url, max_connections).await?;
    Ok(Arc::new(store))
}

use std::path::Path;

use nightowl_core::{parse_config_str, ConfigFormat, Mode, Validate};
use serde::Serialize;

use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::OutputArgs;

use super::config::violation_lines;

#[derive(Serialize)]
struct ValidateResult {
    valid: bool,
    format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    mode: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

pub async fn validate_cmd(path: &Path, output: OutputArgs) -> i32 {
    let content = match std::fs::read_to_string(path) {
        Ok(v) => v,
        Err(e) => {
            print_error(
                output.format,
                output.quiet,
                &format!("failed to read {}: {e}", path.display()),
            );
            return exit_codes::RUNTIME_ERROR;
        }
    };

    let parsed = match parse_config_str(&content, ConfigFormat::Auto) {
        Ok(p) => p,
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            return exit_codes::VALIDATION_FAILED;
        }
    };

    match parsed.config.validate() {
        Ok(()) => {
            let mode = match parsed.config.mode() {
                Ok(Mode::Interact(sources)) => format!("interact with {} sources", sources.len()),
                Ok(Mode::Unfollow(n)) => format!("unfollow {n}"),
                Err(e) => e.to_string(),
            };
            if output.format == OutputFormat::Text && !output.quiet {
                println!("ok: valid run configuration ({:?}, {mode})", parsed.format);
            } else {
                let result = ValidateResult {
                    valid: true,
                    format: format!("{:?}", parsed.format),
                    mode: Some(mode),
                    errors: vec![],
                };
                print_result(output.format, output.quiet, &result);
            }
            exit_codes::SUCCESS
        }
        Err(err) => {
            let errors = violation_lines(&err);
            if output.format == OutputFormat::Text && !output.quiet {
                eprintln!("error: validation failed");
                for e in &errors {
                    eprintln!("- {e}");
                }
            } else {
                let result = ValidateResult {
                    valid: false,
                    format: format!("{:?}", parsed.format),
                    mode: None,
                    errors,
                };
                print_result(output.format, output.quiet, &result);
            }
            exit_codes::VALIDATION_FAILED
        }
    }
}

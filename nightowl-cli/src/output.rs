use nightowl_exec::ReportFormat;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => ReportFormat::Text,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

pub fn print_result<T: Serialize>(format: OutputFormat, quiet: bool, result: &T) {
    if quiet {
        return;
    }
    let json = match format {
        OutputFormat::Text => serde_json::to_string_pretty(result),
        OutputFormat::Json => serde_json::to_string(result),
    };
    if let Ok(json) = json {
        println!("{json}");
    }
}

pub fn print_error(format: OutputFormat, quiet: bool, message: &str) {
    if quiet {
        return;
    }
    match format {
        OutputFormat::Text => eprintln!("error: {message}"),
        OutputFormat::Json => {
            let err = serde_json::json!({"error": message});
            eprintln!("{}", serde_json::to_string(&err).unwrap_or_default());
        }
    }
}

/// Print every violation of a rejected configuration.
pub fn print_violations(format: OutputFormat, quiet: bool, errors: &[String]) {
    if quiet {
        return;
    }
    match format {
        OutputFormat::Text => {
            eprintln!("error: invalid configuration");
            for e in errors {
                eprintln!("- {e}");
            }
        }
        OutputFormat::Json => {
            let err = serde_json::json!({"error": "invalid configuration", "violations": errors});
            eprintln!("{}", serde_json::to_string(&err).unwrap_or_default());
        }
    }
}

use crate::config::RunConfig;
use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
    Auto,
}

#[derive(Debug, Clone)]
pub struct ParsedConfig {
    pub config: RunConfig,
    pub format: ConfigFormat,
}

pub fn parse_config_str(input: &str, format: ConfigFormat) -> Result<ParsedConfig, ConfigError> {
    match format {
        ConfigFormat::Json => Ok(ParsedConfig {
            config: serde_json::from_str::<RunConfig>(input)?,
            format,
        }),
        ConfigFormat::Yaml => Ok(ParsedConfig {
            config: parse_yaml(input)?,
            format,
        }),
        ConfigFormat::Auto => parse_config_auto(input),
    }
}

// An empty YAML document deserializes to unit, not to an empty mapping.
fn parse_yaml(input: &str) -> Result<RunConfig, ConfigError> {
    if input.trim().is_empty() {
        return Ok(RunConfig::default());
    }
    Ok(serde_yaml::from_str::<RunConfig>(input)?)
}

fn parse_config_auto(input: &str) -> Result<ParsedConfig, ConfigError> {
    // JSON always starts with `{` after trimming.
    if input.trim_start().starts_with('{') {
        return match serde_json::from_str::<RunConfig>(input) {
            Ok(config) => Ok(ParsedConfig {
                config,
                format: ConfigFormat::Json,
            }),
            Err(e) => match parse_yaml(input) {
                Ok(config) => Ok(ParsedConfig {
                    config,
                    format: ConfigFormat::Yaml,
                }),
                Err(_) => Err(ConfigError::Json(e)),
            },
        };
    }

    parse_yaml(input).map(|config| ParsedConfig {
        config,
        format: ConfigFormat::Yaml,
    })
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NightowlError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config as JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to parse config as YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid value range `{0}` (expected N or MIN-MAX)")]
    Range(String),
    #[error("invalid source `{0}`")]
    Source(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Error)]
#[error("run configuration failed validation ({violations_len} violations)")]
pub struct ValidationError {
    pub violations: Vec<Violation>,
    violations_len: usize,
}

impl ValidationError {
    pub fn new(violations: Vec<Violation>) -> Self {
        let violations_len = violations.len();
        Self {
            violations,
            violations_len,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session {0} is already finished")]
    Finished(uuid::Uuid),
    #[error("finish time {finish} precedes start time {start}")]
    FinishBeforeStart {
        start: chrono::DateTime<chrono::Utc>,
        finish: chrono::DateTime<chrono::Utc>,
    },
}

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverErrorKind {
    /// Lost or garbled connection to the automation backend.
    Protocol,
    /// A UI element disappeared between lookup and use.
    StaleIndex,
    Http,
    Timeout,
    /// The app is in a state the driver cannot handle.
    App,
    Unsupported,
}

impl DriverErrorKind {
    /// Transient kinds are recovered by restarting the app and retrying the job.
    pub fn is_transient(self) -> bool {
        matches!(
            self,
            DriverErrorKind::Protocol
                | DriverErrorKind::StaleIndex
                | DriverErrorKind::Http
                | DriverErrorKind::Timeout
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DriverErrorKind::Protocol => "protocol",
            DriverErrorKind::StaleIndex => "stale_index",
            DriverErrorKind::Http => "http",
            DriverErrorKind::Timeout => "timeout",
            DriverErrorKind::App => "app",
            DriverErrorKind::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for DriverErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} error: {message}")]
pub struct DriverError {
    pub kind: DriverErrorKind,
    pub message: String,
}

impl DriverError {
    pub fn new(kind: DriverErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(DriverErrorKind::Protocol, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(DriverErrorKind::Timeout, message)
    }

    pub fn app(message: impl Into<String>) -> Self {
        Self::new(DriverErrorKind::App, message)
    }

    pub fn is_transient(&self) -> bool {
        self.kind.is_transient()
    }
}

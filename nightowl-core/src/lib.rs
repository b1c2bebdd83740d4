#![forbid(unsafe_code)]

//! Session state, limits, configuration and reporting for nightowl runs.
//!
//! Nothing in this crate touches a device or sleeps; the retry loop and the
//! run controller live in `nightowl-exec`.

pub mod config;
pub mod error;
pub mod limits;
pub mod report;
pub mod session;
pub mod types;
pub mod validate;

pub use crate::config::{
    parse_config_str, ActionConfig, ConfigFormat, LimitsConfig, Mode, ParsedConfig,
    RetrySettings, RunConfig, ScheduleConfig,
};
pub use crate::error::{ConfigError, NightowlError, SessionError, ValidationError, Violation};
pub use crate::limits::{
    Limit, LimitCheck, LimitKind, LimitRegistry, LimitScope, LimitSelector, Threshold,
};
pub use crate::report::RunReport;
pub use crate::session::SessionState;
pub use crate::types::{
    ActionPlan, Identity, InteractionOutcome, Percentage, Source, Target, UnfollowOutcome,
    ValueRange,
};
pub use crate::validate::{validate_config, Validate};

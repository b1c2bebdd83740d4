/// Exit codes for scripts and schedulers.
pub const SUCCESS: i32 = 0;
pub const VALIDATION_FAILED: i32 = 2;
pub const RUN_FAILED: i32 = 3;
pub const RUNTIME_ERROR: i32 = 4;
/// 128 + SIGINT, as a shell reports it.
pub const INTERRUPTED: i32 = 130;

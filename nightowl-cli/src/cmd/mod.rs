pub mod config;
pub mod migrate;
pub mod report;
pub mod run;
pub mod validate;

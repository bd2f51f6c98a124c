//! Configuration module

pub mod cli;
pub mod harness_config;

pub use cli::CliArgs;
pub use harness_config::HarnessConfig;

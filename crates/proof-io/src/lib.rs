//! Configuration/problem file loading, CLI parsing, and solution output
//! for the `structa` binary.

pub mod cli;
pub mod config;
pub mod error;
mod kv;
pub mod output;
pub mod problem;
pub mod render;
pub mod system_info;

pub use cli::Cli;
pub use config::EngineConfig;
pub use error::{ConfigError, ProblemError, RunError};
pub use problem::Problem;
pub use system_info::SystemInfo;

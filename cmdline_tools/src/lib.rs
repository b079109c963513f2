#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

pub mod command_runner;
pub mod executor;

// Re-export executor types for convenience
pub use command_runner::build_command;
pub use executor::{
    CommandExecutor, DEFAULT_MAX_OUTPUT_BYTES, DEFAULT_TIMEOUT_SECS, ExecError, ExecutionOptions,
    ExecutionOutput, ProcessExecutor,
};

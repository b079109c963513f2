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

//! Description of an external process invocation.
//!
//! A [`Command`] only records what should be launched: executable, arguments,
//! working directory, environment and whether to go through a shell. Spawning
//! is left to the caller (see `cmdline_tools`).

pub mod command;
pub mod error;
pub mod platform;

pub use command::Command;
pub use error::{CommandError, Result};
pub use platform::Platform;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use cmdline_core::{Command, Platform};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::command_runner::build_command;

pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 30_000;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("Failed to execute command '{command_line}': {source}")]
    Spawn {
        command_line: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command '{command_line}' timed out after {timeout_ms} ms")]
    Timeout {
        command_line: String,
        timeout_ms: u128,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOptions {
    pub timeout: Duration,
    /// Per stream cap on the reported stdout and stderr. The full output is
    /// still buffered while the process runs.
    pub max_output_bytes: usize,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
        }
    }
}

impl ExecutionOptions {
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_max_output_bytes(mut self, max_output_bytes: usize) -> Self {
        self.max_output_bytes = max_output_bytes;
        self
    }
}

/// What a finished process left behind.
#[derive(Debug, Clone)]
pub struct ExecutionOutput {
    /// `-1` when the process was ended by a signal.
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u128,
    pub truncated: bool,
}

impl ExecutionOutput {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(
        &self,
        command: &Command,
        options: &ExecutionOptions,
    ) -> Result<ExecutionOutput, ExecError>;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Copy)]
pub struct ProcessExecutor {
    platform: Platform,
}

impl ProcessExecutor {
    #[must_use]
    pub const fn new() -> Self {
        Self::for_platform(Platform::current())
    }

    #[must_use]
    pub const fn for_platform(platform: Platform) -> Self {
        Self { platform }
    }

    #[must_use]
    pub const fn platform(&self) -> Platform {
        self.platform
    }
}

impl Default for ProcessExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandExecutor for ProcessExecutor {
    async fn execute(
        &self,
        command: &Command,
        options: &ExecutionOptions,
    ) -> Result<ExecutionOutput, ExecError> {
        let command_line = command.to_command_line_for(self.platform);
        info!("Executing: {}", command_line);
        if let Some(dir) = command.directory() {
            debug!("Working directory: {}", dir.display());
        }

        let started = Instant::now();
        let result = tokio::time::timeout(
            options.timeout,
            build_command(command, self.platform).output(),
        )
        .await;

        let output = match result {
            Ok(Ok(output)) => output,
            Ok(Err(source)) => {
                return Err(ExecError::Spawn {
                    command_line,
                    source,
                });
            }
            Err(_) => {
                warn!(
                    "Command timed out after {} ms: {}",
                    options.timeout.as_millis(),
                    command_line
                );
                return Err(ExecError::Timeout {
                    command_line,
                    timeout_ms: options.timeout.as_millis(),
                });
            }
        };

        let duration_ms = started.elapsed().as_millis();
        let exit_code = output.status.code().unwrap_or(-1);
        let (stdout, stdout_cut) =
            truncate_output(&String::from_utf8_lossy(&output.stdout), options.max_output_bytes);
        let (stderr, stderr_cut) =
            truncate_output(&String::from_utf8_lossy(&output.stderr), options.max_output_bytes);

        info!("Command exited with code {exit_code} in {duration_ms} ms");

        Ok(ExecutionOutput {
            exit_code,
            stdout,
            stderr,
            duration_ms,
            truncated: stdout_cut || stderr_cut,
        })
    }
}

/// Cut `text` to at most `max_bytes`, backing off to a char boundary.
fn truncate_output(text: &str, max_bytes: usize) -> (String, bool) {
    if text.len() <= max_bytes {
        return (text.to_string(), false);
    }
    let mut cutoff = max_bytes;
    while !text.is_char_boundary(cutoff) {
        cutoff -= 1;
    }
    (text[..cutoff].to_string(), true)
}

//! Static strategy pattern for CLI commands.
//!
//! Each subcommand is a separate strategy with its own type, so dispatch is
//! resolved at compile time.

use std::path::PathBuf;

use cmdline_config::Config;
use cmdline_core::Command;
use tracing::debug;

mod info;
mod init;
mod run;
mod show;
mod version;

pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use run::{RunInput, RunStrategy};
pub use show::{ShowInput, ShowStrategy};
pub use version::VersionStrategy;

/// Core trait defining the contract for all command strategies.
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

/// Description of the external command as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct CommandInput {
    pub executable: String,
    pub args: Vec<String>,
    pub directory: Option<PathBuf>,
    /// `NAME=VALUE` pairs, applied in order after the config overlay.
    pub env: Vec<(String, String)>,
    pub new_shell: bool,
}

impl CommandInput {
    /// Build a [`Command`] from the host environment, the config overlay and
    /// then the CLI overrides, in that order.
    pub fn build(&self, config: &Config) -> anyhow::Result<Command> {
        let command = Command::create(self.executable.as_str())?;
        Ok(self.configure(command, config))
    }

    fn configure(&self, mut command: Command, config: &Config) -> Command {
        config.apply(&mut command);
        command.add_arguments(self.args.iter().cloned());
        if let Some(dir) = &self.directory {
            command.set_directory(dir);
        }
        for (name, value) in &self.env {
            command.set_environment_variable(name.as_str(), value.as_str());
        }
        if self.new_shell {
            command.set_new_shell(true);
        }
        debug!("Built command: {}", command);
        command
    }
}

/// Parse a `NAME=VALUE` pair. The value may be empty or contain `=`.
pub fn parse_env_pair(raw: &str) -> Result<(String, String), String> {
    let Some((name, value)) = raw.split_once('=') else {
        return Err(format!("expected NAME=VALUE, got '{raw}'"));
    };
    if name.trim().is_empty() {
        return Err(format!("missing variable name in '{raw}'"));
    }
    Ok((name.to_string(), value.to_string()))
}

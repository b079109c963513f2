//! The [`Command`] builder.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::error::{CommandError, Result};
use crate::platform::Platform;

/// An external process invocation that has not been launched yet.
///
/// Built once through [`Command::create`] and configured with chained
/// builder calls:
///
/// ```rust
/// use cmdline_core::Command;
///
/// let mut cmd = Command::with_environment("echo", Vec::<(String, String)>::new())?;
/// cmd.add_argument("hi").set_environment_variable("LANG", "C");
/// assert_eq!(cmd.to_command_line_for(cmdline_core::Platform::Unix), "echo hi");
/// # Ok::<(), cmdline_core::CommandError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    executable: String,
    arguments: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    directory: Option<PathBuf>,
    environment: BTreeMap<String, String>,
    new_shell: bool,
}

impl Command {
    /// Create a command without arguments, seeding its environment with a
    /// snapshot of the current process environment.
    pub fn create(executable: impl Into<String>) -> Result<Self> {
        Self::with_environment(executable, host_environment())
    }

    /// Create a command whose environment is seeded from `env` instead of
    /// the host process.
    pub fn with_environment<I, K, V>(executable: impl Into<String>, env: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let executable = executable.into();
        if executable.chars().all(is_blank_char) {
            return Err(CommandError::InvalidArgument(
                "Command executable can not be blank".to_string(),
            ));
        }
        Ok(Self {
            executable,
            arguments: Vec::new(),
            directory: None,
            environment: env
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            new_shell: false,
        })
    }

    #[must_use]
    pub fn executable(&self) -> &str {
        &self.executable
    }

    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    pub fn add_argument(&mut self, arg: impl Into<String>) -> &mut Self {
        self.arguments.push(arg.into());
        self
    }

    pub fn add_arguments<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arguments.extend(args.into_iter().map(Into::into));
        self
    }

    /// Working directory, `None` meaning the caller's current directory.
    #[must_use]
    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    /// Existence of the directory is only checked when the command runs.
    pub fn set_directory(&mut self, directory: impl Into<PathBuf>) -> &mut Self {
        self.directory = Some(directory.into());
        self
    }

    /// Variables propagated to the process. Starts as a copy of the
    /// environment given at creation.
    #[must_use]
    pub const fn environment_variables(&self) -> &BTreeMap<String, String> {
        &self.environment
    }

    pub fn set_environment_variable(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.environment.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub const fn is_new_shell(&self) -> bool {
        self.new_shell
    }

    /// Run through `sh` (or `cmd /C`), for scripts lacking execute permission.
    pub const fn set_new_shell(&mut self, new_shell: bool) -> &mut Self {
        self.new_shell = new_shell;
        self
    }

    /// Tokens handed to the process launcher on the current platform.
    #[must_use]
    pub fn to_invocation(&self) -> Vec<String> {
        self.to_invocation_for(Platform::current())
    }

    #[must_use]
    pub fn to_invocation_for(&self, platform: Platform) -> Vec<String> {
        let prefix: &[&str] = if self.new_shell {
            platform.shell_prefix()
        } else {
            &[]
        };
        let mut tokens = Vec::with_capacity(prefix.len() + 1 + self.arguments.len());
        tokens.extend(prefix.iter().map(|t| (*t).to_string()));
        tokens.push(self.executable.clone());
        tokens.extend(self.arguments.iter().cloned());
        tokens
    }

    /// Space-joined invocation, for display and logging only.
    ///
    /// Arguments are not quoted, so the result cannot always be parsed back.
    #[must_use]
    pub fn to_command_line(&self) -> String {
        self.to_command_line_for(Platform::current())
    }

    #[must_use]
    pub fn to_command_line_for(&self, platform: Platform) -> String {
        self.to_invocation_for(platform).join(" ")
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_command_line())
    }
}

/// Whitespace in the sense of `Character.isWhitespace`: Unicode white space
/// minus the no-break spaces and NEL, plus the four C0 separators.
fn is_blank_char(c: char) -> bool {
    match c {
        '\u{1C}'..='\u{1F}' => true,
        '\u{85}' | '\u{A0}' | '\u{2007}' | '\u{202F}' => false,
        _ => c.is_whitespace(),
    }
}

fn host_environment() -> Vec<(String, String)> {
    std::env::vars_os()
        .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => Some((key, value)),
            (key, _) => {
                debug!("Skipping non UTF-8 environment variable {key:?}");
                None
            }
        })
        .collect()
}

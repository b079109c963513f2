use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use cmdline_core::Command;
use cmdline_tools::{DEFAULT_MAX_OUTPUT_BYTES, DEFAULT_TIMEOUT_SECS, ExecutionOptions};
use serde::{Deserialize, Serialize};
use tracing::debug;

const CONFIG_DIR_NAME: &str = "cmdline";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub execution: ExecutionConfig,
    /// Variables overlaid on every command after the host snapshot.
    #[serde(default)]
    pub environment: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ExecutionConfig {
    #[serde(default = "ExecutionConfig::default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "ExecutionConfig::default_max_output_bytes")]
    pub max_output_bytes: usize,
    #[serde(default)]
    pub new_shell: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: Self::default_timeout_secs(),
            max_output_bytes: Self::default_max_output_bytes(),
            new_shell: false,
        }
    }
}

impl ExecutionConfig {
    const fn default_timeout_secs() -> u64 {
        DEFAULT_TIMEOUT_SECS
    }

    const fn default_max_output_bytes() -> usize {
        DEFAULT_MAX_OUTPUT_BYTES
    }

    #[must_use]
    pub const fn options(&self) -> ExecutionOptions {
        ExecutionOptions {
            timeout: Duration::from_secs(self.timeout_secs),
            max_output_bytes: self.max_output_bytes,
        }
    }
}

impl Config {
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join(CONFIG_DIR_NAME))
    }

    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            anyhow::bail!(
                "Config file not found at: {}. Please run 'cmdline init' to create config.",
                config_path.display()
            );
        }

        let content = std::fs::read_to_string(&config_path)?;
        Self::from_json(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config at {}: {e}", config_path.display()))
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default() -> anyhow::Result<Self> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            Self::load()
        } else {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            Ok(Self::default())
        }
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    /// Overlay configured variables and shell preference onto `command`.
    ///
    /// `new_shell` only ever turns shell wrapping on.
    pub fn apply(&self, command: &mut Command) {
        for (name, value) in &self.environment {
            command.set_environment_variable(name.as_str(), value.as_str());
        }
        if self.execution.new_shell {
            command.set_new_shell(true);
        }
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        std::fs::write(&config_path, CONFIG_TEMPLATE)?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("🔧 Configuration options:");
        println!("   - execution.timeout_secs: Seconds before a running command is killed");
        println!("   - execution.max_output_bytes: Cap on captured stdout/stderr per stream");
        println!("   - execution.new_shell: Always run commands through sh (cmd /C on Windows)");
        println!("   - environment: Variables added to every command");
        println!();
        Ok(())
    }
}

const CONFIG_TEMPLATE: &str = r#"{
  "execution": {
    "timeout_secs": 120,
    "max_output_bytes": 30000,
    "new_shell": false
  },
  "environment": {}
}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.execution.timeout_secs, 120);
        assert_eq!(config.execution.max_output_bytes, 30_000);
        assert!(!config.execution.new_shell);
        assert!(config.environment.is_empty());
    }

    #[test]
    fn test_template_parses_to_defaults() {
        let config = Config::from_json(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_execution_section() {
        let config = Config::from_json(r#"{"execution": {"new_shell": true}}"#).unwrap();
        assert!(config.execution.new_shell);
        assert_eq!(config.execution.timeout_secs, 120);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(Config::from_json("{\"execution\": 5}").is_err());
    }

    #[test]
    fn test_options() {
        let config = Config::from_json(
            r#"{"execution": {"timeout_secs": 5, "max_output_bytes": 64}}"#,
        )
        .unwrap();
        let options = config.execution.options();
        assert_eq!(options.timeout, Duration::from_secs(5));
        assert_eq!(options.max_output_bytes, 64);
    }

    #[test]
    fn test_apply_overlays_environment_and_shell() {
        let config = Config::from_json(
            r#"{"execution": {"new_shell": true}, "environment": {"LANG": "C", "NEW": "1"}}"#,
        )
        .unwrap();
        let mut cmd = Command::with_environment("ls", [("LANG", "fr_FR"), ("PATH", "/bin")])
            .unwrap();
        config.apply(&mut cmd);

        let env = cmd.environment_variables();
        assert_eq!(env["LANG"], "C");
        assert_eq!(env["NEW"], "1");
        assert_eq!(env["PATH"], "/bin");
        assert!(cmd.is_new_shell());
    }

    #[test]
    fn test_apply_keeps_shell_when_config_disabled() {
        let mut cmd = Command::with_environment("ls", Vec::<(String, String)>::new()).unwrap();
        cmd.set_new_shell(true);
        Config::default().apply(&mut cmd);
        assert!(cmd.is_new_shell());
    }
}

use std::io::Write;
use std::time::Duration;

use cmdline_config::Config;
use cmdline_tools::{CommandExecutor, ExecutionOutput, ProcessExecutor};
use tracing::info;

use super::CommandInput;

/// Input parameters for the Run command strategy.
#[derive(Debug, Clone)]
pub struct RunInput {
    pub command: CommandInput,
    /// Overrides `execution.timeout_secs` from the config
    pub timeout_secs: Option<u64>,
}

/// Strategy for building a command and running it as a child process.
///
/// The process exits with the child's exit code when it is non-zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunStrategy<E = ProcessExecutor> {
    executor: E,
}

impl<E: CommandExecutor> RunStrategy<E> {
    pub const fn new(executor: E) -> Self {
        Self { executor }
    }

    pub async fn run(&self, input: &RunInput, config: &Config) -> anyhow::Result<ExecutionOutput> {
        let command = input.command.build(config)?;
        let mut options = config.execution.options();
        if let Some(secs) = input.timeout_secs {
            options = options.with_timeout(Duration::from_secs(secs));
        }
        let output = self.executor.execute(&command, &options).await?;
        if output.truncated {
            info!(
                "Output truncated to {} bytes per stream",
                options.max_output_bytes
            );
        }
        Ok(output)
    }
}

impl<E: CommandExecutor + 'static> super::CommandStrategy for RunStrategy<E> {
    type Input = RunInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load_or_default()?;
        let output = self.run(&input, &config).await?;

        std::io::stdout().write_all(output.stdout.as_bytes())?;
        std::io::stderr().write_all(output.stderr.as_bytes())?;

        if !output.is_success() {
            std::process::exit(output.exit_code);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use cmdline_core::Command;
    use cmdline_tools::{ExecError, ExecutionOptions};

    use super::*;

    #[derive(Default)]
    struct RecordingExecutor {
        seen: Mutex<Vec<(String, ExecutionOptions)>>,
    }

    #[async_trait]
    impl CommandExecutor for RecordingExecutor {
        async fn execute(
            &self,
            command: &Command,
            options: &ExecutionOptions,
        ) -> Result<ExecutionOutput, ExecError> {
            self.seen
                .lock()
                .unwrap()
                .push((command.to_command_line(), options.clone()));
            Ok(ExecutionOutput {
                exit_code: 0,
                stdout: "ok".to_string(),
                stderr: String::new(),
                duration_ms: 1,
                truncated: false,
            })
        }
    }

    fn input(timeout_secs: Option<u64>) -> RunInput {
        RunInput {
            command: CommandInput {
                executable: "cargo".to_string(),
                args: vec!["build".to_string()],
                ..CommandInput::default()
            },
            timeout_secs,
        }
    }

    #[tokio::test]
    async fn test_run_uses_config_options() {
        let strategy = RunStrategy::new(RecordingExecutor::default());
        let config =
            Config::from_json(r#"{"execution": {"timeout_secs": 7, "max_output_bytes": 9}}"#)
                .unwrap();

        let output = strategy.run(&input(None), &config).await.unwrap();
        assert_eq!(output.stdout, "ok");

        let seen = strategy.executor.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "cargo build");
        assert_eq!(seen[0].1.timeout, Duration::from_secs(7));
        assert_eq!(seen[0].1.max_output_bytes, 9);
    }

    #[tokio::test]
    async fn test_run_timeout_override() {
        let strategy = RunStrategy::new(RecordingExecutor::default());
        strategy.run(&input(Some(2)), &Config::default()).await.unwrap();

        let seen = strategy.executor.seen.lock().unwrap();
        assert_eq!(seen[0].1.timeout, Duration::from_secs(2));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_real_process() {
        let strategy = RunStrategy::<ProcessExecutor>::default();
        let run_input = RunInput {
            command: CommandInput {
                executable: "sh".to_string(),
                args: vec!["-c".to_string(), "printf %s \"$WHO\"; exit 4".to_string()],
                env: vec![("WHO".to_string(), "cli".to_string())],
                ..CommandInput::default()
            },
            timeout_secs: None,
        };
        let output = strategy.run(&run_input, &Config::default()).await.unwrap();
        assert_eq!(output.stdout, "cli");
        assert_eq!(output.exit_code, 4);
    }
}

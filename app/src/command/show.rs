use cmdline_config::Config;

use super::CommandInput;

/// Input parameters for the Show command strategy.
#[derive(Debug, Clone)]
pub struct ShowInput {
    pub command: CommandInput,
    /// Print the whole command as JSON instead of the command line
    pub json: bool,
}

/// Strategy for printing a command without running it.
#[derive(Debug, Clone, Copy)]
pub struct ShowStrategy;

impl ShowStrategy {
    pub fn render(input: &ShowInput, config: &Config) -> anyhow::Result<String> {
        let command = input.command.build(config)?;
        if input.json {
            Ok(serde_json::to_string_pretty(&command)?)
        } else {
            Ok(command.to_command_line())
        }
    }
}

impl super::CommandStrategy for ShowStrategy {
    type Input = ShowInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load_or_default()?;
        println!("{}", Self::render(&input, &config)?);
        Ok(())
    }
}

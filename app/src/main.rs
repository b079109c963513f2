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

mod command;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use cmdline_tools::ProcessExecutor;
use command::{
    CommandInput, CommandStrategy, InfoStrategy, InitStrategy, RunInput, RunStrategy, ShowInput,
    ShowStrategy, VersionStrategy, parse_env_pair,
};
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "cmdline")]
#[command(about = "Build, inspect and run external commands", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the command line without running it
    Show {
        #[command(flatten)]
        command: CommandArgs,

        /// Print the whole command as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the command and report its output
    Run {
        #[command(flatten)]
        command: CommandArgs,

        /// Seconds before the command is killed
        #[arg(short, long)]
        timeout: Option<u64>,
    },
    /// Initialize configuration
    Init,
    /// Show effective configuration
    Info,
    /// Show version
    Version,
}

#[derive(Args, Debug)]
struct CommandArgs {
    /// Run through sh (cmd /C on Windows)
    #[arg(long)]
    new_shell: bool,

    /// Working directory of the command
    #[arg(short = 'C', long)]
    directory: Option<PathBuf>,

    /// Extra environment variable, may be repeated
    #[arg(short, long = "env", value_name = "NAME=VALUE", value_parser = parse_env_pair)]
    env: Vec<(String, String)>,

    /// Program to run followed by its arguments, passed verbatim
    #[arg(
        value_name = "EXECUTABLE",
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    command: Vec<String>,
}

impl From<CommandArgs> for CommandInput {
    fn from(args: CommandArgs) -> Self {
        let mut words = args.command.into_iter();
        Self {
            executable: words.next().unwrap_or_default(),
            args: words.collect(),
            directory: args.directory,
            env: args.env,
            new_shell: args.new_shell,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    debug!("Log level set to {level}");

    match cli.command {
        Commands::Show { command, json } => {
            ShowStrategy
                .execute(ShowInput {
                    command: command.into(),
                    json,
                })
                .await?;
        }
        Commands::Run { command, timeout } => {
            RunStrategy::new(ProcessExecutor::new())
                .execute(RunInput {
                    command: command.into(),
                    timeout_secs: timeout,
                })
                .await?;
        }
        Commands::Init => InitStrategy.execute(()).await?,
        Commands::Info => InfoStrategy.execute(()).await?,
        Commands::Version => VersionStrategy.execute(()).await?,
    }

    Ok(())
}

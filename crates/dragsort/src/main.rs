use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use dragsort::OverlapPolicy;
use dragsort::app::replay::{self, ReplayOptions, Script};
use dragsort::infra::config::Config;

#[derive(Parser)]
#[command(author, version, about = "Replay drag-and-drop list reordering scenarios", long_about = None)]
struct Cli {
    /// Use this config file instead of the user and workspace configs
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a YAML or JSON scenario and print the report as JSON
    Replay {
        script: PathBuf,
        /// How to treat a start event while a drag is already active
        #[arg(long, value_enum)]
        overlap: Option<OverlapPolicy>,
    },
    /// Print the effective configuration
    Config,
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_explicit(path)?,
        None => Config::load()?,
    };
    dragsort::init(&config)?;

    match cli.command {
        Commands::Replay { script, overlap } => {
            let mut options = ReplayOptions::from_config(&config);
            if let Some(policy) = overlap {
                options.overlap = policy;
            }
            let script = Script::from_path(&script)?;
            let report = replay::run(&script, &options)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Config => print!("{}", config.to_toml()?),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "dragsort", &mut io::stdout());
        }
    }
    Ok(())
}

use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use snapdeck_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "snapdeck")]
#[command(author, version, about = "Full-screen scroll-snap page deck for the terminal")]
struct Cli {
    /// Config file to use instead of ~/.config/snapdeck/config.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the deck in the terminal
    Run,
    /// Print the page offsets and the initial mount
    Positions {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Replay input steps against a deck on a virtual clock
    ///
    /// Steps: down, up, wheel:<dy>, touch:<y>, touch-end, goto:<page>, wait:<ms>
    Simulate {
        #[arg(required = true)]
        steps: Vec<String>,
    },
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(AppConfig::config_path);

    match cli.command {
        Some(Commands::Run) | None => {
            let config = AppConfig::load_from(&config_path)?;
            // The terminal belongs to the UI, so logs go to a file
            init_logging(&config.general.log_level, Some(config.log_path()))?;
            commands::run::run(config, config_path).await
        }
        Some(Commands::Positions { json }) => {
            let config = AppConfig::load_from(&config_path)?;
            init_logging(&config.general.log_level, None)?;
            commands::positions::run(&config, json)
        }
        Some(Commands::Simulate { steps }) => {
            let config = AppConfig::load_from(&config_path)?;
            init_logging(&config.general.log_level, None)?;
            commands::simulate::run(&config, &steps)
        }
        Some(Commands::Init { force }) => {
            init_logging("info", None)?;
            commands::init::run(&config_path, force)
        }
    }
}

fn init_logging(default_level: &str, log_file: Option<PathBuf>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.into()),
    );
    let registry = tracing_subscriber::registry().with(filter);

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        None => {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_writer(io::stderr),
                )
                .init();
        }
    }

    Ok(())
}

//! CLI module for Trekbot.
//!
//! Subcommands:
//! - `run`: Run the bot over the console transport
//! - `registry`: Print the container's contract bindings

mod registry;
mod run;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::di::Container;
use crate::error::AppError;

/// Trekbot - travel chat bot
#[derive(Parser)]
#[command(name = "trekbot")]
#[command(about = "Travel chat bot wired by a dependency injection container")]
#[command(version)]
pub struct App {
    /// Run in verbose mode
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the bot, reading messages from stdin
    Run {
        /// Read `Update` JSON objects and write replies as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Print every contract binding
    Registry,
}

impl App {
    /// Run the CLI application.
    pub async fn run(self) -> color_eyre::Result<()> {
        match self.command {
            Command::Run { json } => self.run_bot(json).await,
            Command::Registry => self.run_registry(),
        }
    }
}

/// Builds the container from every linked injectable plus the loaded config.
pub fn build_container(config: &Config) -> Result<Container, AppError> {
    let container = Container::builder()
        .discover()
        .instance(config.clone())
        .options(config.container)
        .build()?;
    Ok(container)
}

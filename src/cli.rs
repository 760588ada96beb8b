//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Dayflow - LLM-assisted daily schedule generation
#[derive(Parser)]
#[command(
    name = "dayflow",
    about = "Generate an ordered daily schedule from a task payload",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Run the scheduling pipeline over a JSON payload
    Generate {
        /// Path to the request payload (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the result JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Inspect the template catalog
    Templates {
        #[command(subcommand)]
        command: TemplatesCommand,
    },
}

/// Template catalog subcommands
#[derive(Subcommand)]
pub enum TemplatesCommand {
    /// List catalog entries
    List,

    /// Force a reload of the catalog from disk
    Refresh,
}

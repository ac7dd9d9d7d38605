//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod generate;
mod status;

pub use generate::GenerateArgs;

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Submit a generation request and wait for the videos
    Generate(GenerateArgs),
    /// Check a previously submitted operation once
    Status {
        /// Operation name returned at submission
        operation_name: String,

        /// Directory receiving inline videos
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },
}

/// Handle a CLI command
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Generate(args) => generate::handle_generate(args, config).await,
        Commands::Status {
            operation_name,
            output_dir,
        } => status::handle_status(&operation_name, &output_dir, config).await,
    }
}

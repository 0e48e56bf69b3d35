//! CLI module for Storegate
//!
//! Provides command-line interface parsing for the storegate-server binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Storegate - users, profiles and signed sessions over REST
#[derive(Parser, Debug)]
#[command(
    name = "storegate-server",
    version,
    about = "Storegate - users, profiles and signed sessions over REST",
    after_help = "EXAMPLES:\n    \
                  storegate-server                          # Start the server (reads storegate.toml)\n    \
                  storegate-server --config prod.toml       # Use a custom config file\n    \
                  storegate-server config --validate        # Check the config and exit"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "storegate.toml", env = "STOREGATE_CONFIG", global = true)]
    pub config: PathBuf,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Show configuration information
    Config {
        /// Validate the configuration file, including the signing secret
        #[arg(long)]
        validate: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

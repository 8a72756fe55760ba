//! Command-line interface definitions using clap

#[cfg(feature = "cli")]
pub mod commands;

use clap::{Parser, Subcommand};
use std::fmt;

/// hashlinker - SHA-1 keyed URL shortener
#[derive(Parser, Debug)]
#[command(name = "hashlinker")]
#[command(version)]
#[command(about = "A hash-keyed URL shortener", long_about = None)]
pub struct Cli {
    /// Path to a TOML configuration file (default: ./hashlinker.toml if present)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Print the short key for one or more URLs
    Key {
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Print the route table derived from the url config file
    List,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: hashlinker.example.toml)
        output_path: Option<String>,

        /// Force overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<crate::errors::HashlinkerError> for CliError {
    fn from(err: crate::errors::HashlinkerError) -> Self {
        CliError::StorageError(err.to_string())
    }
}

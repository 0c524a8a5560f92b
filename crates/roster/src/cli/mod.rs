//! Command-line interface for roster.
//!
//! The binary has no subcommands: it starts the interactive session. Flags
//! only choose where configuration, data, and content come from.

use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;

/// roster - Register and browse collaborators
///
/// Starts an interactive session for registering, listing, and deleting
/// collaborator records kept in a local SQLite file.
#[derive(Debug, Parser)]
#[command(name = "roster")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Path to the database file (overrides configuration)
    #[arg(short, long, value_name = "FILE")]
    pub database: Option<PathBuf>,

    /// Path to the content file shown by `about` (overrides configuration)
    #[arg(long, value_name = "FILE")]
    pub content: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }

    /// Apply path overrides given on the command line.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(database) = &self.database {
            config.storage.database_path = Some(database.clone());
        }
        if let Some(content) = &self.content {
            config.content.path = content.clone();
        }
    }
}

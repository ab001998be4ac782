//! CLI definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// jobsync - Reconcile a SQL table of jobs with an XML document
#[derive(Parser, Debug)]
#[command(name = "jobsync", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database path (default: ~/.jobsync/data/jobsync.db)
    #[arg(long, global = true, env = "JOBSYNC_DB")]
    pub db: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Compute changes without writing to the database
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the jobs database
    Init {
        /// Recreate the schema even if the database exists
        #[arg(long)]
        force: bool,
    },

    /// Print version information
    Version,

    /// Merge an XML file into the jobs table (insert, update, delete)
    Sync {
        /// XML file to import
        file: PathBuf,
    },

    /// Write the jobs table to an XML file
    Save {
        /// XML file to write
        file: PathBuf,
    },

    /// Show stored jobs and, for a file, the pending changes
    Status {
        /// XML file to compare against
        file: Option<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

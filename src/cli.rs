use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::locations::Location;

/// xcsweep - A macOS developer cache cleanup utility
#[derive(Parser, Debug)]
#[command(name = "xcsweep")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan developer caches and report reclaimable space
    Scan(ScanArgs),

    /// Scan developer caches and delete the selected entries
    Clean(CleanArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Developer directory to scan (defaults to ~/Library/Developer)
    #[arg(long, value_name = "PATH")]
    pub developer_dir: Option<PathBuf>,

    /// Cache categories to scan (comma-separated)
    #[arg(short, long, value_delimiter = ',', value_enum, value_name = "LOCATIONS")]
    pub locations: Option<Vec<Location>>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Developer directory to scan (defaults to ~/Library/Developer)
    #[arg(long, value_name = "PATH")]
    pub developer_dir: Option<PathBuf>,

    /// Cache categories to clean (comma-separated)
    #[arg(short, long, value_delimiter = ',', value_enum, value_name = "LOCATIONS")]
    pub locations: Option<Vec<Location>>,

    /// Show what would be deleted without doing it
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Skip confirmation prompts
    #[arg(short, long)]
    pub force: bool,

    /// Select every entry, including those deselected by default
    #[arg(long)]
    pub all: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::export::ExportFormat;

/// Look a word up across dictionary, association, semantic-graph and
/// encyclopedia providers at once.
#[derive(Debug, Parser)]
#[command(name = "wordscout", version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Provider language code (overrides WORDSCOUT_LANG).
    #[arg(long, global = true)]
    pub lang: Option<String>,

    /// Per-provider timeout in seconds (overrides WORDSCOUT_TIMEOUT_SECS).
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build a word bundle and export it.
    Lookup(LookupArgs),

    /// Build a word bundle and print a short AI synthesis of it.
    Summarize(SummarizeArgs),

    /// Re-render a saved JSON export.
    Render(RenderArgs),

    /// Print today's suggested word.
    WordOfTheDay,
}

#[derive(Debug, Args)]
pub struct LookupArgs {
    /// Word or phrase to look up (default: the word of the day).
    pub term: Option<String>,

    /// Export format.
    #[arg(short, long, value_enum, default_value_t = ExportFormat::Md)]
    pub format: ExportFormat,

    /// Write the export to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print how each provider call settled to stderr.
    #[arg(long)]
    pub diagnostics: bool,
}

#[derive(Debug, Args)]
pub struct SummarizeArgs {
    /// Word or phrase to summarize.
    pub term: String,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// JSON file previously written by `lookup --format json`.
    pub path: PathBuf,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ExportFormat::Md)]
    pub format: ExportFormat,
}

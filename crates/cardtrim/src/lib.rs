//! Library interface for the `cardtrim` CLI.
//!
//! This crate exposes the CLI's argument parser and command structure as a library,
//! primarily for documentation generation and testing. The actual entry point is
//! in `main.rs`.
//!
//! # Structure
//!
//! - [`Cli`] - The root argument parser (clap derive)
//! - [`Commands`] - Available subcommands
//! - [`commands`] - Command implementations

pub mod commands;

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// Color output preference.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect terminal capabilities automatically.
    #[default]
    Auto,
    /// Always emit colors.
    Always,
    /// Never emit colors.
    Never,
}

impl ColorChoice {
    /// Configure global color output based on this choice.
    ///
    /// Call this once at startup to set the color mode.
    pub fn apply(self) {
        match self {
            Self::Auto => {} // owo-colors auto-detects by default
            Self::Always => owo_colors::set_override(true),
            Self::Never => owo_colors::set_override(false),
        }
    }
}

const ENV_HELP: &str = "\
ENVIRONMENT VARIABLES:
    RUST_LOG               Log filter (e.g., debug, cardtrim=trace)
    CARDTRIM_LOG_PATH      Explicit log file path
    CARDTRIM_LOG_DIR       Log directory
    CARDTRIM_DATA_DIR      Directory holding the deck files
";

/// Command-line interface definition for cardtrim.
///
/// Running without a subcommand performs `fix` with its defaults.
#[derive(Parser)]
#[command(name = "cardtrim")]
#[command(about = "Shorten overlong pronunciation fields in flashcard JSON decks", long_about = None)]
#[command(version)]
#[command(after_long_help = ENV_HELP)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Print only the version number (for scripting)
    #[arg(long)]
    pub version_only: bool,

    /// Path to configuration file (overrides discovery)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Run as if started in DIR
    #[arg(short = 'C', long, global = true)]
    pub chdir: Option<PathBuf>,

    /// Only print errors (suppresses warnings/info)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// More detail (repeatable; e.g. -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Colorize output
    #[arg(long, global = true, value_enum, default_value_t)]
    pub color: ColorChoice,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,
}

/// Available subcommands for the CLI.
#[derive(Subcommand)]
pub enum Commands {
    /// Shorten long pronunciations in the deck files (default)
    Fix(commands::fix::FixArgs),

    /// Show package information and effective configuration
    Info(commands::info::InfoArgs),
}

/// Returns the clap command for documentation generation
pub fn command() -> clap::Command {
    Cli::command()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        command().debug_assert();
    }

    #[test]
    fn no_subcommand_parses() {
        let cli = Cli::try_parse_from(["cardtrim"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn fix_takes_files_and_flags() {
        let cli =
            Cli::try_parse_from(["cardtrim", "fix", "--dry-run", "--data-dir", "d", "a.json"])
                .unwrap();
        let Some(Commands::Fix(args)) = cli.command else {
            panic!("expected fix");
        };
        assert!(args.dry_run);
        assert_eq!(args.files, ["a.json"]);
        assert_eq!(args.data_dir.as_deref().map(|d| d.as_str()), Some("d"));
    }
}

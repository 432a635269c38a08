//! Fix command: shorten long pronunciations across the deck files.
//!
//! Files are processed one at a time in list order. A missing file is
//! reported and skipped; a file that cannot be read, parsed, or written
//! stops the run. Files fixed before the failure stay fixed.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use owo_colors::{OwoColorize, Stream::Stdout};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use cardtrim_core::config::Config;
use cardtrim_core::targets::{self, Target};
use cardtrim_core::update::{FileReport, UpdateOptions, update_file};

/// Arguments for the `fix` subcommand.
#[derive(Args, Debug, Default)]
pub struct FixArgs {
    /// Deck file names to process (default: configured list, then built-in list).
    pub files: Vec<String>,

    /// Directory holding the deck files.
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<Utf8PathBuf>,

    /// Report what would change without writing any file.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum FileStatus {
    Processed,
    Missing,
}

#[derive(Debug, Serialize)]
struct FileEntry {
    file: String,
    status: FileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    cards: Option<usize>,
    modified: usize,
    written: bool,
}

impl FileEntry {
    fn missing(target: &Target) -> Self {
        Self {
            file: target.name.clone(),
            status: FileStatus::Missing,
            cards: None,
            modified: 0,
            written: false,
        }
    }

    fn processed(target: &Target, report: &FileReport) -> Self {
        Self {
            file: target.name.clone(),
            status: FileStatus::Processed,
            cards: Some(report.cards),
            modified: report.modified,
            written: report.written,
        }
    }
}

#[derive(Debug, Serialize)]
struct FixSummary {
    data_dir: Utf8PathBuf,
    dry_run: bool,
    files: Vec<FileEntry>,
    total_modified: usize,
}

/// Shorten pronunciations in every listed deck file.
///
/// # Arguments
/// * `global_json` - Global `--json` flag from CLI
/// * `config` - Loaded configuration
/// * `cwd` - Directory that relative data directories resolve against
#[instrument(name = "cmd_fix", skip_all, fields(dry_run = args.dry_run))]
pub fn cmd_fix(
    args: FixArgs,
    global_json: bool,
    config: &Config,
    cwd: &Utf8Path,
) -> anyhow::Result<()> {
    let explicit_dir = args.data_dir.as_deref().or(config.data_dir.as_deref());
    let data_dir = targets::resolve_data_dir(explicit_dir, cwd);

    let names = if args.files.is_empty() {
        config.files.clone().unwrap_or_default()
    } else {
        args.files
    };
    let targets = targets::resolve_targets(&data_dir, names.as_slice());
    debug!(data_dir = %data_dir, files = targets.len(), "executing fix command");

    let options = UpdateOptions {
        policy: config.shorten_policy(),
        max_input_bytes: config.input_limit(),
        dry_run: args.dry_run,
    };

    let mut summary = FixSummary {
        data_dir,
        dry_run: args.dry_run,
        files: Vec::with_capacity(targets.len()),
        total_modified: 0,
    };

    for target in &targets {
        if !target.exists() {
            warn!(path = %target.path, "deck file not found");
            if !global_json {
                println!(
                    "{} {}",
                    "File not found:".if_supports_color(Stdout, |t| t.yellow()),
                    target.name
                );
            }
            summary.files.push(FileEntry::missing(target));
            continue;
        }

        if !global_json {
            println!(
                "Processing: {}",
                target.name.if_supports_color(Stdout, |t| t.bold())
            );
        }

        let report = update_file(&target.path, &options)
            .with_context(|| format!("failed to update {}", target.path))?;
        summary.total_modified += report.modified;

        if !global_json {
            print_file_result(&report, args.dry_run);
        }
        summary.files.push(FileEntry::processed(target, &report));
    }

    if global_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!();
        println!("Total cards modified: {}", summary.total_modified);
    }

    Ok(())
}

fn print_file_result(report: &FileReport, dry_run: bool) {
    if report.modified == 0 {
        println!(
            "  {}",
            "No changes needed".if_supports_color(Stdout, |t| t.dimmed())
        );
    } else if dry_run {
        println!(
            "  {}",
            format!("Would modify {} cards", report.modified)
                .if_supports_color(Stdout, |t| t.cyan())
        );
    } else {
        println!(
            "  {}",
            format!("Modified {} cards", report.modified)
                .if_supports_color(Stdout, |t| t.green())
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn utf8(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap()
    }

    #[test]
    fn missing_files_are_not_fatal() {
        let tmp = TempDir::new().unwrap();
        let args = FixArgs {
            files: vec!["absent.json".to_string()],
            data_dir: Some(utf8(&tmp)),
            dry_run: false,
        };
        assert!(cmd_fix(args, false, &Config::default(), &utf8(&tmp)).is_ok());
    }

    #[test]
    fn configured_files_and_dir_are_used() {
        let tmp = TempDir::new().unwrap();
        let decks = tmp.path().join("decks");
        fs::create_dir(&decks).unwrap();
        let long = "word ".repeat(60);
        fs::write(
            decks.join("one.json"),
            json!({"cards": [{"pronunciation": long}]}).to_string(),
        )
        .unwrap();

        let config = Config {
            data_dir: Some(Utf8PathBuf::from("decks")),
            files: Some(vec!["one.json".to_string()]),
            ..Config::default()
        };
        cmd_fix(FixArgs::default(), true, &config, &utf8(&tmp)).unwrap();

        let saved = fs::read_to_string(decks.join("one.json")).unwrap();
        assert!(saved.contains("..."));
    }

    #[test]
    fn malformed_deck_stops_the_run() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("bad.json"), "not json").unwrap();
        let args = FixArgs {
            files: vec!["bad.json".to_string()],
            data_dir: Some(utf8(&tmp)),
            dry_run: false,
        };

        let err = cmd_fix(args, false, &Config::default(), &utf8(&tmp)).unwrap_err();
        assert!(format!("{err:#}").contains("bad.json"));
    }

    #[test]
    fn directory_in_place_of_a_deck_stops_the_run() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("go-concepts.json")).unwrap();
        let args = FixArgs {
            files: vec!["go-concepts.json".to_string()],
            data_dir: Some(utf8(&tmp)),
            dry_run: false,
        };

        let err = cmd_fix(args, false, &Config::default(), &utf8(&tmp)).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("failed to read"), "unexpected error: {message}");
        assert!(message.contains("go-concepts.json"));
    }

    #[test]
    fn entries_serialize_with_lowercase_status() {
        let target = Target {
            name: "go.json".to_string(),
            path: Utf8PathBuf::from("/d/go.json"),
        };
        let value = serde_json::to_value(FileEntry::missing(&target)).unwrap();
        assert_eq!(value, json!({"file": "go.json", "status": "missing", "modified": 0, "written": false}));
    }
}

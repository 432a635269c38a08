//! Info command implementation

use camino::Utf8Path;
use cardtrim_core::ShortenPolicy;
use cardtrim_core::config::{Config, ConfigSources};
use cardtrim_core::targets;
use clap::Args;
use owo_colors::{OwoColorize, Stream::Stdout};
use serde::Serialize;
use tracing::{debug, instrument};

/// Arguments for the `info` subcommand.
#[derive(Args, Debug, Default)]
pub struct InfoArgs {
    // No subcommand-specific arguments; uses global --json flag
}

#[derive(Serialize)]
struct PackageInfo {
    name: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    repository: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    license: &'static str,
}

impl PackageInfo {
    const fn new() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            description: env!("CARGO_PKG_DESCRIPTION"),
            repository: env!("CARGO_PKG_REPOSITORY"),
            license: env!("CARGO_PKG_LICENSE"),
        }
    }
}

#[derive(Serialize)]
struct ConfigInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    config_file: Option<String>,
    log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_dir: Option<String>,
    data_dir: String,
    files: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_input_bytes: Option<usize>,
    shorten: ShortenPolicy,
}

impl ConfigInfo {
    fn from_config(config: &Config, sources: &ConfigSources, cwd: &Utf8Path) -> Self {
        let data_dir = targets::resolve_data_dir(config.data_dir.as_deref(), cwd);
        let files = match config.files {
            Some(ref files) if !files.is_empty() => files.clone(),
            _ => targets::DEFAULT_FILES.iter().map(ToString::to_string).collect(),
        };
        Self {
            config_file: sources.primary_file().map(|p| p.to_string()),
            log_level: config.log_level.as_str().to_string(),
            log_dir: config.log_dir.as_ref().map(|p| p.to_string()),
            data_dir: data_dir.to_string(),
            files,
            max_input_bytes: config.input_limit(),
            shorten: config.shorten_policy(),
        }
    }
}

#[derive(Serialize)]
struct FullInfo {
    #[serde(flatten)]
    package: PackageInfo,
    config: ConfigInfo,
}

/// Print package information and the effective configuration.
#[instrument(name = "cmd_info", skip_all, fields(json_output))]
pub fn cmd_info(
    _args: InfoArgs,
    global_json: bool,
    config: &Config,
    sources: &ConfigSources,
    cwd: &Utf8Path,
) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing info command");

    let full_info = FullInfo {
        package: PackageInfo::new(),
        config: ConfigInfo::from_config(config, sources, cwd),
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&full_info)?);
        return Ok(());
    }

    let package = &full_info.package;
    println!(
        "{} {}",
        package.name.if_supports_color(Stdout, |t| t.bold()),
        package.version.if_supports_color(Stdout, |t| t.green())
    );
    if !package.description.is_empty() {
        println!("{}", package.description);
    }
    print_field("License", package.license);
    print_field("Repository", package.repository);

    let info = &full_info.config;
    println!();
    println!("{}", "Configuration".if_supports_color(Stdout, |t| t.bold()));
    print_field(
        "Config file",
        info.config_file.as_deref().unwrap_or("none loaded"),
    );
    print_field("Log level", &info.log_level);
    if let Some(ref dir) = info.log_dir {
        print_field("Log directory", dir);
    }
    print_field("Data directory", &info.data_dir);
    print_field("Files", &info.files.join(", "));

    println!();
    println!("{}", "Shortening".if_supports_color(Stdout, |t| t.bold()));
    print_field("Threshold", &info.shorten.max_chars.to_string());
    print_field("Soft limit", &info.shorten.soft_limit.to_string());
    print_field("Max lines", &info.shorten.max_lines.to_string());
    print_field("Min comment length", &info.shorten.min_comment_len.to_string());

    Ok(())
}

fn print_field(label: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    println!("{}: {}", label.if_supports_color(Stdout, |t| t.dimmed()), value);
}

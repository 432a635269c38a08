//! Layered configuration.
//!
//! Settings come from, lowest to highest precedence:
//!
//! - built-in defaults;
//! - the user file, `config.<ext>` in the platform config directory
//!   (`~/.config/cardtrim/` on Linux);
//! - the project files, `.cardtrim.<ext>` then `cardtrim.<ext>`, from the
//!   nearest directory at or above the search root that has any (the walk
//!   stops at a repository root marked by `.git`);
//! - files passed with `--config`, which must exist;
//! - `CARDTRIM_*` environment variables.
//!
//! `<ext>` is `toml`, `yaml`, `yml`, or `json`; several files in one
//! directory are all merged, later extensions winning. In environment
//! variables a double underscore reaches into a table, so
//! `CARDTRIM_SHORTEN__MAX_CHARS=120` sets `shorten.max_chars`.
//!
//! ```no_run
//! use camino::Utf8Path;
//! use cardtrim_core::config::ConfigLoader;
//!
//! let (config, sources) = ConfigLoader::new()
//!     .with_project_search(Utf8Path::new("."))
//!     .load()?;
//! println!("{:?} {}", sources.primary_file(), config.shorten_policy().max_chars);
//! # Ok::<(), cardtrim_core::ConfigError>(())
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::shorten::ShortenPolicy;

/// Default limit on deck file size (16 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: usize = 16 * 1024 * 1024;

/// Overrides for the shortening limits. Unset fields keep their defaults.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ShortenConfig {
    /// Shortening threshold and hard truncation length, in characters.
    pub max_chars: Option<usize>,
    /// Joined length at which line collection stops.
    pub soft_limit: Option<usize>,
    /// Maximum number of meaningful lines kept.
    pub max_lines: Option<usize>,
    /// Comment lines must be longer than this to be kept.
    pub min_comment_len: Option<usize>,
}

/// The configuration for cardtrim.
///
/// Deserialized from config files found during discovery (TOML, YAML, or JSON).
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Log level for the application (e.g., "debug", "info", "warn", "error").
    pub log_level: LogLevel,
    /// Directory for JSONL log files. No log file is written when unset.
    pub log_dir: Option<Utf8PathBuf>,
    /// Directory holding the deck files. Relative paths resolve against the
    /// working directory.
    pub data_dir: Option<Utf8PathBuf>,
    /// Deck file names to process, in order. Replaces the built-in list.
    pub files: Option<Vec<String>>,
    /// Maximum deck file size in bytes (default: 16 MiB).
    pub max_input_bytes: Option<usize>,
    /// Disable the input size limit entirely.
    ///
    /// When `true`, `max_input_bytes` is ignored and no size check is performed.
    pub disable_input_limit: bool,
    /// Shortening limits.
    pub shorten: ShortenConfig,
}

impl Config {
    /// The shortening policy after applying overrides to the defaults.
    pub fn shorten_policy(&self) -> ShortenPolicy {
        let defaults = ShortenPolicy::default();
        ShortenPolicy {
            max_chars: self.shorten.max_chars.unwrap_or(defaults.max_chars),
            soft_limit: self.shorten.soft_limit.unwrap_or(defaults.soft_limit),
            max_lines: self.shorten.max_lines.unwrap_or(defaults.max_lines),
            min_comment_len: self
                .shorten
                .min_comment_len
                .unwrap_or(defaults.min_comment_len),
        }
    }

    /// The effective input size limit, or `None` when disabled.
    pub fn input_limit(&self) -> Option<usize> {
        if self.disable_input_limit {
            None
        } else {
            Some(self.max_input_bytes.unwrap_or(DEFAULT_MAX_INPUT_BYTES))
        }
    }
}

/// Log level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Verbose output for debugging and development.
    Debug,
    /// Standard operational information (default).
    #[default]
    Info,
    /// Warnings about potential issues.
    Warn,
    /// Errors that indicate failures.
    Error,
}

impl LogLevel {
    /// Returns the log level as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Metadata about which configuration sources were loaded.
///
/// Returned alongside [`Config`] from [`ConfigLoader::load()`] so commands
/// can report the actual config files without re-discovering them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigSources {
    /// Project config files found by walking up, ordered low→high precedence.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub project_files: Vec<Utf8PathBuf>,
    /// User config file from XDG config directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_file: Option<Utf8PathBuf>,
    /// Explicit config files loaded (e.g., from `--config` flag).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigSources {
    /// Returns the highest-precedence config file that was loaded.
    ///
    /// Precedence: explicit files > project files > user file.
    pub fn primary_file(&self) -> Option<&Utf8Path> {
        self.explicit_files
            .last()
            .map(Utf8PathBuf::as_path)
            .or_else(|| self.project_files.last().map(Utf8PathBuf::as_path))
            .or(self.user_file.as_deref())
    }
}

/// Config file extensions, lowest precedence first.
const CONFIG_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

/// Name used for the config directory and project config files.
const APP_NAME: &str = "cardtrim";

const ENV_PREFIX: &str = "CARDTRIM_";

/// Separator for nested keys in environment variables.
const ENV_NESTING: &str = "__";

/// A directory holding this marker ends the project config walk.
const REPOSITORY_MARKER: &str = ".git";

/// Collects configuration sources and merges them into a [`Config`].
#[derive(Debug)]
pub struct ConfigLoader {
    search_from: Option<Utf8PathBuf>,
    user_config: bool,
    stop_at_repository: bool,
    explicit_files: Vec<Utf8PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// A loader that reads the user config and stops project search at `.git`.
    pub fn new() -> Self {
        Self {
            search_from: None,
            user_config: true,
            stop_at_repository: true,
            explicit_files: Vec::new(),
        }
    }

    /// Look for project config files in `dir` and its ancestors.
    pub fn with_project_search<P: AsRef<Utf8Path>>(mut self, dir: P) -> Self {
        self.search_from = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Whether to read the user config file.
    pub const fn with_user_config(mut self, include: bool) -> Self {
        self.user_config = include;
        self
    }

    /// Keep walking past repository roots, up to the filesystem root.
    pub const fn unbounded_search(mut self) -> Self {
        self.stop_at_repository = false;
        self
    }

    /// Merge `path` after every discovered file. Later calls win.
    pub fn with_file<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.explicit_files.push(path.as_ref().to_path_buf());
        self
    }

    /// Merge every source and extract the configuration.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NotFound`] when a file given to [`Self::with_file`] is
    /// missing, [`ConfigError::Deserialize`] when any source holds a value of
    /// the wrong type.
    #[tracing::instrument(skip(self), fields(search_from = ?self.search_from))]
    pub fn load(self) -> ConfigResult<(Config, ConfigSources)> {
        if let Some(missing) = self.explicit_files.iter().find(|path| !path.is_file()) {
            return Err(ConfigError::NotFound(missing.clone()));
        }

        let mut sources = ConfigSources::default();
        if self.user_config {
            sources.user_file = find_user_config();
        }
        if let Some(root) = &self.search_from {
            sources.project_files = self.find_project_configs(root);
        }
        sources.explicit_files = self.explicit_files;

        let files = sources
            .user_file
            .iter()
            .chain(&sources.project_files)
            .chain(&sources.explicit_files);
        let figment = files
            .fold(
                Figment::from(Serialized::defaults(Config::default())),
                merge_file,
            )
            .merge(Env::prefixed(ENV_PREFIX).split(ENV_NESTING).lowercase(true));

        let config: Config = figment.extract().map_err(Box::new)?;
        tracing::info!(
            log_level = config.log_level.as_str(),
            data_dir = ?config.data_dir,
            config_file = ?sources.primary_file(),
            "configuration loaded"
        );
        Ok((config, sources))
    }

    /// Config files in the nearest directory at or above `start` that has
    /// any, dotfiles first.
    fn find_project_configs(&self, start: &Utf8Path) -> Vec<Utf8PathBuf> {
        for dir in start.ancestors() {
            let found: Vec<Utf8PathBuf> = [".", ""]
                .into_iter()
                .flat_map(|dot| {
                    CONFIG_EXTENSIONS
                        .iter()
                        .map(move |ext| dir.join(format!("{dot}{APP_NAME}.{ext}")))
                })
                .filter(|path| path.is_file())
                .collect();
            if !found.is_empty() {
                return found;
            }

            // A config beside the marker still counts; only the walk past it stops.
            if self.stop_at_repository && dir != start && dir.join(REPOSITORY_MARKER).exists() {
                break;
            }
        }
        Vec::new()
    }
}

fn find_user_config() -> Option<Utf8PathBuf> {
    let dir = user_config_dir()?;
    CONFIG_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("config.{ext}")))
        .find(|path| path.is_file())
}

/// Merge one file, picking the format from its extension (TOML otherwise).
fn merge_file(figment: Figment, path: &Utf8PathBuf) -> Figment {
    match path.extension() {
        Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path.as_str())),
        Some("json") => figment.merge(Json::file_exact(path.as_str())),
        _ => figment.merge(Toml::file_exact(path.as_str())),
    }
}

/// The platform config directory for cardtrim, if the home directory is known.
pub fn user_config_dir() -> Option<Utf8PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("", "", APP_NAME)?;
    Utf8PathBuf::from_path_buf(proj_dirs.config_dir().to_path_buf()).ok()
}

//! Which deck files a run touches, and where they live.

use camino::{Utf8Path, Utf8PathBuf};

/// Deck files processed when no list is configured, in processing order.
pub const DEFAULT_FILES: &[&str] = &[
    "go-concepts.json",
    "rust-concepts.json",
    "docker-concepts.json",
    "kubernetes-concepts.json",
    "postgresql-concepts.json",
    "mongodb-concepts.json",
    "redis-concepts.json",
    "aws-developer-associate.json",
];

/// Location of the deck files below the project root.
pub const DATA_SUBDIR: &str = "data/flashcard/programming";

/// A deck file to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// File name as listed.
    pub name: String,
    /// Name resolved against the data directory.
    pub path: Utf8PathBuf,
}

impl Target {
    /// Whether anything exists at the path.
    ///
    /// A directory counts: it is handed to the updater and fails there as
    /// an unreadable deck instead of being skipped as missing.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

/// The project root: two directories above this crate's manifest.
pub fn project_root() -> Utf8PathBuf {
    let manifest_dir = Utf8Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .ancestors()
        .nth(2)
        .unwrap_or(manifest_dir)
        .to_path_buf()
}

/// The built-in data directory, `<project root>/data/flashcard/programming`.
///
/// The project root is fixed when the crate is compiled, so a binary
/// installed with `cargo install` still points into the build checkout.
/// Installed copies should set `--data-dir`, `data_dir` in a config file, or
/// `CARDTRIM_DATA_DIR`.
pub fn default_data_dir() -> Utf8PathBuf {
    project_root().join(DATA_SUBDIR)
}

/// Pick the data directory: an explicit choice (relative to `cwd`) or the default.
pub fn resolve_data_dir(explicit: Option<&Utf8Path>, cwd: &Utf8Path) -> Utf8PathBuf {
    match explicit {
        Some(dir) if dir.is_absolute() => dir.to_path_buf(),
        Some(dir) => cwd.join(dir),
        None => default_data_dir(),
    }
}

/// Resolve file names against `data_dir`, keeping their order.
///
/// An empty `names` list means the [`DEFAULT_FILES`].
pub fn resolve_targets<S: AsRef<str>>(data_dir: &Utf8Path, names: &[S]) -> Vec<Target> {
    if names.is_empty() {
        return resolve_targets(data_dir, DEFAULT_FILES);
    }
    names
        .iter()
        .map(|name| Target {
            name: name.as_ref().to_string(),
            path: data_dir.join(name.as_ref()),
        })
        .collect()
}

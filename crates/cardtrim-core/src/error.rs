//! Error types for cardtrim-core.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// A config file named explicitly (e.g. with `--config`) does not exist.
    #[error("configuration file not found: {0}")]
    NotFound(Utf8PathBuf),
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading, shortening, or saving a deck file.
#[derive(Error, Debug)]
pub enum UpdateError {
    /// The deck file could not be read.
    #[error("failed to read {path}")]
    Read {
        /// Path of the deck file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The deck file is larger than the configured input limit.
    #[error("input too large: {path} is {size} bytes (limit: {limit} bytes)")]
    TooLarge {
        /// Path of the deck file.
        path: Utf8PathBuf,
        /// Actual file size in bytes.
        size: u64,
        /// Configured limit in bytes.
        limit: usize,
    },

    /// The deck file is not valid JSON.
    #[error("failed to parse {path} as JSON")]
    Parse {
        /// Path of the deck file.
        path: Utf8PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The JSON parsed but does not have the shape of a deck.
    #[error("malformed deck {path}: {reason}")]
    Structure {
        /// Path of the deck file.
        path: Utf8PathBuf,
        /// What was wrong with the document.
        reason: DeckShapeError,
    },

    /// The modified deck could not be serialized.
    #[error("failed to serialize {path}")]
    Serialize {
        /// Path of the deck file.
        path: Utf8PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The modified deck could not be written back.
    #[error("failed to write {path}")]
    Write {
        /// Path of the deck file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias using [`UpdateError`].
pub type UpdateResult<T> = Result<T, UpdateError>;

/// Ways a parsed JSON value can fail to look like a flashcard deck.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeckShapeError {
    /// The top-level value is not an object.
    #[error("top-level value is not an object")]
    NotAnObject,

    /// The `cards` field is present but not an array.
    #[error("`cards` is not an array")]
    CardsNotArray,

    /// A card entry is not an object.
    #[error("card {index} is not an object")]
    CardNotObject {
        /// Position of the card in the `cards` array.
        index: usize,
    },

    /// A card's `pronunciation` is neither a string nor null.
    #[error("card {index} has a non-string pronunciation")]
    PronunciationNotString {
        /// Position of the card in the `cards` array.
        index: usize,
    },
}

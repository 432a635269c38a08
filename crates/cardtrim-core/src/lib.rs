//! Core library for cardtrim.
//!
//! Shortens overly long `pronunciation` fields in flashcard deck files.
//!
//! # Modules
//!
//! - [`shorten`] - The line/character shortening heuristic
//! - [`deck`] - Deck documents with pass-through of untouched fields
//! - [`update`] - Load, shorten, and save a deck file
//! - [`targets`] - The default deck list and data directory
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```no_run
//! use camino::Utf8Path;
//! use cardtrim_core::{UpdateOptions, update_file};
//!
//! let report = update_file(Utf8Path::new("go-concepts.json"), &UpdateOptions::default())
//!     .expect("deck should be readable JSON");
//! println!("modified {} cards", report.modified);
//! ```
#![deny(unsafe_code)]

pub mod config;
pub mod deck;
pub mod error;
pub mod shorten;
pub mod targets;
pub mod update;

pub use config::{Config, ConfigLoader, ConfigSources, LogLevel};
pub use deck::Deck;
pub use error::{ConfigError, ConfigResult, DeckShapeError, UpdateError, UpdateResult};
pub use shorten::{ShortenPolicy, shorten};
pub use update::{FileReport, UpdateOptions, shorten_deck, update_file};

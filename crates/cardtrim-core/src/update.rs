//! Load, shorten, and save deck files.
//!
//! A file is read, parsed into a [`Deck`], shortened in memory, and written
//! back only if at least one card changed. There is no backup and no atomic
//! rename; a crash mid-write can leave a partial file.

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::deck::{Deck, Node};
use crate::error::{UpdateError, UpdateResult};
use crate::shorten::{ShortenPolicy, shorten};

/// How [`update_file`] should behave.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateOptions {
    /// Shortening limits.
    pub policy: ShortenPolicy,
    /// Reject files larger than this many bytes.
    pub max_input_bytes: Option<usize>,
    /// Count changes without writing anything.
    pub dry_run: bool,
}

/// Outcome of updating one deck file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    /// The file that was processed.
    pub path: Utf8PathBuf,
    /// Number of cards in the deck.
    pub cards: usize,
    /// Number of cards whose pronunciation was shortened.
    pub modified: usize,
    /// Whether the file was rewritten on disk.
    pub written: bool,
}

/// Shorten every over-threshold pronunciation in `deck`.
///
/// Pronunciations at or under `policy.max_chars` characters are never passed
/// to the shortener. Returns the number of cards changed.
pub fn shorten_deck(deck: &mut Deck, policy: &ShortenPolicy) -> usize {
    deck.rewrite_pronunciations(|current| {
        if current.is_empty() || !policy.exceeds_threshold(current) {
            return None;
        }
        let shortened = shorten(current, policy);
        (shortened != current).then_some(shortened)
    })
}

/// Read a deck file, shorten its pronunciations, and rewrite it if anything changed.
///
/// Read, parse, and shape failures are returned as errors; nothing is
/// skipped silently.
#[instrument(skip(options), fields(dry_run = options.dry_run))]
pub fn update_file(path: &Utf8Path, options: &UpdateOptions) -> UpdateResult<FileReport> {
    let content = read_deck_file(path, options.max_input_bytes)?;

    let node: Node = serde_json::from_str(&content).map_err(|source| UpdateError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let mut deck = Deck::from_node(node).map_err(|reason| UpdateError::Structure {
        path: path.to_path_buf(),
        reason,
    })?;

    let cards = deck.card_count();
    let modified = shorten_deck(&mut deck, &options.policy);
    debug!(cards, modified, "deck scanned");

    let written = modified > 0 && !options.dry_run;
    if written {
        let text = deck.to_pretty_json().map_err(|source| UpdateError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path.as_std_path(), text).map_err(|source| UpdateError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!(modified, "deck rewritten");
    }

    Ok(FileReport {
        path: path.to_path_buf(),
        cards,
        modified,
        written,
    })
}

fn read_deck_file(path: &Utf8Path, max_bytes: Option<usize>) -> UpdateResult<String> {
    let read_error = |source| UpdateError::Read {
        path: path.to_path_buf(),
        source,
    };

    // Check the size before pulling the whole file into memory.
    let metadata = std::fs::metadata(path.as_std_path()).map_err(read_error)?;
    if let Some(limit) = max_bytes
        && metadata.len() > limit as u64
    {
        return Err(UpdateError::TooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            limit,
        });
    }

    std::fs::read_to_string(path.as_std_path()).map_err(read_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeckShapeError;
    use serde_json::{Value, json};
    use std::fs;
    use tempfile::TempDir;

    fn write_deck(dir: &TempDir, name: &str, value: &Value) -> Utf8PathBuf {
        let path = Utf8PathBuf::try_from(dir.path().join(name)).unwrap();
        fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
        path
    }

    fn long_note() -> String {
        format!(
            "/ɡoʊ/\n// {}\n{}\n{}",
            "explanation ".repeat(10),
            "more detail ".repeat(10),
            "and more ".repeat(10)
        )
    }

    #[test]
    fn shortens_long_pronunciations_and_rewrites() {
        let tmp = TempDir::new().unwrap();
        let note = long_note();
        let path = write_deck(
            &tmp,
            "go.json",
            &json!({
                "deck": "Go",
                "cards": [
                    {"vocab": "goroutine", "pronunciation": note, "meaning": "green thread"},
                    {"vocab": "chan", "pronunciation": "/tʃæn/"}
                ]
            }),
        );

        let report = update_file(&path, &UpdateOptions::default()).unwrap();

        assert_eq!(report.cards, 2);
        assert_eq!(report.modified, 1);
        assert!(report.written);

        let saved: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let expected = shorten(&note, &ShortenPolicy::default());
        assert_eq!(saved["cards"][0]["pronunciation"], expected.as_str());
        assert_eq!(saved["cards"][0]["meaning"], "green thread");
        assert_eq!(saved["cards"][1]["pronunciation"], "/tʃæn/");
        assert_eq!(saved["deck"], "Go");
    }

    #[test]
    fn pronunciation_at_threshold_is_left_alone() {
        let tmp = TempDir::new().unwrap();
        // Exactly 200 characters but four lines: the shortener would cut it.
        let note = format!("{}\n{}\n{}\n{}", "a".repeat(50), "b".repeat(50), "c".repeat(50), "d".repeat(47));
        assert_eq!(note.chars().count(), 200);
        let path = write_deck(&tmp, "edge.json", &json!({"cards": [{"pronunciation": note}]}));

        let report = update_file(&path, &UpdateOptions::default()).unwrap();

        assert_eq!(report.modified, 0);
        assert!(!report.written);
    }

    #[test]
    fn no_op_pass_leaves_file_byte_identical() {
        let tmp = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().join("compact.json")).unwrap();
        let original = r#"{"cards":[{"pronunciation":"","vocab":"x"},{"pronunciation":"short"}],"v":1.50}"#;
        fs::write(&path, original).unwrap();

        let report = update_file(&path, &UpdateOptions::default()).unwrap();

        assert_eq!(report.modified, 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn rewrite_keeps_wide_integers_and_float_text() {
        let tmp = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().join("ids.json")).unwrap();
        let original = format!(
            r#"{{"id": 123456789012345678901234567890, "scale": 2.50, "cards": [{{"pronunciation": "{}", "n": 18446744073709551616}}]}}"#,
            "x".repeat(250)
        );
        fs::write(&path, original).unwrap();

        let report = update_file(&path, &UpdateOptions::default()).unwrap();
        assert!(report.written);

        let saved = fs::read_to_string(&path).unwrap();
        assert!(saved.contains("\"id\": 123456789012345678901234567890,"));
        assert!(saved.contains("\"n\": 18446744073709551616"));
        assert!(saved.contains("\"scale\": 2.50,"));
        assert!(saved.contains(&format!("{}...", "x".repeat(200))));
    }

    #[test]
    fn empty_card_list_is_not_written() {
        let tmp = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().join("empty.json")).unwrap();
        fs::write(&path, r#"{"cards": []}"#).unwrap();

        let report = update_file(&path, &UpdateOptions::default()).unwrap();

        assert_eq!(report.cards, 0);
        assert_eq!(report.modified, 0);
        assert!(!report.written);
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"cards": []}"#);
    }

    #[test]
    fn dry_run_counts_without_writing() {
        let tmp = TempDir::new().unwrap();
        let path = write_deck(&tmp, "dry.json", &json!({"cards": [{"pronunciation": long_note()}]}));
        let before = fs::read_to_string(&path).unwrap();

        let options = UpdateOptions {
            dry_run: true,
            ..UpdateOptions::default()
        };
        let report = update_file(&path, &options).unwrap();

        assert_eq!(report.modified, 1);
        assert!(!report.written);
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn rewritten_file_is_two_space_indented_with_literal_unicode() {
        let tmp = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().join("ja.json")).unwrap();
        let note = "ア".repeat(250);
        fs::write(
            &path,
            format!(r#"{{"cards":[{{"vocab":"猫","pronunciation":"{note}"}}]}}"#),
        )
        .unwrap();

        update_file(&path, &UpdateOptions::default()).unwrap();

        let saved = fs::read_to_string(&path).unwrap();
        assert!(saved.starts_with("{\n  \"cards\": [\n    {\n      \"vocab\": \"猫\""));
        assert!(saved.contains(&format!("{}...", "ア".repeat(200))));
        assert!(!saved.contains("\\u"));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().join("bad.json")).unwrap();
        fs::write(&path, "{\"cards\": [").unwrap();

        let err = update_file(&path, &UpdateOptions::default()).unwrap_err();
        assert!(matches!(err, UpdateError::Parse { .. }));
    }

    #[test]
    fn wrong_shape_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = write_deck(&tmp, "list.json", &json!(["not", "a", "deck"]));

        let err = update_file(&path, &UpdateOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            UpdateError::Structure {
                reason: DeckShapeError::NotAnObject,
                ..
            }
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let tmp = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().join("absent.json")).unwrap();

        let err = update_file(&path, &UpdateOptions::default()).unwrap_err();
        assert!(matches!(err, UpdateError::Read { .. }));
    }

    #[test]
    fn oversized_file_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = write_deck(&tmp, "big.json", &json!({"cards": [{"pronunciation": long_note()}]}));

        let options = UpdateOptions {
            max_input_bytes: Some(16),
            ..UpdateOptions::default()
        };
        let err = update_file(&path, &options).unwrap_err();
        assert!(matches!(err, UpdateError::TooLarge { limit: 16, .. }));
    }

    #[test]
    fn shorten_deck_skips_empty_and_short_values() {
        let text = json!({
            "cards": [
                {"pronunciation": ""},
                {"pronunciation": "brief"},
                {"vocab": "no pronunciation"},
                {"pronunciation": "z".repeat(300)}
            ]
        })
        .to_string();
        let mut deck = Deck::from_node(serde_json::from_str(&text).unwrap()).unwrap();

        let modified = shorten_deck(&mut deck, &ShortenPolicy::default());

        assert_eq!(modified, 1);
        let pronunciations = deck.pronunciations();
        assert_eq!(pronunciations[0], "");
        assert_eq!(pronunciations[1], "brief");
        assert_eq!(pronunciations[2], "");
        assert_eq!(pronunciations[3].chars().count(), 203);
    }
}

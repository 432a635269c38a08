//! Pronunciation shortening.
//!
//! Long pronunciation notes tend to be a short phonetic reading followed by
//! paragraphs of commentary. The shortener keeps the first few meaningful
//! lines and hard-truncates whatever is still too long.
//!
//! All lengths are counted in characters, not bytes.

use serde::{Deserialize, Serialize};

/// Marker appended when a result is hard-truncated.
pub const ELLIPSIS: &str = "...";

/// Default shortening threshold and hard truncation length.
pub const DEFAULT_MAX_CHARS: usize = 200;

/// Default joined length at which line accumulation stops.
pub const DEFAULT_SOFT_LIMIT: usize = 150;

/// Default number of meaningful lines kept.
pub const DEFAULT_MAX_LINES: usize = 3;

/// Default length a comment line must exceed to be kept.
pub const DEFAULT_MIN_COMMENT_LEN: usize = 5;

/// Limits that drive [`shorten`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ShortenPolicy {
    /// Pronunciations longer than this are shortened, and results longer
    /// than this are cut to this many characters plus [`ELLIPSIS`].
    pub max_chars: usize,
    /// Stop collecting lines once the joined text is longer than this.
    pub soft_limit: usize,
    /// Maximum number of meaningful lines kept.
    pub max_lines: usize,
    /// `//` and `#` comment lines are kept only when longer than this.
    pub min_comment_len: usize,
}

impl Default for ShortenPolicy {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
            soft_limit: DEFAULT_SOFT_LIMIT,
            max_lines: DEFAULT_MAX_LINES,
            min_comment_len: DEFAULT_MIN_COMMENT_LEN,
        }
    }
}

impl ShortenPolicy {
    /// Whether `text` is long enough that the updater should shorten it.
    pub fn exceeds_threshold(&self, text: &str) -> bool {
        char_len(text) > self.max_chars
    }
}

/// Shorten a pronunciation string to its first meaningful lines.
///
/// The whole string is trimmed and split on `\n`. Blank lines are skipped,
/// comment lines (`//` or `#`) survive only when longer than
/// `min_comment_len`, and every other line is kept as written. Collection
/// stops once `max_lines` lines are held or their joined text exceeds
/// `soft_limit`. A joined result longer than `max_chars` is cut and gets
/// [`ELLIPSIS`] appended.
///
/// Empty input comes back empty; input with no meaningful lines yields an
/// empty string.
#[tracing::instrument(level = "trace", skip_all, fields(text_len = text.len()))]
pub fn shorten(text: &str, policy: &ShortenPolicy) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut kept: Vec<&str> = Vec::new();
    let mut joined_chars = 0;

    for line in text.trim().split('\n') {
        let stripped = line.trim();
        let keep = if stripped.is_empty() {
            false
        } else if is_comment(stripped) {
            char_len(stripped) > policy.min_comment_len
        } else {
            true
        };

        if keep {
            if !kept.is_empty() {
                joined_chars += 1;
            }
            joined_chars += char_len(line);
            kept.push(line);
        }

        if kept.len() >= policy.max_lines || joined_chars > policy.soft_limit {
            break;
        }
    }

    kept.truncate(policy.max_lines);
    let mut result = kept.join("\n");

    if let Some((cut, _)) = result.char_indices().nth(policy.max_chars) {
        result.truncate(cut);
        result.push_str(ELLIPSIS);
    }

    result
}

fn is_comment(stripped: &str) -> bool {
    stripped.starts_with("//") || stripped.starts_with('#')
}

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

//! Note domain model.
//!
//! # Responsibility
//! - Define the single persisted record (`Note`) and its insert shape.
//! - Own tag splitting/joining rules shared by storage and rendering.
//!
//! # Invariants
//! - `text` is never empty for a persisted note.
//! - An empty tag argument is stored as no tags (NULL).
//! - Stored tags are comma-joined without surrounding whitespace per token.
//! - Empty tag tokens are preserved as-is (`"a,,b"` stays `"a,,b"`).

use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Separator used for stored tag strings.
pub const TAG_SEPARATOR: char = ',';

/// Separator used when tags are shown to a user.
pub const TAG_DISPLAY_SEPARATOR: &str = ", ";

/// Integer note identifier assigned by SQLite `AUTOINCREMENT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NoteId(pub i64);

impl NoteId {
    /// Returns the raw row id.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Persisted note row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: NoteId,
    pub text: String,
    /// Comma-joined tag string, `None` when the note was added without tags.
    pub tags: Option<String>,
}

impl Note {
    /// Returns stored tags split into tokens, empty tokens included.
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .as_deref()
            .map(|value| value.split(TAG_SEPARATOR).collect())
            .unwrap_or_default()
    }

    /// Returns tags formatted for display (`a, b, c`), or an empty string.
    pub fn display_tags(&self) -> String {
        self.tag_list().join(TAG_DISPLAY_SEPARATOR)
    }

    /// Case-insensitive substring match against text or the stored tag string.
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        if self.text.to_lowercase().contains(&needle) {
            return true;
        }
        self.tags
            .as_deref()
            .is_some_and(|tags| tags.to_lowercase().contains(&needle))
    }
}

/// Insert shape for a note that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub text: String,
    pub tags: Option<String>,
}

impl NewNote {
    /// Builds an insert shape from raw user input.
    ///
    /// `raw_tags` goes through [`normalize_tags`]; `None` and `Some("")` become `None`.
    pub fn new(text: impl Into<String>, raw_tags: Option<&str>) -> Self {
        Self {
            text: text.into(),
            tags: raw_tags.filter(|raw| !raw.is_empty()).map(normalize_tags),
        }
    }

    /// Validates the insert shape before any SQL runs.
    ///
    /// # Errors
    /// - [`NoteValidationError::EmptyText`] when `text` is empty.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.text.is_empty() {
            return Err(NoteValidationError::EmptyText);
        }
        Ok(())
    }
}

/// Validation failures for note input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    EmptyText,
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "note text must not be empty"),
        }
    }
}

impl Error for NoteValidationError {}

/// Splits raw CSV tag input, trims every token and re-joins with `,`.
///
/// Empty tokens are kept: `" a, ,b "` becomes `"a,,b"`.
pub fn normalize_tags(raw: &str) -> String {
    raw.split(TAG_SEPARATOR)
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(",")
}

/// Collects every tag token across `notes`, deduplicated and sorted.
pub fn distinct_tags(notes: &[Note]) -> Vec<String> {
    let mut unique = BTreeSet::new();
    for note in notes {
        for tag in note.tag_list() {
            unique.insert(tag.to_string());
        }
    }
    unique.into_iter().collect()
}

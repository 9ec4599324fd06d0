//! Note use-case service.
//!
//! # Responsibility
//! - Provide add/view/search/delete APIs backing each CLI command.
//! - Gate the full wipe behind an exact confirmation token.
//!
//! # Invariants
//! - `view_notes` returns notes in id order and tags sorted alphabetically.
//! - Search filters client-side over the full note list.
//! - A wipe runs only when the confirmation equals [`WIPE_CONFIRMATION_TOKEN`].

use crate::model::note::{distinct_tags, NewNote, Note, NoteId};
use crate::repo::note_repo::{NoteRepository, RepoError, RepoResult};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Exact text a user must type to confirm deleting every note.
pub const WIPE_CONFIRMATION_TOKEN: &str = "CONFIRM";

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent note state: {details}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::InconsistentState(_) => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Everything the `view` command prints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesView {
    /// Notes sorted by id ascending.
    pub notes: Vec<Note>,
    /// Distinct tags across all notes, sorted.
    pub tags: Vec<String>,
}

/// Result of a wipe request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WipeOutcome {
    Wiped { removed: usize },
    Cancelled,
}

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Adds one note; `raw_tags` is CSV input as typed by the user.
    pub fn add_note(
        &self,
        text: impl Into<String>,
        raw_tags: Option<&str>,
    ) -> Result<Note, NoteServiceError> {
        let new_note = NewNote::new(text, raw_tags);
        let id = self.repo.insert_note(&new_note)?;
        self.repo
            .get_note(id)?
            .ok_or(NoteServiceError::InconsistentState(
                "inserted note not found in read-back",
            ))
    }

    /// Lists every note together with the sorted distinct tag set.
    pub fn view_notes(&self) -> RepoResult<NotesView> {
        let notes = self.repo.list_notes()?;
        let tags = distinct_tags(&notes);
        Ok(NotesView { notes, tags })
    }

    /// Returns notes whose text or tags contain `query`, ignoring case.
    pub fn search_notes(&self, query: &str) -> RepoResult<Vec<Note>> {
        let notes = self.repo.list_notes()?;
        let total = notes.len();
        let matches = notes
            .into_iter()
            .filter(|note| note.matches_query(query))
            .collect::<Vec<_>>();
        info!(
            "event=note_search module=service status=ok scanned={} matched={}",
            total,
            matches.len()
        );
        Ok(matches)
    }

    /// Deletes one note by id. A missing id removes nothing.
    pub fn delete_by_id(&self, id: NoteId) -> RepoResult<usize> {
        self.repo.delete_by_id(id)
    }

    /// Deletes notes whose stored tag string contains `tag`.
    ///
    /// This is a substring match: `"a"` also removes a note tagged `cat`.
    pub fn delete_by_tag(&self, tag: &str) -> RepoResult<usize> {
        self.repo.delete_by_tag(tag)
    }

    /// Deletes every note and resets ids, if `confirmation` is the exact token.
    pub fn wipe_notes(&mut self, confirmation: &str) -> RepoResult<WipeOutcome> {
        if confirmation != WIPE_CONFIRMATION_TOKEN {
            info!("event=notes_wipe module=service status=cancelled");
            return Ok(WipeOutcome::Cancelled);
        }
        let removed = self.repo.wipe_notes()?;
        Ok(WipeOutcome::Wiped { removed })
    }
}

//! Core domain logic for dotnote.
//! This crate owns storage, note rules and the root privilege guard.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod privilege;
pub mod repo;
pub mod service;

pub use config::{LogConfig, StoreConfig, DEFAULT_DB_PATH, DEFAULT_LOG_DIR};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{distinct_tags, normalize_tags, NewNote, Note, NoteId, NoteValidationError};
pub use privilege::{current_privilege, require_elevated, PermissionDenied, Privilege};
pub use repo::note_repo::{NoteRepository, RepoError, RepoResult, SqliteNoteRepository};
pub use service::note_service::{
    NoteService, NoteServiceError, NotesView, WipeOutcome, WIPE_CONFIRMATION_TOKEN,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/list/delete APIs over the `notes` table.
//! - Own the wipe sequence (rows + `sqlite_sequence`) with atomic semantics.
//!
//! # Invariants
//! - Listing is ordered by `id ASC`.
//! - `wipe_notes` deletes rows and resets the id counter in one transaction.
//! - Tag deletion is a LIKE substring match, not exact tag membership.

use crate::db::schema::{table_exists, table_has_column, NOTES_COLUMNS, NOTES_TABLE};
use crate::db::DbError;
use crate::model::note::{NewNote, Note, NoteId, NoteValidationError};
use log::info;
use rusqlite::{params, Connection, Row, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const NOTE_SELECT_SQL: &str = "SELECT id, note, tags FROM notes";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(NoteValidationError),
    Db(DbError),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NoteValidationError> for RepoError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for note operations.
pub trait NoteRepository {
    /// Inserts one note and returns its assigned id.
    fn insert_note(&self, note: &NewNote) -> RepoResult<NoteId>;
    /// Gets one note by id.
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Lists every note ordered by id.
    fn list_notes(&self) -> RepoResult<Vec<Note>>;
    /// Deletes the note with `id`; returns removed row count (0 or 1).
    fn delete_by_id(&self, id: NoteId) -> RepoResult<usize>;
    /// Deletes every note whose stored tag string contains `tag`.
    fn delete_by_tag(&self, tag: &str) -> RepoResult<usize>;
    /// Deletes all notes and resets the id counter.
    fn wipe_notes(&mut self) -> RepoResult<usize>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a connection whose schema was initialized.
    ///
    /// # Errors
    /// - [`RepoError::MissingRequiredTable`] when `init` has not run yet.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_notes_table_ready(conn)?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn insert_note(&self, note: &NewNote) -> RepoResult<NoteId> {
        note.validate()?;

        self.conn.execute(
            "INSERT INTO notes (note, tags) VALUES (?1, ?2);",
            params![note.text.as_str(), note.tags.as_deref()],
        )?;
        let id = NoteId(self.conn.last_insert_rowid());

        info!(
            "event=note_add module=repo status=ok id={} text_len={} has_tags={}",
            id,
            note.text.len(),
            note.tags.is_some()
        );
        Ok(id)
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.get()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(row)?));
        }
        Ok(None)
    }

    fn list_notes(&self) -> RepoResult<Vec<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }

    fn delete_by_id(&self, id: NoteId) -> RepoResult<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?1;", [id.get()])?;
        info!(
            "event=note_delete module=repo status=ok mode=id id={} removed={}",
            id, removed
        );
        Ok(removed)
    }

    fn delete_by_tag(&self, tag: &str) -> RepoResult<usize> {
        let removed = self.conn.execute(
            "DELETE FROM notes WHERE tags LIKE '%' || ?1 || '%';",
            [tag],
        )?;
        info!(
            "event=note_delete module=repo status=ok mode=tag removed={}",
            removed
        );
        Ok(removed)
    }

    fn wipe_notes(&mut self) -> RepoResult<usize> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let removed = tx.execute("DELETE FROM notes;", [])?;
        // sqlite_sequence only exists once an AUTOINCREMENT row was inserted.
        if table_exists(&tx, "sqlite_sequence")? {
            tx.execute("DELETE FROM sqlite_sequence WHERE name = ?1;", [NOTES_TABLE])?;
        }
        tx.commit()?;

        info!(
            "event=notes_wipe module=repo status=ok removed={}",
            removed
        );
        Ok(removed)
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let id: i64 = row.get("id")?;
    let text = row
        .get::<_, Option<String>>("note")?
        .ok_or_else(|| RepoError::InvalidData(format!("note {id} has NULL notes.note")))?;
    Ok(Note {
        id: NoteId(id),
        text,
        tags: row.get("tags")?,
    })
}

fn ensure_notes_table_ready(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, NOTES_TABLE)? {
        return Err(RepoError::MissingRequiredTable(NOTES_TABLE));
    }
    for &column in NOTES_COLUMNS {
        if !table_has_column(conn, NOTES_TABLE, column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: NOTES_TABLE,
                column,
            });
        }
    }
    Ok(())
}

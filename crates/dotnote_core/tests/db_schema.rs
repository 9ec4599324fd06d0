use dotnote_core::db::schema::{init_schema, table_exists, NOTES_TABLE};
use dotnote_core::db::{open_db, open_db_in_memory};
use dotnote_core::{RepoError, SqliteNoteRepository};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_does_not_create_schema() {
    let conn = open_db_in_memory().unwrap();
    assert!(!table_exists(&conn, NOTES_TABLE).unwrap());
}

#[test]
fn init_schema_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    init_schema(&conn).unwrap();
    init_schema(&conn).unwrap();

    assert!(table_exists(&conn, NOTES_TABLE).unwrap());
    assert_eq!(column_names(&conn), vec!["id", "note", "tags"]);
}

#[test]
fn init_schema_keeps_existing_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.db");

    let conn = open_db(&path).unwrap();
    init_schema(&conn).unwrap();
    conn.execute("INSERT INTO notes (note, tags) VALUES ('kept', NULL);", [])
        .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    init_schema(&conn).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn open_db_creates_missing_parent_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("store").join("notes.db");

    let conn = open_db(&path).unwrap();
    init_schema(&conn).unwrap();
    assert!(path.exists());
}

#[test]
fn repository_requires_initialized_schema() {
    let mut conn = open_db_in_memory().unwrap();
    let err = SqliteNoteRepository::try_new(&mut conn)
        .err()
        .expect("repository must reject a store without notes table");
    assert!(matches!(err, RepoError::MissingRequiredTable("notes")));
}

#[test]
fn repository_rejects_table_missing_tags_column() {
    let mut conn = open_db_in_memory().unwrap();
    conn.execute_batch("CREATE TABLE notes (id INTEGER PRIMARY KEY, note TEXT);")
        .unwrap();

    let err = SqliteNoteRepository::try_new(&mut conn)
        .err()
        .expect("repository must reject incomplete table");
    assert!(matches!(
        err,
        RepoError::MissingRequiredColumn {
            table: "notes",
            column: "tags"
        }
    ));
}

fn column_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn.prepare("PRAGMA table_info(notes);").unwrap();
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    names
}

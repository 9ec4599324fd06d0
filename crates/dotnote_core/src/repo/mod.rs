//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for notes.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes enforce `NewNote::validate()` before persistence.
//! - Repositories refuse to operate on a database without the `notes` table.

pub mod note_repo;

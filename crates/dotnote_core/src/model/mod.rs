//! Domain model for persisted notes.
//!
//! # Responsibility
//! - Define the canonical `Note` record and its insert shape.
//!
//! # Invariants
//! - Notes are never updated in place; they are inserted and deleted only.

pub mod note;

//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into command-level APIs.
//! - Keep the CLI decoupled from storage details.

pub mod note_service;

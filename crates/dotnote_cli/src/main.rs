//! dotnote - a root-only note taking CLI backed by a local SQLite file.

use clap::builder::NonEmptyStringValueParser;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use dotnote_core::{current_privilege, DEFAULT_DB_PATH, DEFAULT_LOG_DIR};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod prompt;
mod render;

use crate::commands::CliError;
use crate::prompt::TerminalPrompt;

/// dotnote CLI
#[derive(Parser, Debug)]
#[command(name = "dotnote")]
#[command(version = dotnote_core::core_version())]
#[command(about = "A note making CLI tool (must be run as root)")]
#[command(long_about = r#"A note making CLI tool (must be run as root)

QUICK START:
    # Create the notes store
    dotnote init

    # Add a note with tags and show all notes afterwards
    dotnote add "buy milk" -t "home, errand" --show

    # Find notes by text or tag
    dotnote search milk

    # Delete by id, by tag, or everything
    dotnote delete -i 3
    dotnote delete -t errand
    dotnote delete -a"#)]
struct Cli {
    /// Path of the SQLite notes store
    #[arg(long, global = true, default_value = DEFAULT_DB_PATH)]
    db: PathBuf,

    /// Directory for rolling log files
    #[arg(long, global = true, default_value = DEFAULT_LOG_DIR)]
    log_dir: PathBuf,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the notes table if it does not exist
    Init,

    /// Add a new note
    Add {
        /// Note text
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        text: String,

        /// Comma-separated tags, e.g. "home, errand"
        #[arg(short = 't', long = "tags")]
        tags: Option<String>,

        /// List all notes after adding
        #[arg(short = 's', long = "show")]
        show: bool,
    },

    /// List all notes and the tags in use
    View,

    /// Delete notes by id, by tag, or all of them
    Delete(DeleteArgs),

    /// Find notes whose text or tags contain a query (case-insensitive)
    Search {
        /// Text to look for
        query: String,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Add { .. } => "add",
            Self::View => "view",
            Self::Delete(_) => "delete",
            Self::Search { .. } => "search",
        }
    }
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct DeleteArgs {
    /// Delete every note and reset ids (asks for confirmation)
    #[arg(short = 'a', long = "all")]
    all: bool,

    /// Delete notes whose tags contain this text
    #[arg(short = 't', long = "tag")]
    tag: Option<String>,

    /// Delete the note with this id
    #[arg(short = 'i', long = "id")]
    id: Option<i64>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut prompt = TerminalPrompt;

    let result = commands::run(cli, current_privilege(), &mut prompt);
    if let Err(err) = &result {
        eprintln!("{} {}", "✗".red(), err);
        if let Some(hint) = err.hint() {
            eprintln!("  {} {}", "hint:".yellow(), hint);
        }
    }
    ExitCode::from(exit_status(&result))
}

/// Process exit status for a finished invocation: 0 on success, 1 on any failure.
fn exit_status(result: &Result<(), CliError>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(_) => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::{exit_status, Cli, Commands};
    use crate::commands::CliError;
    use clap::error::ErrorKind;
    use clap::Parser;
    use dotnote_core::{require_elevated, Privilege};
    use std::io;
    use std::path::Path;

    #[test]
    fn exit_status_is_zero_on_success_and_one_on_failure() {
        assert_eq!(exit_status(&Ok(())), 0);

        let denied = require_elevated(Privilege::from_euid(1000)).unwrap_err();
        assert_eq!(exit_status(&Err(CliError::PermissionDenied(denied))), 1);

        let prompt_failure = CliError::Prompt(io::Error::other("stdin closed"));
        assert_eq!(exit_status(&Err(prompt_failure)), 1);
    }

    #[test]
    fn add_parses_text_tags_and_show() {
        let cli =
            Cli::try_parse_from(["dotnote", "add", "buy milk", "-t", "home, errand", "-s"]).unwrap();
        match cli.command {
            Commands::Add { text, tags, show } => {
                assert_eq!(text, "buy milk");
                assert_eq!(tags.as_deref(), Some("home, errand"));
                assert!(show);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.db, Path::new("/root/notes.db"));
    }

    #[test]
    fn add_rejects_empty_text() {
        let err = Cli::try_parse_from(["dotnote", "add", ""]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn delete_requires_exactly_one_mode() {
        let missing = Cli::try_parse_from(["dotnote", "delete"]).unwrap_err();
        assert_eq!(missing.kind(), ErrorKind::MissingRequiredArgument);

        let conflict = Cli::try_parse_from(["dotnote", "delete", "-a", "-i", "3"]).unwrap_err();
        assert_eq!(conflict.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn delete_by_id_parses_integer() {
        let cli = Cli::try_parse_from(["dotnote", "delete", "-i", "7"]).unwrap();
        match cli.command {
            Commands::Delete(args) => {
                assert_eq!(args.id, Some(7));
                assert!(!args.all);
                assert!(args.tag.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_db_flag_is_accepted_after_subcommand() {
        let cli = Cli::try_parse_from(["dotnote", "view", "--db", "/tmp/other.db"]).unwrap();
        assert_eq!(cli.db, Path::new("/tmp/other.db"));
        assert_eq!(cli.command.name(), "view");
    }
}

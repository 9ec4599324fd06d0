//! Command dispatch: privilege guard, store access and output per subcommand.
//!
//! Every invocation opens one connection, runs one command to completion and
//! drops the connection. Nothing is retried.

use crate::prompt::ConfirmPrompt;
use crate::render::{notes_table, tags_line};
use crate::{Cli, Commands, DeleteArgs};
use colored::Colorize;
use dotnote_core::db::schema::init_schema;
use dotnote_core::{
    default_log_level, init_logging, open_db, require_elevated, DbError, LogConfig, NoteId,
    NoteService, NoteServiceError, NotesView, PermissionDenied, Privilege, RepoError,
    SqliteNoteRepository, StoreConfig, WipeOutcome, WIPE_CONFIRMATION_TOKEN,
};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;

/// Failure of one CLI invocation. Every variant maps to exit status 1.
#[derive(Debug)]
pub(crate) enum CliError {
    PermissionDenied(PermissionDenied),
    Db(DbError),
    Service(NoteServiceError),
    Prompt(io::Error),
}

impl CliError {
    /// Follow-up advice shown under the error line, when there is any.
    pub(crate) fn hint(&self) -> Option<&'static str> {
        match self {
            Self::PermissionDenied(_) => Some("re-run with sudo"),
            Self::Service(NoteServiceError::Repo(RepoError::MissingRequiredTable(_))) => {
                Some("run `dotnote init` to create the notes store")
            }
            _ => None,
        }
    }
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PermissionDenied(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "storage error: {err}"),
            Self::Service(err) => write!(f, "{err}"),
            Self::Prompt(err) => write!(f, "failed to read confirmation: {err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::PermissionDenied(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Service(err) => Some(err),
            Self::Prompt(err) => Some(err),
        }
    }
}

impl From<PermissionDenied> for CliError {
    fn from(value: PermissionDenied) -> Self {
        Self::PermissionDenied(value)
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<NoteServiceError> for CliError {
    fn from(value: NoteServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<RepoError> for CliError {
    fn from(value: RepoError) -> Self {
        Self::Service(NoteServiceError::Repo(value))
    }
}

/// How `delete` selects its targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DeleteMode {
    All,
    Tag(String),
    Id(NoteId),
}

impl DeleteArgs {
    /// The clap group guarantees exactly one of `--all`, `--tag`, `--id`.
    fn mode(self) -> DeleteMode {
        match (self.all, self.tag, self.id) {
            (false, Some(tag), _) => DeleteMode::Tag(tag),
            (false, None, Some(id)) => DeleteMode::Id(NoteId(id)),
            _ => DeleteMode::All,
        }
    }
}

/// Runs one parsed invocation.
///
/// The privilege guard runs before logging setup or any storage access.
pub(crate) fn run(
    cli: Cli,
    privilege: Privilege,
    prompt: &mut dyn ConfirmPrompt,
) -> Result<(), CliError> {
    require_elevated(privilege)?;

    let log_config = LogConfig {
        level: cli
            .log_level
            .unwrap_or_else(|| default_log_level().to_string()),
        log_dir: cli.log_dir,
    };
    if let Err(message) = init_logging(&log_config) {
        eprintln!("{} file logging disabled: {}", "warning:".yellow(), message);
    }

    let store = StoreConfig::new(cli.db);
    let command = cli.command.name();
    info!("event=command module=cli status=start command={command}");

    let result = execute(cli.command, &store, prompt);
    match &result {
        Ok(()) => info!("event=command module=cli status=ok command={command}"),
        Err(err) => error!("event=command module=cli status=error command={command} error={err}"),
    }
    result
}

fn execute(
    command: Commands,
    store: &StoreConfig,
    prompt: &mut dyn ConfirmPrompt,
) -> Result<(), CliError> {
    match command {
        Commands::Init => init(store),
        Commands::Add { text, tags, show } => add(store, text, tags.as_deref(), show),
        Commands::View => view(store),
        Commands::Search { query } => search(store, &query),
        Commands::Delete(args) => delete(store, args.mode(), prompt),
    }
}

fn init(store: &StoreConfig) -> Result<(), CliError> {
    let conn = open_db(&store.db_path)?;
    init_schema(&conn)?;
    success(&format!(
        "Notes store ready at {}",
        store.db_path.display()
    ));
    Ok(())
}

fn add(store: &StoreConfig, text: String, tags: Option<&str>, show: bool) -> Result<(), CliError> {
    let mut conn = open_db(&store.db_path)?;
    let service = NoteService::new(SqliteNoteRepository::try_new(&mut conn)?);

    let note = service.add_note(text, tags)?;
    success(&format!("Note {} added successfully", note.id));

    if show {
        print_view(&service.view_notes()?);
    }
    Ok(())
}

fn view(store: &StoreConfig) -> Result<(), CliError> {
    let mut conn = open_db(&store.db_path)?;
    let service = NoteService::new(SqliteNoteRepository::try_new(&mut conn)?);
    print_view(&service.view_notes()?);
    Ok(())
}

fn search(store: &StoreConfig, query: &str) -> Result<(), CliError> {
    let mut conn = open_db(&store.db_path)?;
    let service = NoteService::new(SqliteNoteRepository::try_new(&mut conn)?);
    let matches = service.search_notes(query)?;
    println!("{}", notes_table(&matches));
    Ok(())
}

fn delete(
    store: &StoreConfig,
    mode: DeleteMode,
    prompt: &mut dyn ConfirmPrompt,
) -> Result<(), CliError> {
    let mut conn = open_db(&store.db_path)?;
    let mut service = NoteService::new(SqliteNoteRepository::try_new(&mut conn)?);

    match mode {
        DeleteMode::Id(id) => {
            let removed = service.delete_by_id(id)?;
            success(&format!("Removed {removed} note(s) with id {id}"));
        }
        DeleteMode::Tag(tag) => {
            let removed = service.delete_by_tag(&tag)?;
            success(&format!("Removed {removed} note(s) tagged like '{tag}'"));
        }
        DeleteMode::All => {
            let answer = prompt
                .ask(&format!(
                    "This deletes ALL notes and resets ids. Type {WIPE_CONFIRMATION_TOKEN} to continue"
                ))
                .map_err(CliError::Prompt)?;
            match service.wipe_notes(&answer)? {
                WipeOutcome::Wiped { removed } => {
                    success(&format!("Removed all {removed} note(s); ids start again at 1"));
                }
                WipeOutcome::Cancelled => {
                    println!("{} Cancelled; no notes were deleted", "-".yellow());
                }
            }
        }
    }
    Ok(())
}

fn print_view(view: &NotesView) {
    println!("{}", notes_table(&view.notes));
    println!("{}", tags_line(&view.tags));
}

fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

#[cfg(test)]
mod tests {
    use super::{run, CliError, DeleteMode};
    use crate::prompt::ConfirmPrompt;
    use crate::{Cli, DeleteArgs};
    use clap::Parser;
    use dotnote_core::{
        open_db, NoteId, NoteService, NoteServiceError, Privilege, RepoError,
        SqliteNoteRepository,
    };
    use std::io;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    struct ScriptedPrompt {
        answer: &'static str,
        asked: usize,
    }

    impl ScriptedPrompt {
        fn answering(answer: &'static str) -> Self {
            Self { answer, asked: 0 }
        }
    }

    impl ConfirmPrompt for ScriptedPrompt {
        fn ask(&mut self, _message: &str) -> io::Result<String> {
            self.asked += 1;
            Ok(self.answer.to_string())
        }
    }

    struct Workspace {
        dir: TempDir,
    }

    impl Workspace {
        fn new() -> Self {
            Self {
                dir: tempfile::tempdir().unwrap(),
            }
        }

        fn db_path(&self) -> PathBuf {
            self.dir.path().join("notes.db")
        }

        fn run_as(
            &self,
            privilege: Privilege,
            args: &[&str],
            prompt: &mut ScriptedPrompt,
        ) -> Result<(), CliError> {
            let db = self.db_path();
            let log_dir = self.dir.path().join("logs");
            let mut argv = vec![
                "dotnote".to_string(),
                "--db".to_string(),
                db.display().to_string(),
                "--log-dir".to_string(),
                log_dir.display().to_string(),
            ];
            argv.extend(args.iter().map(|arg| arg.to_string()));
            let cli = Cli::try_parse_from(argv).unwrap();
            run(cli, privilege, prompt)
        }

        fn run(&self, args: &[&str]) -> Result<(), CliError> {
            self.run_as(Privilege::Elevated, args, &mut ScriptedPrompt::answering(""))
        }

        fn notes(&self) -> Vec<(i64, String, Option<String>)> {
            let mut conn = open_db(self.db_path()).unwrap();
            let service = NoteService::new(SqliteNoteRepository::try_new(&mut conn).unwrap());
            service
                .view_notes()
                .unwrap()
                .notes
                .into_iter()
                .map(|note| (note.id.get(), note.text, note.tags))
                .collect()
        }
    }

    fn assert_missing(path: &Path) {
        assert!(!path.exists(), "{} must not be created", path.display());
    }

    #[test]
    fn unprivileged_run_is_denied_before_touching_storage() {
        let ws = Workspace::new();
        let err = ws
            .run_as(
                Privilege::Unprivileged { euid: Some(1000) },
                &["init"],
                &mut ScriptedPrompt::answering(""),
            )
            .unwrap_err();

        assert!(matches!(err, CliError::PermissionDenied(_)));
        assert!(err.to_string().contains("permission denied"));
        assert_missing(&ws.db_path());
    }

    #[test]
    fn commands_before_init_point_to_init() {
        let ws = Workspace::new();
        let err = ws.run(&["view"]).unwrap_err();
        assert!(matches!(
            err,
            CliError::Service(NoteServiceError::Repo(RepoError::MissingRequiredTable(_)))
        ));
        assert!(err.hint().unwrap().contains("dotnote init"));
    }

    #[test]
    fn add_then_view_stores_normalized_tags() {
        let ws = Workspace::new();
        ws.run(&["init"]).unwrap();
        ws.run(&["init"]).unwrap();
        ws.run(&["add", "buy milk", "-t", "home, errand", "--show"])
            .unwrap();
        ws.run(&["view"]).unwrap();

        assert_eq!(
            ws.notes(),
            vec![(1, "buy milk".to_string(), Some("home,errand".to_string()))]
        );
    }

    #[test]
    fn delete_by_tag_and_id() {
        let ws = Workspace::new();
        ws.run(&["init"]).unwrap();
        ws.run(&["add", "buy milk", "-t", "home"]).unwrap();
        ws.run(&["add", "pay rent", "-t", "finance"]).unwrap();
        ws.run(&["add", "walk dog"]).unwrap();

        ws.run(&["delete", "-t", "home"]).unwrap();
        ws.run(&["delete", "-i", "3"]).unwrap();
        ws.run(&["delete", "-i", "99"]).unwrap();
        ws.run(&["search", "rent"]).unwrap();

        assert_eq!(
            ws.notes(),
            vec![(2, "pay rent".to_string(), Some("finance".to_string()))]
        );
    }

    #[test]
    fn delete_all_requires_exact_token() {
        let ws = Workspace::new();
        ws.run(&["init"]).unwrap();
        ws.run(&["add", "first"]).unwrap();
        ws.run(&["add", "second"]).unwrap();

        let mut declined = ScriptedPrompt::answering("yes");
        ws.run_as(Privilege::Elevated, &["delete", "-a"], &mut declined)
            .unwrap();
        assert_eq!(declined.asked, 1);
        assert_eq!(ws.notes().len(), 2);

        let mut confirmed = ScriptedPrompt::answering("CONFIRM");
        ws.run_as(Privilege::Elevated, &["delete", "--all"], &mut confirmed)
            .unwrap();
        assert!(ws.notes().is_empty());

        ws.run(&["add", "again"]).unwrap();
        assert_eq!(ws.notes(), vec![(1, "again".to_string(), None)]);
    }

    #[test]
    fn delete_args_map_to_single_mode() {
        let tag = DeleteArgs {
            all: false,
            tag: Some("home".to_string()),
            id: None,
        };
        assert_eq!(tag.mode(), DeleteMode::Tag("home".to_string()));

        let id = DeleteArgs {
            all: false,
            tag: None,
            id: Some(4),
        };
        assert_eq!(id.mode(), DeleteMode::Id(NoteId(4)));

        let all = DeleteArgs {
            all: true,
            tag: None,
            id: None,
        };
        assert_eq!(all.mode(), DeleteMode::All);
    }
}

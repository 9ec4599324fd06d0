//! Confirmation input for destructive commands.

use std::io::{self, BufRead, IsTerminal};

/// Source of a typed confirmation answer.
pub(crate) trait ConfirmPrompt {
    /// Shows `message` and returns the answer without its line ending.
    fn ask(&mut self, message: &str) -> io::Result<String>;
}

/// Reads answers from the terminal, or from piped stdin when not interactive.
pub(crate) struct TerminalPrompt;

impl ConfirmPrompt for TerminalPrompt {
    fn ask(&mut self, message: &str) -> io::Result<String> {
        if io::stdin().is_terminal() {
            return dialoguer::Input::<String>::new()
                .with_prompt(message)
                .allow_empty(true)
                .interact_text()
                .map_err(|err| io::Error::other(err.to_string()));
        }

        eprint!("{message}: ");
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(strip_line_ending(&line).to_string())
    }
}

fn strip_line_ending(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}

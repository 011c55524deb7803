//! Terminal I/O utilities for CLI.
//!
//! Provides TTY detection and user prompting.

use std::io::{self, BufRead, IsTerminal, Write};

/// Answers that let a confirmation through. Anything else cancels.
const AFFIRMATIVE: &[&str] = &["y", "yes", "s", "si"];

pub fn is_stdin_tty() -> bool {
    io::stdin().is_terminal()
}

/// Print `message` and block until a line arrives on stdin.
///
/// End of input reads as an empty answer. Only the line ending is removed.
pub fn prompt(message: &str) -> repackage::Result<String> {
    eprint!("{}", message);
    io::stderr().flush().ok();

    let stdin = io::stdin();
    let mut line = String::new();
    stdin.lock().read_line(&mut line).map_err(|e| {
        repackage::Error::internal_io(e.to_string(), Some("read input".to_string()))
    })?;

    Ok(strip_line_ending(&line).to_string())
}

/// Drop the trailing newline only; other whitespace is part of the answer.
fn strip_line_ending(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}

pub fn confirm(message: &str) -> repackage::Result<bool> {
    Ok(is_affirmative(&prompt(message)?))
}

pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    AFFIRMATIVE.contains(&answer.as_str())
}

/// Print status message to stderr if running in a terminal.
pub fn status(message: &str) {
    if io::stderr().is_terminal() {
        eprintln!("{}", message);
    }
}

// log_status! macro is defined in lib.rs (#[macro_export]) and available crate-wide.

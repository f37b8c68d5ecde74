//! Terminal I/O utilities for CLI.
//!
//! Provides TTY detection and user prompting.

use std::io::{self, BufRead, IsTerminal, Write};

pub fn is_stdin_tty() -> bool {
    io::stdin().is_terminal()
}

pub fn prompt(message: &str) -> mfdeploy::Result<String> {
    eprint!("{}", message);
    io::stderr().flush().ok();

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).map_err(read_error)?;

    Ok(line.trim().to_string())
}

/// Prompt without echoing input when stdin is a terminal. Piped input is read
/// as a plain line so scripted runs keep working.
pub fn prompt_password(message: &str) -> mfdeploy::Result<String> {
    if !is_stdin_tty() {
        return prompt(message);
    }

    rpassword::prompt_password(message)
        .map(|value| value.trim().to_string())
        .map_err(read_error)
}

fn read_error(err: io::Error) -> mfdeploy::Error {
    mfdeploy::Error::internal_io(err.to_string(), Some("read prompt input".to_string()))
}

/// Print status message to stderr if running in a terminal.
pub fn status(message: &str) {
    if io::stderr().is_terminal() {
        eprintln!("{}", message);
    }
}

// log_status! macro is defined in lib.rs (#[macro_export]) and available crate-wide.

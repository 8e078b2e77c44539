//! ui::prompts
//!
//! Interactive prompts and confirmations.
//!
//! # Design
//!
//! Prompts are only shown in interactive mode. In non-interactive mode,
//! operations requiring user input must either have defaults or fail
//! with a clear error message.

use std::io::{self, BufRead, Write};

use thiserror::Error;

/// Errors from prompts.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt cancelled by user")]
    Cancelled,

    #[error("not in interactive mode")]
    NotInteractive,

    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Prompt for confirmation (yes/no).
///
/// Returns `Ok(true)` only for an explicit `y` answer; an empty answer
/// takes the default. Returns `Err(PromptError::NotInteractive)` if not
/// in interactive mode.
pub fn confirm(message: &str, default: bool, interactive: bool) -> Result<bool, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }
    let answer = read_answer(&format!("{} [y/n] : ", message))?;
    match answer.trim() {
        "" => Ok(default),
        "y" | "Y" | "yes" => Ok(true),
        _ => Ok(false),
    }
}

/// Prompt to select from a numbered list of options.
///
/// Returns the index of the selected option.
pub fn select<T: AsRef<str>>(
    message: &str,
    options: &[T],
    interactive: bool,
) -> Result<usize, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }
    println!("{}", message);
    for (i, option) in options.iter().enumerate() {
        println!("[ {} ]: {}", i, option.as_ref());
    }
    let answer = read_answer("Selection: ")?;
    let index: usize = answer
        .trim()
        .parse()
        .map_err(|_| PromptError::InvalidSelection(answer.trim().to_string()))?;
    if index >= options.len() {
        return Err(PromptError::InvalidSelection(answer.trim().to_string()));
    }
    Ok(index)
}

/// Print a prompt and read one line from stdin.
fn read_answer(prompt: &str) -> Result<String, PromptError> {
    print!("{}", prompt);
    io::stdout()
        .flush()
        .map_err(|e| PromptError::IoError(e.to_string()))?;

    let mut line = String::new();
    let read = io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| PromptError::IoError(e.to_string()))?;
    if read == 0 {
        // EOF on stdin
        return Err(PromptError::Cancelled);
    }
    Ok(line)
}

//! Terminal prompter backed by `inquire`.

use appdesk_core::{AppdeskError, Prompter, Result};
use inquire::{Confirm, InquireError, Select, Text};

/// Asks questions on the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

/// Escape and Ctrl-C end the run the same way as declining a conflict.
fn map_err(err: InquireError) -> AppdeskError {
    match err {
        InquireError::OperationCanceled | InquireError::OperationInterrupted => {
            AppdeskError::UserAborted
        }
        other => AppdeskError::Prompt(other.to_string()),
    }
}

/// Text prompt that answers `default` when the user just presses Enter.
fn text_prompt<'a>(message: &'a str, default: &'a str) -> Text<'a> {
    let text = Text::new(message);
    if default.is_empty() {
        text
    } else {
        text.with_default(default)
    }
}

impl Prompter for TerminalPrompter {
    fn input(&mut self, message: &str, default: &str) -> Result<String> {
        text_prompt(message, default).prompt().map_err(map_err)
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        Confirm::new(message)
            .with_default(default)
            .prompt()
            .map_err(map_err)
    }

    fn select(&mut self, message: &str, options: &[String]) -> Result<usize> {
        Select::new(message, options.to_vec())
            .with_page_size(15)
            .raw_prompt()
            .map(|choice| choice.index)
            .map_err(map_err)
    }

    fn note(&mut self, message: &str) {
        // User-facing output goes to stdout; logs go to stderr.
        println!("{}", message);
    }
}

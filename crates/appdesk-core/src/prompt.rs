//! Interactive prompt abstraction.
//!
//! The lifecycle code asks questions through [`Prompter`] so the terminal
//! front-end can be swapped for a scripted one.

use crate::error::Result;

/// Asks the user questions.
pub trait Prompter {
    /// Free-text input. Empty input returns `default`.
    fn input(&mut self, message: &str, default: &str) -> Result<String>;

    /// Yes/no question.
    fn confirm(&mut self, message: &str, default: bool) -> Result<bool>;

    /// Pick one of `options`; returns its index.
    ///
    /// `options` is never empty.
    fn select(&mut self, message: &str, options: &[String]) -> Result<usize>;

    /// Show an informational line.
    fn note(&mut self, message: &str);
}

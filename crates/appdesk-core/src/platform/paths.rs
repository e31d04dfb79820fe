//! Search-path utilities.

use super::permissions::is_executable;
use std::path::{Path, PathBuf};

/// Find an executable named `command` in `search_path`.
///
/// Returns the first match in search-path order, like `command -v`.
pub fn find_in_path<P: AsRef<Path>>(command: &str, search_path: &[P]) -> Option<PathBuf> {
    if command.is_empty() {
        return None;
    }

    search_path
        .iter()
        .map(|dir| dir.as_ref().join(command))
        .find(|candidate| candidate.is_file() && is_executable(candidate))
}

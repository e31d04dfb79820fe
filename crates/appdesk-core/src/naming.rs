//! Command and application name derivation.

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Regex for anything that may not appear in a command name.
static NON_ALNUM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9]").unwrap());

/// Reduce `name` to a lowercase ASCII alphanumeric command name.
///
/// ```
/// use appdesk_core::naming::sanitize_command_name;
///
/// assert_eq!(sanitize_command_name("My Cool App"), "mycoolapp");
/// assert_eq!(sanitize_command_name("Krita-5.2.2-x86_64"), "krita522x8664");
/// ```
pub fn sanitize_command_name(name: &str) -> String {
    NON_ALNUM.replace_all(name, "").to_lowercase()
}

/// Application name of a bundle: its file name without the last extension.
pub fn app_name(bundle: &Path) -> String {
    bundle
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Default command name for a bundle.
pub fn default_command_name(bundle: &Path) -> String {
    sanitize_command_name(&app_name(bundle))
}

//! Category discovery from installed desktop entries.

use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;
use walkdir::WalkDir;

use crate::config::PathsConfig;

/// Regex for the `Categories=` key of a desktop file.
static CATEGORIES_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^Categories=(.+)$").unwrap());

/// Extract the category tags from the first `Categories=` line of a desktop file.
pub fn parse_categories(contents: &str) -> Vec<String> {
    let Some(captures) = CATEGORIES_LINE.captures(contents) else {
        return Vec::new();
    };

    captures[1]
        .trim_end_matches('\r')
        .split(';')
        .filter(|category| !category.is_empty())
        .map(str::to_string)
        .collect()
}

/// Collect every distinct category used by the desktop files in `dirs`.
///
/// Only `*.desktop` files directly inside each directory are read. Missing
/// directories and unreadable files contribute nothing.
pub fn collect_categories<P: AsRef<Path>>(dirs: &[P]) -> Vec<String> {
    let mut set = BTreeSet::new();

    for dir in dirs {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            debug!("Skipping missing applications directory {}", dir.display());
            continue;
        }

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            let is_desktop = path
                .extension()
                .is_some_and(|ext| ext == PathsConfig::DESKTOP_ENTRY_EXTENSION);
            if !is_desktop {
                continue;
            }

            match fs::read_to_string(path) {
                Ok(contents) => set.extend(parse_categories(&contents)),
                Err(e) => debug!("Skipping unreadable {}: {}", path.display(), e),
            }
        }
    }

    debug!("Collected {} categories", set.len());
    set.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_entry(dir: &Path, name: &str, categories: &str) {
        let content = format!(
            "[Desktop Entry]\nName={}\nExec={}\nCategories={}\n",
            name, name, categories
        );
        fs::write(dir.join(format!("{}.desktop", name)), content).unwrap();
    }

    #[test]
    fn test_parse_categories() {
        let content = "[Desktop Entry]\nName=Foo\nCategories=Utility;Game;\n";
        assert_eq!(parse_categories(content), vec!["Utility", "Game"]);
    }

    #[test]
    fn test_parse_categories_first_line_only() {
        let content = "Categories=Office;\n[Desktop Action new]\nCategories=Game;\n";
        assert_eq!(parse_categories(content), vec!["Office"]);
    }

    #[test]
    fn test_parse_categories_missing() {
        assert!(parse_categories("[Desktop Entry]\nName=Foo\n").is_empty());
        assert!(parse_categories("Categories=\n").is_empty());
    }

    #[test]
    fn test_parse_categories_crlf() {
        let content = "[Desktop Entry]\r\nCategories=Network;Chat;\r\n";
        assert_eq!(parse_categories(content), vec!["Network", "Chat"]);
    }

    #[test]
    fn test_collect_sorted_and_deduplicated() {
        let temp_dir = TempDir::new().unwrap();
        write_entry(temp_dir.path(), "first", "Utility;Game");
        write_entry(temp_dir.path(), "second", "Game;Office");

        let categories = collect_categories(&[temp_dir.path()]);
        assert_eq!(categories, vec!["Game", "Office", "Utility"]);
    }

    #[test]
    fn test_collect_across_directories() {
        let system = TempDir::new().unwrap();
        let user = TempDir::new().unwrap();
        write_entry(system.path(), "editor", "Development;TextEditor;");
        write_entry(user.path(), "ide", "Development;IDE;");

        let missing = system.path().join("does-not-exist");
        let categories = collect_categories(&[system.path(), user.path(), missing.as_path()]);
        assert_eq!(categories, vec!["Development", "IDE", "TextEditor"]);
    }

    #[test]
    fn test_collect_ignores_other_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "Categories=Secret;\n").unwrap();
        fs::create_dir(temp_dir.path().join("nested")).unwrap();
        write_entry(&temp_dir.path().join("nested"), "deep", "Hidden");

        assert!(collect_categories(&[temp_dir.path()]).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_collect_skips_unreadable() {
        let temp_dir = TempDir::new().unwrap();
        write_entry(temp_dir.path(), "ok", "Audio");
        // A directory named like a desktop file cannot be read as a string.
        fs::create_dir(temp_dir.path().join("broken.desktop")).unwrap();

        assert_eq!(collect_categories(&[temp_dir.path()]), vec!["Audio"]);
    }
}

//! Desktop entry (.desktop file) generation.
//!
//! Emits the fixed key set `Name`, `Exec`, `Icon`, `Type`, `Terminal`,
//! `Categories` of the XDG Desktop Entry Specification.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{AppdeskError, Result};
use crate::platform;
use tracing::debug;

/// A desktop entry for an integrated AppImage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopEntry {
    /// Entry name (shown in menus).
    pub name: String,
    /// Command launched by the entry.
    pub exec: String,
    /// Absolute icon path.
    pub icon: PathBuf,
    /// Whether to run in a terminal.
    pub terminal: bool,
    /// Entry type (always "Application" here).
    pub entry_type: String,
    /// Menu categories.
    pub categories: Vec<String>,
}

impl Default for DesktopEntry {
    fn default() -> Self {
        Self {
            name: String::new(),
            exec: String::new(),
            icon: PathBuf::new(),
            terminal: false,
            entry_type: "Application".to_string(),
            categories: Vec::new(),
        }
    }
}

impl fmt::Display for DesktopEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[Desktop Entry]")?;
        writeln!(f, "Name={}", self.name)?;
        writeln!(f, "Exec={}", self.exec)?;
        writeln!(f, "Icon={}", self.icon.display())?;
        writeln!(f, "Type={}", self.entry_type)?;
        writeln!(f, "Terminal={}", self.terminal)?;
        if !self.categories.is_empty() {
            writeln!(f, "Categories={}", self.categories.join(";"))?;
        }
        Ok(())
    }
}

impl DesktopEntry {
    /// Create a new desktop entry builder.
    pub fn builder() -> DesktopEntryBuilder {
        DesktopEntryBuilder::new()
    }

    /// Write the desktop entry to `path`, replacing any existing file.
    ///
    /// The parent directory is created if needed and the file is marked
    /// executable so desktop environments treat it as a trusted launcher.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| AppdeskError::unwritable(e, parent))?;
        }

        let mut file = fs::File::create(path).map_err(|e| AppdeskError::unwritable(e, path))?;
        file.write_all(self.to_string().as_bytes())
            .map_err(|e| AppdeskError::unwritable(e, path))?;

        platform::set_executable(path)?;

        debug!("Wrote desktop entry to {:?}", path);

        Ok(())
    }
}

/// Builder for desktop entries.
pub struct DesktopEntryBuilder {
    entry: DesktopEntry,
}

impl DesktopEntryBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            entry: DesktopEntry::default(),
        }
    }

    /// Set the entry name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.entry.name = name.into();
        self
    }

    /// Set the executable command.
    pub fn exec(mut self, exec: impl Into<String>) -> Self {
        self.entry.exec = exec.into();
        self
    }

    /// Set the icon path.
    pub fn icon(mut self, icon: impl Into<PathBuf>) -> Self {
        self.entry.icon = icon.into();
        self
    }

    /// Set whether to run in terminal.
    pub fn terminal(mut self, terminal: bool) -> Self {
        self.entry.terminal = terminal;
        self
    }

    /// Add a category.
    pub fn add_category(mut self, category: impl Into<String>) -> Self {
        self.entry.categories.push(category.into());
        self
    }

    /// Build the desktop entry.
    pub fn build(self) -> DesktopEntry {
        self.entry
    }
}

impl Default for DesktopEntryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//! Centralized configuration for appdesk.
//!
//! Constants live in the `*Config` structs. Every path a component touches is
//! carried by [`Layout`], which is built once and passed in explicitly.

use crate::error::{AppdeskError, Result};
use std::path::{Path, PathBuf};

/// Application-level configuration.
pub struct AppConfig;

impl AppConfig {
    pub const STATE_DIR_NAME: &'static str = "appdesk";
    pub const STATE_FILENAME: &'static str = "installs.json";
}

/// Fixed filesystem locations.
pub struct PathsConfig;

impl PathsConfig {
    pub const BIN_DIR: &'static str = "/usr/local/bin";
    pub const SYSTEM_APPLICATION_DIRS: [&'static str; 2] =
        ["/usr/share/applications", "/usr/local/share/applications"];
    pub const DESKTOP_ENTRY_EXTENSION: &'static str = "desktop";
}

/// AppImage self-extraction conventions.
pub struct BundleConfig;

impl BundleConfig {
    pub const EXTRACT_FLAG: &'static str = "--appimage-extract";
    pub const EXTRACT_DIR_NAME: &'static str = "squashfs-root";
    pub const TEMP_DIR_PREFIX: &'static str = "appimage_";
    pub const ICON_EXTENSIONS: [&'static str; 6] = ["png", "svg", "xpm", "jpg", "jpeg", "webp"];
}

/// Privilege escalation settings.
pub struct PrivilegeConfig;

impl PrivilegeConfig {
    pub const SUDO_PROGRAM: &'static str = "sudo";
}

/// Every path the install and removal paths read or write.
#[derive(Debug, Clone)]
pub struct Layout {
    /// User's home directory.
    pub home_dir: PathBuf,
    /// Directory holding the command symlinks (`/usr/local/bin`).
    pub bin_dir: PathBuf,
    /// Per-user desktop entries (`~/.local/share/applications`).
    pub applications_dir: PathBuf,
    /// Per-user icons (`~/.local/share/icons`).
    pub icons_dir: PathBuf,
    /// Directories scanned for existing categories.
    pub category_dirs: Vec<PathBuf>,
    /// Parent of the per-run extraction directory.
    pub temp_dir: PathBuf,
    /// Directories searched for existing commands.
    pub search_path: Vec<PathBuf>,
    /// Install record store.
    pub state_file: PathBuf,
    /// Escalate through `sudo` when the bin dir is not writable.
    pub use_sudo: bool,
}

impl Layout {
    /// Derive the per-user layout below `home`.
    ///
    /// The temp dir and search path come from the process environment.
    pub fn from_home(home: impl AsRef<Path>) -> Self {
        let home_dir = home.as_ref().to_path_buf();
        let share = home_dir.join(".local").join("share");
        let applications_dir = share.join("applications");

        let mut category_dirs: Vec<PathBuf> = PathsConfig::SYSTEM_APPLICATION_DIRS
            .iter()
            .map(PathBuf::from)
            .collect();
        category_dirs.push(applications_dir.clone());

        let search_path = std::env::var_os("PATH")
            .map(|path| std::env::split_paths(&path).collect())
            .unwrap_or_default();

        Self {
            bin_dir: PathBuf::from(PathsConfig::BIN_DIR),
            icons_dir: share.join("icons"),
            state_file: share
                .join(AppConfig::STATE_DIR_NAME)
                .join(AppConfig::STATE_FILENAME),
            applications_dir,
            category_dirs,
            temp_dir: std::env::temp_dir(),
            search_path,
            use_sudo: true,
            home_dir,
        }
    }

    /// Detect the layout for the current user.
    pub fn detect() -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| AppdeskError::Config {
            message: "Could not determine home directory".to_string(),
        })?;
        Ok(Self::from_home(home))
    }

    /// Override the symlink directory.
    pub fn with_bin_dir(mut self, bin_dir: impl Into<PathBuf>) -> Self {
        self.bin_dir = bin_dir.into();
        self
    }

    /// Enable or disable privilege escalation.
    pub fn with_sudo(mut self, use_sudo: bool) -> Self {
        self.use_sudo = use_sudo;
        self
    }

    /// Path of the desktop entry for `app_name`.
    pub fn desktop_entry_path(&self, app_name: &str) -> PathBuf {
        self.applications_dir.join(format!(
            "{}.{}",
            app_name,
            PathsConfig::DESKTOP_ENTRY_EXTENSION
        ))
    }

    /// Path of the command symlink for `command_name`.
    pub fn symlink_path(&self, command_name: &str) -> PathBuf {
        self.bin_dir.join(command_name)
    }
}

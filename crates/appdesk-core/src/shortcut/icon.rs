//! Icon discovery and installation.
//!
//! Icons are copied as-is into the flat per-user icon directory under the
//! application's name; no resizing into theme sizes happens here.

use crate::config::BundleConfig;
use crate::error::{AppdeskError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Whether `path` has one of the recognised image extensions.
fn is_image(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| BundleConfig::ICON_EXTENSIONS.contains(&ext.as_str()))
}

/// List image files directly inside `root`, sorted by file name.
pub fn find_icons(root: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(root).map_err(|e| AppdeskError::io_with_path(e, root))?;

    let mut icons: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        // `is_file` follows symlinks; AppImages often link their icon.
        .filter(|path| path.is_file() && is_image(path))
        .collect();
    icons.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    debug!("Found {} icon candidates in {}", icons.len(), root.display());
    Ok(icons)
}

/// Installs and removes application icons.
pub struct IconManager {
    /// User's icon directory (`~/.local/share/icons`).
    icons_dir: PathBuf,
}

impl IconManager {
    /// Create a new icon manager.
    pub fn new(icons_dir: impl AsRef<Path>) -> Self {
        Self {
            icons_dir: icons_dir.as_ref().to_path_buf(),
        }
    }

    /// Copy `source` to `<icons_dir>/<app_name>.<ext>`.
    ///
    /// # Returns
    ///
    /// The absolute path of the installed icon.
    pub fn install(&self, source: &Path, app_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.icons_dir)
            .map_err(|e| AppdeskError::unwritable(e, &self.icons_dir))?;

        let dest = match source.extension() {
            Some(ext) => self
                .icons_dir
                .join(format!("{}.{}", app_name, ext.to_string_lossy())),
            None => self.icons_dir.join(app_name),
        };

        fs::copy(source, &dest).map_err(|e| AppdeskError::unwritable(e, &dest))?;
        debug!("Installed icon {:?} -> {:?}", source, dest);

        Ok(dest)
    }

    /// Remove every icon whose name, ignoring the extension, is `app_name`.
    ///
    /// Failures are logged and skipped. Returns the removed paths.
    pub fn remove(&self, app_name: &str) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(&self.icons_dir) else {
            return Vec::new();
        };

        let mut removed = Vec::new();
        for path in entries.filter_map(|e| e.ok()).map(|e| e.path()) {
            let matches = path
                .file_stem()
                .is_some_and(|stem| stem.to_string_lossy() == app_name);
            if !matches || path.is_dir() {
                continue;
            }
            match fs::remove_file(&path) {
                Ok(()) => removed.push(path),
                Err(e) => warn!("Failed to remove icon {}: {}", path.display(), e),
            }
        }
        removed
    }
}

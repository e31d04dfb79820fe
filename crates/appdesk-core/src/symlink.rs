//! Command symlink management.
//!
//! Links are created and removed with direct filesystem calls. When that fails
//! with a permission error and escalation is enabled, the same operation is
//! retried once through `sudo` with discrete arguments.

use crate::config::PrivilegeConfig;
use crate::error::{AppdeskError, Result};
use crate::platform;
use crate::process::{CommandRunner, CommandSpec};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What currently occupies a symlink path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkState {
    /// Nothing there.
    Absent,
    /// A symlink, possibly dangling.
    Symlink { target: PathBuf },
    /// A regular file, directory or other non-link entry.
    Other,
}

impl LinkState {
    pub fn exists(&self) -> bool {
        !matches!(self, LinkState::Absent)
    }
}

/// Creates and removes command symlinks.
pub struct SymlinkManager<'a> {
    runner: &'a dyn CommandRunner,
    use_sudo: bool,
}

impl<'a> SymlinkManager<'a> {
    /// Create a manager that escalates through `runner` when `use_sudo` is set.
    pub fn new(runner: &'a dyn CommandRunner, use_sudo: bool) -> Self {
        Self { runner, use_sudo }
    }

    /// Inspect `path` without following a final symlink.
    pub fn inspect(&self, path: &Path) -> LinkState {
        match fs::symlink_metadata(path) {
            Ok(metadata) if metadata.file_type().is_symlink() => LinkState::Symlink {
                target: fs::read_link(path).unwrap_or_default(),
            },
            Ok(_) => LinkState::Other,
            Err(_) => LinkState::Absent,
        }
    }

    /// Remove whatever file or link sits at `path`. Missing paths are fine.
    pub fn remove(&self, path: &Path) -> Result<()> {
        match fs::remove_file(path) {
            Ok(()) => {
                debug!("Removed {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) if e.kind() == ErrorKind::PermissionDenied && self.can_escalate() => {
                let spec = CommandSpec::new(PrivilegeConfig::SUDO_PROGRAM)
                    .arg("rm")
                    .arg("-f")
                    .arg("--")
                    .arg(path);
                self.run_privileged(&spec, path, "remove existing entry")
            }
            Err(e) => Err(AppdeskError::io_with_path(e, path)),
        }
    }

    /// Remove `path` only if it is a symlink.
    ///
    /// Returns whether a link was removed.
    pub fn remove_if_symlink(&self, path: &Path) -> Result<bool> {
        if !matches!(self.inspect(path), LinkState::Symlink { .. }) {
            return Ok(false);
        }
        self.remove(path)?;
        info!("Symlink removed: {}", path.display());
        Ok(true)
    }

    /// Remove `path` only if it is a symlink pointing at `target`.
    ///
    /// A link that has since been repointed elsewhere belongs to someone else
    /// and is left alone.
    pub fn remove_if_links_to(&self, path: &Path, target: &Path) -> Result<bool> {
        match self.inspect(path) {
            LinkState::Symlink { target: ref current } if current == target => {
                self.remove(path)?;
                info!("Symlink removed: {}", path.display());
                Ok(true)
            }
            LinkState::Symlink { target: current } => {
                debug!(
                    "Leaving {} in place, it now points to {}",
                    path.display(),
                    current.display()
                );
                Ok(false)
            }
            _ => Ok(false),
        }
    }

    /// Create `link` pointing at `target`. `link` must not exist.
    pub fn create(&self, target: &Path, link: &Path) -> Result<()> {
        match make_symlink(target, link) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::PermissionDenied && self.can_escalate() => {
                let spec = CommandSpec::new(PrivilegeConfig::SUDO_PROGRAM)
                    .arg("ln")
                    .arg("-s")
                    .arg("--")
                    .arg(target)
                    .arg(link);
                self.run_privileged(&spec, link, "create symlink")?;
            }
            Err(e) => return Err(AppdeskError::io_with_path(e, link)),
        }

        info!("Symlink created: {} -> {}", link.display(), target.display());
        Ok(())
    }

    /// Root already has every permission `sudo` could grant.
    fn can_escalate(&self) -> bool {
        self.use_sudo && !platform::is_root()
    }

    fn run_privileged(&self, spec: &CommandSpec, path: &Path, action: &str) -> Result<()> {
        debug!("Escalating to {} to {}", spec.display(), action);
        let output = self.runner.run(spec)?;
        if output.success {
            return Ok(());
        }
        Err(AppdeskError::PermissionDenied {
            path: path.to_path_buf(),
            message: format!(
                "failed to {} (make sure you have sudo privileges): {}",
                action,
                output.combined()
            ),
        })
    }
}

#[cfg(unix)]
fn make_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(not(unix))]
fn make_symlink(_target: &Path, _link: &Path) -> std::io::Result<()> {
    Err(std::io::Error::new(
        ErrorKind::Unsupported,
        "command symlinks require a Unix platform",
    ))
}

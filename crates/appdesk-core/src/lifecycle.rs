//! Install and removal of an AppImage's desktop integration.
//!
//! Install runs as a straight line: command name → symlink → extraction →
//! icon → category → desktop entry. Any error stops the run and leaves the
//! steps already taken in place.

use crate::categories::collect_categories;
use crate::config::Layout;
use crate::error::{AppdeskError, Result};
use crate::extract::BundleExtractor;
use crate::naming;
use crate::platform;
use crate::process::{CommandRunner, SystemCommandRunner};
use crate::prompt::Prompter;
use crate::records::{InstallRecord, InstallRecordStore};
use crate::shortcut::{find_icons, DesktopEntry, IconManager};
use crate::symlink::{LinkState, SymlinkManager};
use chrono::Utc;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What a successful install created.
#[derive(Debug, Clone)]
pub struct InstallReport {
    pub app_name: String,
    pub command_name: String,
    pub symlink_path: PathBuf,
    pub icon_path: PathBuf,
    pub desktop_entry_path: PathBuf,
    pub category: String,
}

/// What a removal deleted.
#[derive(Debug, Clone, Default)]
pub struct RemoveReport {
    pub app_name: String,
    pub command_name: String,
    /// Removed symlink, if one was present.
    pub symlink: Option<PathBuf>,
    /// Removed desktop entry, if one was present.
    pub desktop_entry: Option<PathBuf>,
    /// Removed icon files.
    pub icons: Vec<PathBuf>,
    /// Best-effort steps that failed.
    pub failures: Vec<String>,
}

impl RemoveReport {
    /// Whether anything was actually deleted.
    pub fn removed_anything(&self) -> bool {
        self.symlink.is_some() || self.desktop_entry.is_some() || !self.icons.is_empty()
    }
}

/// Registers and unregisters bundles with the desktop.
pub struct Integrator {
    layout: Layout,
    runner: Box<dyn CommandRunner>,
}

impl Integrator {
    /// Create an integrator that runs real processes.
    pub fn new(layout: Layout) -> Self {
        Self::with_runner(layout, Box::new(SystemCommandRunner))
    }

    /// Create an integrator with a custom process runner.
    pub fn with_runner(layout: Layout, runner: Box<dyn CommandRunner>) -> Self {
        Self { layout, runner }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    fn symlinks(&self) -> SymlinkManager<'_> {
        SymlinkManager::new(self.runner.as_ref(), self.layout.use_sudo)
    }

    /// Integrate `bundle` with the desktop.
    pub fn install(&self, bundle: &Path, prompter: &mut dyn Prompter) -> Result<InstallReport> {
        let bundle = resolve_bundle(bundle)?;
        let app_name = naming::app_name(&bundle);
        info!("Installing {} from {}", app_name, bundle.display());

        let symlinks = self.symlinks();
        let store = InstallRecordStore::new(&self.layout.state_file);
        let command_name = self.choose_command_name(&bundle, &symlinks, prompter)?;
        let symlink_path = self.layout.symlink_path(&command_name);
        self.retire_previous_link(&store, &app_name, &symlink_path, &symlinks);
        symlinks.create(&bundle, &symlink_path)?;
        prompter.note(&format!("Symlink created: {}", symlink_path.display()));

        let extracted =
            BundleExtractor::new(self.runner.as_ref(), &self.layout.temp_dir).extract(&bundle)?;
        let icon_path = self.select_icon(extracted.root(), &app_name, prompter)?;
        let category = self.select_category(prompter)?;

        let desktop_entry_path = self.layout.desktop_entry_path(&app_name);
        DesktopEntry::builder()
            .name(&app_name)
            .exec(&command_name)
            .icon(&icon_path)
            .terminal(false)
            .add_category(&category)
            .build()
            .write_to_file(&desktop_entry_path)?;
        info!("Desktop entry created: {}", desktop_entry_path.display());

        extracted.cleanup();

        let record = InstallRecord {
            app_name: app_name.clone(),
            command_name: command_name.clone(),
            bundle_path: bundle.clone(),
            symlink_path: symlink_path.clone(),
            desktop_entry_path: desktop_entry_path.clone(),
            icon_path: icon_path.clone(),
            category: category.clone(),
            installed_at: Utc::now(),
        };
        if let Err(e) = store.put(record) {
            warn!("Failed to save install record for {}: {}", app_name, e);
        }

        Ok(InstallReport {
            app_name,
            command_name,
            symlink_path,
            icon_path,
            desktop_entry_path,
            category,
        })
    }

    /// Undo the integration of `bundle`. The bundle itself need not exist.
    ///
    /// Every step is best-effort; missing targets are skipped.
    pub fn remove(&self, bundle: &Path) -> Result<RemoveReport> {
        let app_name = naming::app_name(bundle);
        if app_name.is_empty() {
            return Err(AppdeskError::NotFound(bundle.to_path_buf()));
        }

        let store = InstallRecordStore::new(&self.layout.state_file);
        let recorded = store.get(&app_name).unwrap_or_else(|e| {
            warn!("Ignoring unreadable install records: {}", e);
            None
        });

        let mut report = RemoveReport {
            app_name: app_name.clone(),
            ..RemoveReport::default()
        };

        match recorded {
            // The record knows the exact paths, even if the layout has changed since.
            Some(record) => {
                debug!("Using install record from {}", record.installed_at);
                report.command_name = record.command_name.clone();

                match self
                    .symlinks()
                    .remove_if_links_to(&record.symlink_path, &record.bundle_path)
                {
                    Ok(true) => report.symlink = Some(record.symlink_path.clone()),
                    Ok(false) => {}
                    Err(e) => {
                        warn!(
                            "Failed to remove symlink {}: {}",
                            record.symlink_path.display(),
                            e
                        );
                        report.failures.push(e.to_string());
                    }
                }

                remove_file_into(&record.desktop_entry_path, &mut report, |report, path| {
                    report.desktop_entry = Some(path)
                });
                remove_file_into(&record.icon_path, &mut report, |report, path| {
                    report.icons.push(path)
                });
            }
            None => {
                let command_name = naming::default_command_name(bundle);
                report.command_name = command_name.clone();

                if !command_name.is_empty() {
                    let symlink_path = self.layout.symlink_path(&command_name);
                    match self.symlinks().remove_if_symlink(&symlink_path) {
                        Ok(true) => report.symlink = Some(symlink_path),
                        Ok(false) => {}
                        Err(e) => {
                            warn!("Failed to remove symlink {}: {}", symlink_path.display(), e);
                            report.failures.push(e.to_string());
                        }
                    }
                }
            }
        }

        let desktop_entry_path = self.layout.desktop_entry_path(&app_name);
        remove_file_into(&desktop_entry_path, &mut report, |report, path| {
            report.desktop_entry = Some(path)
        });
        report
            .icons
            .extend(IconManager::new(&self.layout.icons_dir).remove(&app_name));

        if let Err(e) = store.remove(&app_name) {
            warn!("Failed to update install records: {}", e);
        }

        info!("Desktop entry and icon removed for {}", app_name);
        Ok(report)
    }

    /// Drop the link left by an earlier install of `app_name` under another name.
    ///
    /// Only a link still pointing at the recorded bundle is removed. Failures
    /// are logged; the new install goes ahead regardless.
    fn retire_previous_link(
        &self,
        store: &InstallRecordStore,
        app_name: &str,
        new_link: &Path,
        symlinks: &SymlinkManager<'_>,
    ) {
        let previous = match store.get(app_name) {
            Ok(Some(previous)) => previous,
            Ok(None) => return,
            Err(e) => {
                warn!("Ignoring unreadable install records: {}", e);
                return;
            }
        };
        if previous.symlink_path == new_link {
            return;
        }

        match symlinks.remove_if_links_to(&previous.symlink_path, &previous.bundle_path) {
            Ok(true) => info!(
                "Removed previous command link {}",
                previous.symlink_path.display()
            ),
            Ok(false) => {}
            Err(e) => warn!(
                "Failed to remove previous command link {}: {}",
                previous.symlink_path.display(),
                e
            ),
        }
    }

    /// Ask for a command name until one is free or the user accepts a clash.
    fn choose_command_name(
        &self,
        bundle: &Path,
        symlinks: &SymlinkManager<'_>,
        prompter: &mut dyn Prompter,
    ) -> Result<String> {
        let default_name = naming::default_command_name(bundle);
        prompter.note(&format!("Suggested command name: {}", default_name));

        loop {
            let answer = prompter.input(
                "Enter command name (press Enter to use suggested name):",
                &default_name,
            )?;
            let name = if answer.trim().is_empty() {
                default_name.clone()
            } else {
                naming::sanitize_command_name(&answer)
            };
            if name.is_empty() {
                prompter.note("Command name must contain at least one letter or digit.");
                continue;
            }

            let link = self.layout.symlink_path(&name);

            if let Some(existing) = platform::find_in_path(&name, &self.layout.search_path) {
                if existing != link {
                    prompter.note(&format!(
                        "Warning: Command '{}' already exists at: {}",
                        name,
                        existing.display()
                    ));
                    if prompter.confirm("Would you like to try a different name?", true)? {
                        continue;
                    }
                }
            }

            let state = symlinks.inspect(&link);
            if state.exists() {
                prompter.note(&format!("Warning: {} already exists.", link.display()));
                if let LinkState::Symlink { ref target } = state {
                    prompter.note(&format!("It points to: {}", target.display()));
                }
                if !prompter.confirm("Do you want to override it?", false)? {
                    if prompter.confirm("Would you like to try a different name?", true)? {
                        continue;
                    }
                    return Err(AppdeskError::UserAborted);
                }
                symlinks.remove(&link)?;
            }

            return Ok(name);
        }
    }

    fn select_icon(
        &self,
        root: &Path,
        app_name: &str,
        prompter: &mut dyn Prompter,
    ) -> Result<PathBuf> {
        let icons = find_icons(root)?;
        if icons.is_empty() {
            return Err(AppdeskError::NoIconsFound(root.to_path_buf()));
        }

        let options: Vec<String> = icons
            .iter()
            .map(|path| {
                path.file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default()
            })
            .collect();
        let index = prompter.select("Choose icon:", &options)?;
        let source = icons
            .get(index)
            .ok_or_else(|| AppdeskError::Prompt(format!("icon selection {} out of range", index)))?;

        IconManager::new(&self.layout.icons_dir).install(source, app_name)
    }

    fn select_category(&self, prompter: &mut dyn Prompter) -> Result<String> {
        let categories = collect_categories(&self.layout.category_dirs);
        if categories.is_empty() {
            return Err(AppdeskError::NoCategoriesFound);
        }

        let index = prompter.select("Choose a category:", &categories)?;
        categories.into_iter().nth(index).ok_or_else(|| {
            AppdeskError::Prompt(format!("category selection {} out of range", index))
        })
    }
}

/// Delete `path` if present and hand it to `removed`; failures land in the report.
fn remove_file_into(
    path: &Path,
    report: &mut RemoveReport,
    removed: impl FnOnce(&mut RemoveReport, PathBuf),
) {
    match fs::remove_file(path) {
        Ok(()) => removed(report, path.to_path_buf()),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => {
            warn!("Failed to remove {}: {}", path.display(), e);
            report
                .failures
                .push(AppdeskError::io_with_path(e, path).to_string());
        }
    }
}

/// Canonicalize `bundle` and require it to be a regular file.
fn resolve_bundle(bundle: &Path) -> Result<PathBuf> {
    let resolved =
        fs::canonicalize(bundle).map_err(|_| AppdeskError::NotFound(bundle.to_path_buf()))?;
    if !resolved.is_file() {
        return Err(AppdeskError::NotFound(bundle.to_path_buf()));
    }
    Ok(resolved)
}

//! Persistent record of completed installs.
//!
//! Removal needs the command name chosen at install time, which cannot be
//! derived from the bundle path once the user overrides it. Records are keyed
//! by application name and stored as one JSON document.

use crate::error::{AppdeskError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use tracing::debug;

/// What one install created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallRecord {
    pub app_name: String,
    pub command_name: String,
    pub bundle_path: PathBuf,
    pub symlink_path: PathBuf,
    pub desktop_entry_path: PathBuf,
    pub icon_path: PathBuf,
    pub category: String,
    pub installed_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RecordFile {
    #[serde(default)]
    installs: BTreeMap<String, InstallRecord>,
}

/// JSON-file backed store of [`InstallRecord`]s.
pub struct InstallRecordStore {
    path: PathBuf,
}

impl InstallRecordStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Look up the record for `app_name`.
    pub fn get(&self, app_name: &str) -> Result<Option<InstallRecord>> {
        Ok(self.load()?.installs.remove(app_name))
    }

    /// Insert or replace the record for `record.app_name`.
    pub fn put(&self, record: InstallRecord) -> Result<()> {
        let mut file = self.load()?;
        file.installs.insert(record.app_name.clone(), record);
        self.save(&file)
    }

    /// Drop the record for `app_name`, returning it if present.
    pub fn remove(&self, app_name: &str) -> Result<Option<InstallRecord>> {
        let mut file = self.load()?;
        let removed = file.installs.remove(app_name);
        if removed.is_some() {
            self.save(&file)?;
        }
        Ok(removed)
    }

    fn load(&self) -> Result<RecordFile> {
        if !self.path.exists() {
            return Ok(RecordFile::default());
        }

        let contents = fs::read_to_string(&self.path)
            .map_err(|e| AppdeskError::io_with_path(e, &self.path))?;
        serde_json::from_str(&contents).map_err(|e| AppdeskError::Json {
            message: format!("Failed to parse {}: {}", self.path.display(), e),
            source: Some(e),
        })
    }

    /// Write to a temp file beside the target, then rename over it.
    fn save(&self, file: &RecordFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| AppdeskError::unwritable(e, parent))?;
        }

        let serialized = serde_json::to_string_pretty(file)?;
        let temp_path = self
            .path
            .with_extension(format!("json.{}.tmp", process::id()));

        {
            let mut temp = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(|e| AppdeskError::unwritable(e, &temp_path))?;
            temp.write_all(serialized.as_bytes())
                .map_err(|e| AppdeskError::unwritable(e, &temp_path))?;
            temp.sync_all()
                .map_err(|e| AppdeskError::unwritable(e, &temp_path))?;
        }

        fs::rename(&temp_path, &self.path).map_err(|e| AppdeskError::unwritable(e, &self.path))?;
        debug!("Saved install records to {}", self.path.display());
        Ok(())
    }
}

//! AppImage self-extraction into a throwaway directory.

use crate::config::BundleConfig;
use crate::error::{AppdeskError, Result};
use crate::platform;
use crate::process::{CommandRunner, CommandSpec};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info, warn};

/// Contents of an extracted bundle.
///
/// The temporary directory is removed when this value is dropped.
#[derive(Debug)]
pub struct ExtractedBundle {
    dir: TempDir,
    root: PathBuf,
}

impl ExtractedBundle {
    /// The `squashfs-root` directory produced by the bundle.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The temporary directory holding the extraction.
    pub fn temp_dir(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the temporary directory now, ignoring failures.
    pub fn cleanup(self) {
        let path = self.dir.path().to_path_buf();
        if let Err(e) = self.dir.close() {
            warn!("Failed to clean up {}: {}", path.display(), e);
        }
    }
}

/// Runs a bundle's `--appimage-extract` facility.
pub struct BundleExtractor<'a> {
    runner: &'a dyn CommandRunner,
    temp_root: PathBuf,
}

impl<'a> BundleExtractor<'a> {
    /// Create an extractor that places its work directory under `temp_root`.
    pub fn new(runner: &'a dyn CommandRunner, temp_root: impl AsRef<Path>) -> Self {
        Self {
            runner,
            temp_root: temp_root.as_ref().to_path_buf(),
        }
    }

    /// Extract `bundle` and return the populated directory.
    pub fn extract(&self, bundle: &Path) -> Result<ExtractedBundle> {
        info!("Extracting AppImage contents...");

        if !platform::is_executable(bundle) {
            info!("Making AppImage executable...");
            platform::set_executable(bundle).map_err(|e| AppdeskError::ExtractionFailed {
                message: "failed to make AppImage executable".to_string(),
                output: e.to_string(),
            })?;
        }

        let dir = tempfile::Builder::new()
            .prefix(BundleConfig::TEMP_DIR_PREFIX)
            .tempdir_in(&self.temp_root)
            .map_err(|e| AppdeskError::unwritable(e, &self.temp_root))?;
        debug!("Extraction directory: {}", dir.path().display());

        let spec = CommandSpec::new(bundle)
            .arg(BundleConfig::EXTRACT_FLAG)
            .current_dir(dir.path());

        let output = self
            .runner
            .run(&spec)
            .map_err(|e| AppdeskError::ExtractionFailed {
                message: "could not start the bundle".to_string(),
                output: e.to_string(),
            })?;

        if !output.success {
            let status = output
                .code
                .map(|code| format!("exit status {}", code))
                .unwrap_or_else(|| "terminated by signal".to_string());
            return Err(AppdeskError::ExtractionFailed {
                message: format!("bundle exited with {}", status),
                output: output.combined(),
            });
        }

        let root = dir.path().join(BundleConfig::EXTRACT_DIR_NAME);
        if !root.is_dir() {
            return Err(AppdeskError::ExtractionFailed {
                message: format!(
                    "extraction appeared to succeed but {} directory not found",
                    BundleConfig::EXTRACT_DIR_NAME
                ),
                output: output.combined(),
            });
        }

        Ok(ExtractedBundle { dir, root })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::CommandOutput;
    use std::fs;

    /// Pretends to be an AppImage: optionally creates `squashfs-root`.
    struct FakeBundle {
        create_root: bool,
        exit_ok: bool,
    }

    impl CommandRunner for FakeBundle {
        fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
            assert_eq!(spec.args, vec![BundleConfig::EXTRACT_FLAG]);
            let cwd = spec.current_dir.as_ref().expect("extraction needs a working dir");
            if self.create_root {
                let root = cwd.join(BundleConfig::EXTRACT_DIR_NAME);
                fs::create_dir_all(&root).unwrap();
                fs::write(root.join("app.png"), b"png").unwrap();
            }
            Ok(CommandOutput {
                success: self.exit_ok,
                code: Some(if self.exit_ok { 0 } else { 1 }),
                stdout: "squashfs-root/app.png\n".to_string(),
                stderr: if self.exit_ok { String::new() } else { "corrupt image".to_string() },
            })
        }
    }

    fn bundle_in(dir: &Path) -> PathBuf {
        let bundle = dir.join("Tool.AppImage");
        fs::write(&bundle, b"ELF").unwrap();
        bundle
    }

    #[test]
    fn test_extract_success_and_cleanup() {
        let temp = TempDir::new().unwrap();
        let bundle = bundle_in(temp.path());
        let runner = FakeBundle {
            create_root: true,
            exit_ok: true,
        };

        let extracted = BundleExtractor::new(&runner, temp.path()).extract(&bundle).unwrap();
        assert!(extracted.root().join("app.png").exists());
        assert!(extracted
            .temp_dir()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(BundleConfig::TEMP_DIR_PREFIX));
        assert!(platform::is_executable(&bundle));

        let work_dir = extracted.temp_dir().to_path_buf();
        extracted.cleanup();
        assert!(!work_dir.exists());
    }

    #[test]
    fn test_extract_nonzero_exit_surfaces_output() {
        let temp = TempDir::new().unwrap();
        let bundle = bundle_in(temp.path());
        let runner = FakeBundle {
            create_root: false,
            exit_ok: false,
        };

        let err = BundleExtractor::new(&runner, temp.path()).extract(&bundle).unwrap_err();
        match err {
            AppdeskError::ExtractionFailed { message, output } => {
                assert!(message.contains("exit status 1"));
                assert!(output.contains("corrupt image"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_extract_missing_root_dir() {
        let temp = TempDir::new().unwrap();
        let bundle = bundle_in(temp.path());
        let runner = FakeBundle {
            create_root: false,
            exit_ok: true,
        };

        let err = BundleExtractor::new(&runner, temp.path()).extract(&bundle).unwrap_err();
        assert!(matches!(err, AppdeskError::ExtractionFailed { .. }));
        assert!(err.to_string().contains("squashfs-root"));

        // The failed work directory does not linger.
        let leftovers: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .collect();
        assert!(leftovers.is_empty());
    }
}

//! External process execution.
//!
//! Only privileged filesystem operations and bundle self-extraction go through
//! here. Arguments are always passed as discrete values, never through a shell.

use crate::error::{AppdeskError, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// A command to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program to execute.
    pub program: OsString,
    /// Arguments, one per element.
    pub args: Vec<OsString>,
    /// Working directory, if different from the current one.
    pub current_dir: Option<PathBuf>,
}

impl CommandSpec {
    /// Create a command for `program` with no arguments.
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    /// Append an argument.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Set the working directory.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Human-readable rendering for logs and error messages.
    pub fn display(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|part| part.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured result of a finished command.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// Whether the command exited with status 0.
    pub success: bool,
    /// Exit code, if the process was not killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Stdout followed by stderr, trimmed.
    pub fn combined(&self) -> String {
        let mut text = String::new();
        for part in [self.stdout.trim(), self.stderr.trim()] {
            if part.is_empty() {
                continue;
            }
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(part);
        }
        text
    }
}

/// Runs external commands to completion.
pub trait CommandRunner {
    /// Run `spec` and capture its output.
    ///
    /// Returns an error only when the process could not be started; a non-zero
    /// exit is reported through [`CommandOutput::success`].
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput>;
}

/// [`CommandRunner`] backed by `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        debug!("Running: {}", spec.display());

        let mut command = Command::new(&spec.program);
        command.args(&spec.args);
        if let Some(ref dir) = spec.current_dir {
            command.current_dir(dir);
        }

        let output = command.output().map_err(|e| AppdeskError::Io {
            message: format!("Failed to run {}", spec.display()),
            path: Some(PathBuf::from(&spec.program)),
            source: Some(e),
        })?;

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_spec_display() {
        let spec = CommandSpec::new("sudo")
            .arg("ln")
            .arg("-s")
            .arg("--")
            .arg("/opt/My App.AppImage")
            .arg("/usr/local/bin/myapp");

        assert_eq!(spec.args.len(), 5);
        assert_eq!(
            spec.display(),
            "sudo ln -s -- /opt/My App.AppImage /usr/local/bin/myapp"
        );
    }

    #[test]
    fn test_combined_output() {
        let output = CommandOutput {
            success: false,
            code: Some(1),
            stdout: "extracting\n".to_string(),
            stderr: "  disk full \n".to_string(),
        };
        assert_eq!(output.combined(), "extracting\ndisk full");

        assert_eq!(CommandOutput::default().combined(), "");
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_captures_status() {
        let runner = SystemCommandRunner;

        let ok = runner.run(&CommandSpec::new("sh").arg("-c").arg("echo hi")).unwrap();
        assert!(ok.success);
        assert_eq!(ok.stdout.trim(), "hi");

        let failed = runner.run(&CommandSpec::new("sh").arg("-c").arg("exit 3")).unwrap();
        assert!(!failed.success);
        assert_eq!(failed.code, Some(3));
    }

    #[test]
    fn test_system_runner_missing_program() {
        let runner = SystemCommandRunner;
        let result = runner.run(&CommandSpec::new("appdesk-definitely-not-a-program"));
        assert!(result.is_err());
    }
}

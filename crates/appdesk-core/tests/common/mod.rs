//! Shared fixtures for lifecycle tests.

#![allow(dead_code)]

use appdesk_core::config::BundleConfig;
use appdesk_core::{CommandOutput, CommandRunner, CommandSpec, Layout, Prompter, Result};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::TempDir;

/// One scripted answer.
#[derive(Debug, Clone)]
pub enum Answer {
    Input(&'static str),
    Confirm(bool),
    Select(usize),
}

/// Prompter that replays answers and records every question.
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    pub asked: Vec<String>,
    pub notes: Vec<String>,
    pub select_options: Vec<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn was_asked(&self, message: &str) -> bool {
        self.asked.iter().any(|m| m == message)
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, message: &str) -> Answer {
        self.asked.push(message.to_string());
        self.answers
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted answer for {:?}", message))
    }
}

impl Prompter for ScriptedPrompter {
    fn input(&mut self, message: &str, default: &str) -> Result<String> {
        match self.next(message) {
            Answer::Input("") => Ok(default.to_string()),
            Answer::Input(text) => Ok(text.to_string()),
            other => panic!("expected input answer for {:?}, got {:?}", message, other),
        }
    }

    fn confirm(&mut self, message: &str, _default: bool) -> Result<bool> {
        match self.next(message) {
            Answer::Confirm(yes) => Ok(yes),
            other => panic!("expected confirm answer for {:?}, got {:?}", message, other),
        }
    }

    fn select(&mut self, message: &str, options: &[String]) -> Result<usize> {
        self.select_options.push(options.to_vec());
        match self.next(message) {
            Answer::Select(index) => Ok(index),
            other => panic!("expected select answer for {:?}, got {:?}", message, other),
        }
    }

    fn note(&mut self, message: &str) {
        self.notes.push(message.to_string());
    }
}

/// Behaviour of the fake bundle's `--appimage-extract`.
#[derive(Debug, Clone)]
pub struct FakeAppImage {
    pub create_root: bool,
    pub exit_ok: bool,
    pub root_files: Vec<&'static str>,
    pub calls: Rc<RefCell<Vec<CommandSpec>>>,
}

impl FakeAppImage {
    pub fn with_icons(files: &[&'static str]) -> Self {
        Self {
            create_root: true,
            exit_ok: true,
            root_files: files.to_vec(),
            calls: Rc::default(),
        }
    }
}

impl CommandRunner for FakeAppImage {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        self.calls.borrow_mut().push(spec.clone());

        if spec.args.first().is_some_and(|a| a == BundleConfig::EXTRACT_FLAG) {
            let cwd = spec.current_dir.clone().expect("extraction runs in a work dir");
            if self.create_root {
                let root = cwd.join(BundleConfig::EXTRACT_DIR_NAME);
                fs::create_dir_all(&root).unwrap();
                fs::write(root.join("AppRun"), b"#!/bin/sh\n").unwrap();
                for name in &self.root_files {
                    fs::write(root.join(name), name.as_bytes()).unwrap();
                }
            }
        }

        Ok(CommandOutput {
            success: self.exit_ok,
            code: Some(if self.exit_ok { 0 } else { 1 }),
            stdout: String::new(),
            stderr: String::new(),
        })
    }
}

/// A sandboxed home, bin dir and applications tree.
pub struct TestEnv {
    pub root: TempDir,
    pub layout: Layout,
    pub system_apps: PathBuf,
    pub path_dir: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let root = TempDir::new().unwrap();
        let base = root.path();

        let home = base.join("home");
        let bin_dir = base.join("bin");
        let temp_dir = base.join("tmp");
        let path_dir = base.join("path");
        let system_apps = base.join("usr/share/applications");
        for dir in [&home, &bin_dir, &temp_dir, &path_dir, &system_apps] {
            fs::create_dir_all(dir).unwrap();
        }

        let mut layout = Layout::from_home(&home).with_bin_dir(&bin_dir).with_sudo(false);
        layout.temp_dir = temp_dir;
        layout.search_path = vec![path_dir.clone()];
        layout.category_dirs = vec![system_apps.clone(), layout.applications_dir.clone()];

        Self {
            root,
            layout,
            system_apps,
            path_dir,
        }
    }

    /// Seed the system applications dir with desktop files.
    pub fn with_categories(self, entries: &[(&str, &str)]) -> Self {
        for (name, categories) in entries {
            fs::write(
                self.system_apps.join(format!("{}.desktop", name)),
                format!("[Desktop Entry]\nName={}\nCategories={}\n", name, categories),
            )
            .unwrap();
        }
        self
    }

    /// Create a bundle file and return its path.
    pub fn bundle(&self, file_name: &str) -> PathBuf {
        let dir = self.root.path().join("Apps");
        fs::create_dir_all(&dir).unwrap();
        let bundle = dir.join(file_name);
        fs::write(&bundle, b"\x7fELF fake appimage").unwrap();
        bundle
    }

    /// Put an executable named `name` on the search path.
    pub fn add_path_command(&self, name: &str) -> PathBuf {
        let path = self.path_dir.join(name);
        fs::write(&path, b"#!/bin/sh\n").unwrap();
        appdesk_core::platform::set_executable(&path).unwrap();
        path
    }

    pub fn symlink(&self, command: &str) -> PathBuf {
        self.layout.symlink_path(command)
    }

    pub fn leftover_temp_dirs(&self) -> usize {
        fs::read_dir(&self.layout.temp_dir).unwrap().count()
    }
}

/// Whether `path` exists without following a final symlink.
pub fn exists_no_follow(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

//! appdesk core - headless library for AppImage desktop integration.
//!
//! Registers a bundle with the desktop by linking it onto the command path,
//! extracting it to pick an icon, and writing a desktop entry. Removal undoes
//! the same steps. All user interaction goes through [`Prompter`] and all
//! external processes through [`CommandRunner`], so the library has no
//! terminal dependency of its own.
//!
//! # Example
//!
//! ```rust,ignore
//! use appdesk_core::{Integrator, Layout};
//! use std::path::Path;
//!
//! fn main() -> appdesk_core::Result<()> {
//!     let integrator = Integrator::new(Layout::detect()?);
//!     let mut prompter = MyTerminalPrompter::default();
//!
//!     let report = integrator.install(Path::new("Krita.AppImage"), &mut prompter)?;
//!     println!("Desktop entry created: {}", report.desktop_entry_path.display());
//!
//!     integrator.remove(Path::new("Krita.AppImage"))?;
//!     Ok(())
//! }
//! ```

pub mod categories;
pub mod config;
pub mod error;
pub mod extract;
pub mod lifecycle;
pub mod naming;
pub mod platform;
pub mod process;
pub mod prompt;
pub mod records;
pub mod shortcut;
pub mod symlink;

// Re-export commonly used types
pub use categories::collect_categories;
pub use config::Layout;
pub use error::{AppdeskError, Result};
pub use lifecycle::{InstallReport, Integrator, RemoveReport};
pub use process::{CommandOutput, CommandRunner, CommandSpec, SystemCommandRunner};
pub use prompt::Prompter;
pub use records::{InstallRecord, InstallRecordStore};
pub use shortcut::DesktopEntry;

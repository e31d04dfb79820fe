//! Platform abstraction layer.
//!
//! All `#[cfg]` blocks for OS-specific behavior live here rather than being
//! scattered through the lifecycle code.
//!
//! - `paths` - command lookup on the search path
//! - `permissions` - executable bits and privilege checks

pub mod paths;
pub mod permissions;

pub use paths::find_in_path;
pub use permissions::{is_executable, is_root, set_executable};

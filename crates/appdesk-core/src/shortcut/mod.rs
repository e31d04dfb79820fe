//! Desktop entry and icon handling.
//!
//! - Application menu entries (`.desktop` files in `~/.local/share/applications`)
//! - Icon discovery in an extracted bundle and installation to `~/.local/share/icons`

mod desktop_entry;
mod icon;

pub use desktop_entry::{DesktopEntry, DesktopEntryBuilder};
pub use icon::{find_icons, IconManager};

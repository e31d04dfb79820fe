//! List the desktop categories a new entry could use.

use appdesk_core::{collect_categories, Layout, Result};

fn main() -> Result<()> {
    let layout = Layout::detect()?;

    println!("Scanning:");
    for dir in &layout.category_dirs {
        println!("  - {}", dir.display());
    }

    let categories = collect_categories(&layout.category_dirs);
    if categories.is_empty() {
        println!("No categories found.");
    } else {
        println!("Found {} categories:", categories.len());
        for category in categories {
            println!("  - {}", category);
        }
    }

    Ok(())
}

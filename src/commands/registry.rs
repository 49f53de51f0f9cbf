//! `pythia registry sync`: rebuild registry rows from the documents on disk.

use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use std::path::Path;

use crate::commands::common::open_layout;
use crate::fs::registry::sync_registry;
use crate::utils::display_path;

pub fn sync(project_root: &Path) -> Result<()> {
    let layout = open_layout(project_root)?;
    let rows = sync_registry(&layout, Utc::now().date_naive())?;

    println!(
        "{} Synced {} work item(s) into {}",
        "✓".green(),
        rows,
        display_path(layout.registry_path(), project_root).cyan()
    );
    Ok(())
}

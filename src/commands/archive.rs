//! `pythia archive`: move completed work items into the archive.

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::commands::common::open_layout;
use crate::fs::archive::{archive_completed, ArchiveOptions};
use crate::utils::display_path;

pub fn execute(project_root: &Path, dry_run: bool, min_age_days: Option<i64>) -> Result<()> {
    let layout = open_layout(project_root)?;
    let report = archive_completed(
        &layout,
        &ArchiveOptions {
            dry_run,
            min_age_days,
        },
    )?;

    let verb = if report.dry_run {
        "Would archive"
    } else {
        "Archived"
    };
    for id in &report.archived {
        println!("{} {} {}", "✓".green(), verb, id.cyan());
    }
    for (id, reason) in &report.skipped {
        println!("{} Skipped {}: {}", "ℹ".blue(), id.cyan(), reason.dimmed());
    }
    for path in &report.references_updated {
        println!(
            "  {} updated links in {}",
            "→".dimmed(),
            display_path(path, project_root)
        );
    }

    if report.archived.is_empty() && report.skipped.is_empty() {
        println!("{} No completed work items to archive", "ℹ".blue());
    }
    Ok(())
}

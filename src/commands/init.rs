//! `pythia init`: create the documentation tree.

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::fs::docs_dir::DocsLayout;
use crate::utils::display_path;

pub fn execute(project_root: &Path) -> Result<()> {
    let layout = DocsLayout::discover(project_root)?;
    let created = layout.initialize()?;

    if created.is_empty() {
        println!(
            "{} {} already initialized",
            "ℹ".blue(),
            display_path(layout.root(), project_root)
        );
        return Ok(());
    }

    for path in &created {
        println!(
            "  {} {}",
            "+".green(),
            display_path(path, project_root).dimmed()
        );
    }
    println!(
        "{} Initialized {}",
        "✓".green(),
        display_path(layout.root(), project_root).cyan()
    );

    Ok(())
}

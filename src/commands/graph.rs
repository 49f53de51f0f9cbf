//! `pythia graph`: print or rewrite the dependency diagram.

use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use std::path::Path;

use crate::commands::common::open_layout;
use crate::fs::item_files::scan_items;
use crate::graph::{find_cycles, render_dependencies_graph, update_dependencies_graph};
use crate::utils::display_path;

/// Print the diagram without touching the report.
pub fn show(project_root: &Path) -> Result<()> {
    let layout = open_layout(project_root)?;
    let scan = scan_items(&layout, Utc::now().date_naive())?;
    let items = scan.work_items();

    print!("{}", render_dependencies_graph(&items));
    for cycle in find_cycles(&items) {
        eprintln!("{} dependency cycle: {}", "⚠".yellow(), cycle.join(" → "));
    }
    Ok(())
}

/// Regenerate the diagram inside the report file.
pub fn write(project_root: &Path) -> Result<()> {
    let layout = open_layout(project_root)?;
    let summary = update_dependencies_graph(&layout, Utc::now().date_naive())?;

    println!(
        "{} Updated {} ({} nodes, {} edges)",
        "✓".green(),
        display_path(layout.report_path(), project_root).cyan(),
        summary.nodes,
        summary.edges
    );
    for path in &summary.skipped {
        println!(
            "  {} skipped {}",
            "⚠".yellow(),
            display_path(path, project_root).dimmed()
        );
    }
    for cycle in &summary.cycles {
        println!("  {} dependency cycle: {}", "⚠".yellow(), cycle.join(" → "));
    }
    Ok(())
}

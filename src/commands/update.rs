//! `pythia update <id> <status>`: run a status change through the pipeline.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use crate::commands::common::{colored_status, open_layout};
use crate::validation::parse_status_arg;
use crate::verify::{update_work_item_status, StatusUpdateRequest};

pub fn execute(
    project_root: &Path,
    item_id: String,
    status: String,
    reason: Option<String>,
    approve: bool,
) -> Result<()> {
    let layout = open_layout(project_root)?;

    let request = StatusUpdateRequest {
        new_status: parse_status_arg(&status).context("Failed to update status")?,
        item_id,
        reason,
        approved: approve,
    };
    let update = update_work_item_status(&layout, &request).context("Failed to update status")?;

    println!(
        "{} {}: {} → {}",
        "✓".green(),
        update.item.id.cyan(),
        colored_status(update.previous),
        colored_status(update.item.status)
    );
    if let Some(reason) = &request.reason {
        println!("  {} {}", "reason:".dimmed(), reason);
    }
    for cycle in &update.graph.cycles {
        println!(
            "  {} dependency cycle: {}",
            "⚠".yellow(),
            cycle.join(" → ")
        );
    }

    Ok(())
}

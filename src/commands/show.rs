//! `pythia show <id>`: print one work item and its status history.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use colored::Colorize;
use std::path::Path;

use crate::commands::common::{colored_status, open_layout};
use crate::fs::item_files::load_item;
use crate::fs::status_log::read_item_log;

pub fn execute(project_root: &Path, item_id: String, json: bool) -> Result<()> {
    let layout = open_layout(project_root)?;
    let today = Utc::now().date_naive();

    let Some(item) = load_item(&layout, &item_id, today)? else {
        bail!("Work item not found: {item_id}");
    };

    if json {
        let output =
            serde_json::to_string_pretty(&item).context("Failed to serialize work item")?;
        println!("{output}");
        return Ok(());
    }

    println!("{} {}", item.id.cyan().bold(), item.title.bold());
    println!("{}", "─".repeat(60).dimmed());
    println!("  {:14} {}", "Type:", item.item_type);
    println!("  {:14} {}", "Status:", colored_status(item.status));
    if let Some(reason) = &item.status_reason {
        println!("  {:14} {}", "Reason:", reason);
    }
    if let Some(priority) = item.priority {
        println!("  {:14} {}", "Priority:", priority);
    }
    if let Some(complexity) = item.complexity {
        println!("  {:14} {}", "Complexity:", complexity);
    }
    if let Some(owner) = &item.owner {
        println!("  {:14} {}", "Owner:", owner);
    }
    println!("  {:14} {}", "Created:", item.created_at);
    println!("  {:14} {}", "Last Updated:", item.last_updated);

    for (label, ids) in [
        ("Dependencies:", &item.dependencies),
        ("Blocked By:", &item.blocked_by),
        ("Blocks:", &item.blocks),
    ] {
        if !ids.is_empty() {
            println!("  {:14} {}", label, ids.join(", "));
        }
    }

    let history = read_item_log(&layout, &item.id)?;
    if !history.is_empty() {
        println!("\n{}", "History".bold());
        for line in history {
            println!("  {} {}", "→".dimmed(), line);
        }
    }

    Ok(())
}

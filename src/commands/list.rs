//! `pythia list`: tabulate work items on disk.

use anyhow::{Context, Result};
use chrono::Utc;
use colored::Colorize;
use std::path::Path;

use crate::commands::common::{colored_status_padded, open_layout};
use crate::fs::item_files::scan_items;
use crate::models::{WorkItem, WorkItemType};
use crate::utils::truncate;
use crate::validation::parse_status_arg;

pub fn execute(
    project_root: &Path,
    item_type: Option<String>,
    status: Option<String>,
    json: bool,
) -> Result<()> {
    let layout = open_layout(project_root)?;
    let today = Utc::now().date_naive();

    let item_type = item_type.map(|t| t.parse::<WorkItemType>()).transpose()?;
    let status = status.map(|s| parse_status_arg(&s)).transpose()?;

    let scan = scan_items(&layout, today)?;
    let items: Vec<WorkItem> = scan
        .work_items()
        .into_iter()
        .filter(|i| item_type.is_none_or(|t| i.item_type == t))
        .filter(|i| status.is_none_or(|s| i.status == s))
        .collect();

    if json {
        let output =
            serde_json::to_string_pretty(&items).context("Failed to serialize work items")?;
        println!("{output}");
        return Ok(());
    }

    if items.is_empty() {
        println!("{} No work items found", "ℹ".blue());
        return Ok(());
    }

    println!(
        "{:32} {:36} {:14} {:8} {:12}",
        "ID".bold(),
        "TITLE".bold(),
        "STATUS".bold(),
        "PRIORITY".bold(),
        "OWNER".bold()
    );
    println!("{}", "─".repeat(106));

    for item in &items {
        println!(
            "{:32} {:36} {} {:8} {:12}",
            truncate(&item.id, 32).cyan(),
            truncate(&item.title, 36),
            colored_status_padded(item.status, 14),
            item.priority.map(|p| p.as_str()).unwrap_or("-"),
            item.owner.as_deref().unwrap_or("-")
        );
    }

    if !scan.skipped.is_empty() {
        println!(
            "\n{} {} document(s) could not be parsed",
            "⚠".yellow(),
            scan.skipped.len()
        );
    }

    Ok(())
}

//! Active work items registry (`status.md`).
//!
//! The registry holds one table per work-item type plus a metrics section.
//! Every update is a full read, in-memory edit, and whole-file rewrite.

mod metrics;


use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use tracing::debug;

use crate::fs::docs_dir::DocsLayout;
use crate::fs::item_files::{load_item, load_item_from_path, scan_items};
use crate::fs::locking::{locked_read, locked_write};
use crate::models::{Level, WorkItem, WorkItemStatus, WorkItemType};
use crate::parser::markdown::{is_separator_row, table_cells, SectionedDocument};

pub use metrics::WorkItemMetrics;

pub const METRICS_SECTION: &str = "Work Item Metrics";
pub const GRAPH_SECTION: &str = "Dependencies Graph";
pub const NEXT_ACTIONS_SECTION: &str = "Next Actions";

/// Canonical section order. Sections not listed here are dropped on rewrite.
pub const REGISTRY_SECTIONS: [&str; 7] = [
    "Active Tasks",
    "Active Proposals",
    "Active Explorations",
    "New Ideas",
    METRICS_SECTION,
    GRAPH_SECTION,
    NEXT_ACTIONS_SECTION,
];

pub const TABLE_HEADER: &str = "| ID | Title | Status | Priority | Owner | Last Updated |";
pub const TABLE_SEPARATOR: &str = "| --- | --- | --- | --- | --- | --- |";
const TABLE_MARKER: &str = "| ID | Title |";
const EMPTY_CELL: &str = "-";

/// Reflect one work item's current state into the registry.
///
/// `today` is the reference date for metrics that need one.
pub fn update_registry(layout: &DocsLayout, item: &WorkItem, today: NaiveDate) -> Result<()> {
    rewrite_registry(layout, std::slice::from_ref(item), today)
        .context("Failed to update Active Work Items Registry")
}

/// Upsert every work item on disk into the registry in one rewrite.
/// Returns the number of rows written.
pub fn sync_registry(layout: &DocsLayout, today: NaiveDate) -> Result<usize> {
    let scan = scan_items(layout, today)?;
    let items = scan.work_items();
    rewrite_registry(layout, &items, today).context("Failed to update Active Work Items Registry")?;
    Ok(items.len())
}

fn rewrite_registry(layout: &DocsLayout, items: &[WorkItem], today: NaiveDate) -> Result<()> {
    let path = layout.registry_path();
    if !path.exists() {
        bail!("Registry file not found: {}", path.display());
    }

    let content = locked_read(path)?;
    let mut doc = SectionedDocument::parse(&content);

    for item in items {
        upsert_item(&mut doc, item)?;
    }

    let rows = registry_rows(&doc);
    let metrics = WorkItemMetrics::compute(&rows, |row| {
        completed_item(layout, row, today)
            .map(|item| (item.last_updated - item.created_at).num_days())
    });
    doc.upsert(METRICS_SECTION, metrics.render());

    debug!(rows = rows.len(), path = %path.display(), "rewriting registry");
    locked_write(path, &doc.render_ordered(&REGISTRY_SECTIONS))
}

/// The document behind a finished row, looked up in the archive when it has
/// already been moved there.
fn completed_item(layout: &DocsLayout, row: &RegistryRow, today: NaiveDate) -> Option<WorkItem> {
    if let Ok(Some(item)) = load_item(layout, &row.id, today) {
        return Some(item);
    }
    let archived = layout
        .archive_type_dir(row.item_type)
        .join(format!("{}.md", row.id));
    archived
        .is_file()
        .then(|| load_item_from_path(&archived, today).ok())
        .flatten()
}

fn upsert_item(doc: &mut SectionedDocument, item: &WorkItem) -> Result<()> {
    let section_name = item.item_type.registry_section();
    let Some(section) = doc.get_mut(section_name) else {
        bail!("Invalid section for item type: {} (missing '{section_name}')", item.item_type);
    };
    section.text = upsert_row(&section.text, section_name, item)?;
    Ok(())
}

/// Replace the item's row in the section's table, or insert it directly
/// below the header so the newest rows come first.
fn upsert_row(section_text: &str, section_name: &str, item: &WorkItem) -> Result<String> {
    let mut lines: Vec<String> = section_text.lines().map(str::to_string).collect();

    let Some(header_idx) = lines.iter().position(|l| l.contains(TABLE_MARKER)) else {
        bail!("Table not found in section: {section_name}");
    };

    let row = format_row(item);
    let existing = lines
        .iter()
        .enumerate()
        .skip(header_idx + 1)
        .take_while(|(_, l)| l.trim_start().starts_with('|'))
        .find(|(_, l)| row_id(l).as_deref() == Some(item.id.as_str()))
        .map(|(idx, _)| idx);

    match existing {
        Some(idx) => lines[idx] = row,
        None => {
            let has_separator = lines
                .get(header_idx + 1)
                .is_some_and(|l| is_separator_row(l));
            let insert_at = if has_separator { header_idx + 2 } else { header_idx + 1 };
            lines.insert(insert_at.min(lines.len()), row);
        }
    }

    Ok(lines.join("\n"))
}

pub fn format_row(item: &WorkItem) -> String {
    format!(
        "| {} | {} | {} | {} | {} | {} |",
        item.id,
        item.title.replace('|', "/"),
        item.status,
        item.priority.map(|p| p.as_str()).unwrap_or(EMPTY_CELL),
        item.owner.as_deref().unwrap_or(EMPTY_CELL),
        item.last_updated.format("%Y-%m-%d"),
    )
}

fn row_id(line: &str) -> Option<String> {
    if is_separator_row(line) {
        return None;
    }
    table_cells(line)?.into_iter().next()
}

/// One row of a registry table as displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryRow {
    pub item_type: WorkItemType,
    pub id: String,
    pub title: String,
    pub status: Option<WorkItemStatus>,
    pub priority: Option<Level>,
    pub owner: Option<String>,
    pub last_updated: String,
}

/// Every data row from the per-type tables.
pub fn registry_rows(doc: &SectionedDocument) -> Vec<RegistryRow> {
    let mut rows = Vec::new();

    for item_type in WorkItemType::all() {
        let Some(section) = doc.get(item_type.registry_section()) else {
            continue;
        };
        let mut in_table = false;
        for line in section.text.lines() {
            if line.contains(TABLE_MARKER) {
                in_table = true;
                continue;
            }
            if !in_table || is_separator_row(line) {
                continue;
            }
            let Some(cells) = table_cells(line) else {
                in_table = false;
                continue;
            };
            if let Some(row) = parse_row(*item_type, &cells) {
                rows.push(row);
            }
        }
    }

    rows
}

fn parse_row(item_type: WorkItemType, cells: &[String]) -> Option<RegistryRow> {
    let id = cells.first().filter(|c| !c.is_empty())?.clone();
    let cell = |idx: usize| {
        cells
            .get(idx)
            .filter(|c| !c.is_empty() && c.as_str() != EMPTY_CELL)
            .cloned()
    };

    Some(RegistryRow {
        item_type,
        id,
        title: cell(1).unwrap_or_default(),
        status: cell(2).and_then(|s| s.parse().ok()),
        priority: cell(3).and_then(|p| p.parse().ok()),
        owner: cell(4),
        last_updated: cell(5).unwrap_or_default(),
    })
}

/// Registry content for a freshly initialised docs tree.
pub fn registry_skeleton() -> String {
    let mut doc = SectionedDocument {
        preamble: "# Active Work Items Registry".to_string(),
        sections: Vec::new(),
    };
    for item_type in WorkItemType::all() {
        let name = item_type.registry_section();
        doc.upsert(
            name,
            format!("## {name}\n\n{TABLE_HEADER}\n{TABLE_SEPARATOR}"),
        );
    }
    doc.upsert(METRICS_SECTION, WorkItemMetrics::default().render());
    doc.upsert(GRAPH_SECTION, format!("## {GRAPH_SECTION}"));
    doc.upsert(
        NEXT_ACTIONS_SECTION,
        format!("## {NEXT_ACTIONS_SECTION}\n\n- Review blocked items"),
    );
    doc.render_ordered(&REGISTRY_SECTIONS)
}

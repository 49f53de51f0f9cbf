//! Loading, saving, and scanning work-item documents on disk.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::fs::docs_dir::DocsLayout;
use crate::fs::locking::{locked_read, locked_write};
use crate::models::{WorkItem, WorkItemType};
use crate::parser::{parse_work_item, serialize_work_item};

/// Locate the document for `id`.
///
/// The directory implied by the id prefix (`task-` -> `tasks/`) is checked
/// first, then the remaining type directories.
pub fn find_item_file(layout: &DocsLayout, id: &str) -> Option<PathBuf> {
    let preferred = WorkItemType::from_id(id);
    let candidates = preferred
        .into_iter()
        .chain(
            WorkItemType::all()
                .iter()
                .copied()
                .filter(|t| Some(*t) != preferred),
        );

    for item_type in candidates {
        let path = layout.item_path(item_type, id);
        if path.is_file() {
            return Some(path);
        }
    }
    None
}

/// Load a work item by id. `Ok(None)` when no document exists.
pub fn load_item(layout: &DocsLayout, id: &str, today: NaiveDate) -> Result<Option<WorkItem>> {
    match find_item_file(layout, id) {
        Some(path) => load_item_from_path(&path, today).map(Some),
        None => Ok(None),
    }
}

/// Parse the document at `path`; the id is the file stem.
pub fn load_item_from_path(path: &Path, today: NaiveDate) -> Result<WorkItem> {
    let id = item_id_from_path(path)?;
    let content = locked_read(path)?;
    parse_work_item(&content, &id, today)
        .with_context(|| format!("Failed to parse work item: {}", path.display()))
}

pub fn save_item(path: &Path, item: &WorkItem) -> Result<()> {
    locked_write(path, &serialize_work_item(item))
        .with_context(|| format!("Failed to save work item: {}", item.id))
}

fn item_id_from_path(path: &Path) -> Result<String> {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .with_context(|| format!("Not a work item file: {}", path.display()))
}

#[derive(Debug, Clone)]
pub struct ScannedItem {
    pub path: PathBuf,
    pub item: WorkItem,
}

/// Every readable work item, plus the files that could not be parsed.
#[derive(Debug, Clone, Default)]
pub struct ItemScan {
    pub items: Vec<ScannedItem>,
    pub skipped: Vec<PathBuf>,
}

impl ItemScan {
    pub fn work_items(&self) -> Vec<WorkItem> {
        self.items.iter().map(|s| s.item.clone()).collect()
    }
}

/// Scan the four type directories in fixed order, files sorted by name.
///
/// The type is taken from the directory, not the document. Malformed
/// documents are skipped with a warning rather than failing the scan.
pub fn scan_items(layout: &DocsLayout, today: NaiveDate) -> Result<ItemScan> {
    let mut scan = ItemScan::default();

    for item_type in WorkItemType::all() {
        let dir = layout.type_dir(*item_type);
        if !dir.is_dir() {
            continue;
        }

        let mut files: Vec<PathBuf> = fs::read_dir(&dir)
            .with_context(|| format!("Failed to read directory: {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "md"))
            .collect();
        files.sort();

        for path in files {
            match load_item_from_path(&path, today) {
                Ok(mut item) => {
                    item.item_type = *item_type;
                    scan.items.push(ScannedItem { path, item });
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %format!("{e:#}"), "skipping malformed work item");
                    scan.skipped.push(path);
                }
            }
        }
    }

    Ok(scan)
}

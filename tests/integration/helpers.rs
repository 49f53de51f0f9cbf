//! Shared test helpers for status pipeline integration tests

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::fs;
use tempfile::TempDir;

use pythia::fs::{save_item, Config, DocsLayout};
use pythia::models::{WorkItem, WorkItemStatus, WorkItemType};

/// Test helper: Create an initialised docs tree with default config
pub fn init_docs_tree() -> (TempDir, DocsLayout) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let layout = DocsLayout::new(temp_dir.path(), &Config::default());
    layout.initialize().expect("Failed to initialize docs tree");
    (temp_dir, layout)
}

/// Fixed clock used by all scenarios
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 18, 14, 5, 30).unwrap()
}

pub fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
}

/// Test helper: Write a work item document of the type implied by its id
pub fn write_item(layout: &DocsLayout, id: &str, title: &str, status: WorkItemStatus) -> WorkItem {
    let item_type = WorkItemType::from_id(id).expect("id must carry a type prefix");
    let mut item = WorkItem::new(id, title, item_type, status, date(10));
    item.created_at = date(1);
    save_work_item(layout, &item);
    item
}

pub fn save_work_item(layout: &DocsLayout, item: &WorkItem) {
    save_item(&layout.item_path(item.item_type, &item.id), item)
        .expect("Failed to write work item");
}

pub fn read(path: &std::path::Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()))
}

/// The registry table row for `id`, if present
pub fn registry_row(layout: &DocsLayout, id: &str) -> Option<String> {
    read(layout.registry_path())
        .lines()
        .find(|l| l.starts_with(&format!("| {id} |")))
        .map(str::to_string)
}

//! Append-only audit trail of status changes.
//!
//! Each change is appended to `<log_dir>/<id>.log` and recorded under a
//! `## [YYYY-MM-DD]` heading in the changelog. Existing entries are never
//! rewritten or removed.

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fs;
use std::path::PathBuf;

use crate::fs::docs_dir::DocsLayout;
use crate::fs::locking::{locked_append, locked_read_or_empty, locked_write};
use crate::models::WorkItemStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub item_id: String,
    pub from: WorkItemStatus,
    pub to: WorkItemStatus,
    pub reason: Option<String>,
}

pub fn log_status_change(layout: &DocsLayout, change: &StatusChange, at: DateTime<Utc>) -> Result<()> {
    record(layout, change, at).context("Failed to log status change")
}

fn record(layout: &DocsLayout, change: &StatusChange, at: DateTime<Utc>) -> Result<()> {
    let log_dir = layout.log_dir();
    fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    locked_append(&item_log_path(layout, &change.item_id), &format_log_entry(change, at))?;

    let changelog = layout.changelog_path();
    if let Some(parent) = changelog.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let content = locked_read_or_empty(changelog)?;
    let date = at.format("%Y-%m-%d").to_string();
    let updated = insert_changelog_entry(&content, &date, &format_changelog_entry(change));
    locked_write(changelog, &updated).context("Failed to update changelog")
}

pub fn item_log_path(layout: &DocsLayout, item_id: &str) -> PathBuf {
    layout.log_dir().join(format!("{item_id}.log"))
}

/// Previously logged lines for an item, oldest first.
pub fn read_item_log(layout: &DocsLayout, item_id: &str) -> Result<Vec<String>> {
    let content = locked_read_or_empty(&item_log_path(layout, item_id))?;
    Ok(content.lines().map(str::to_string).collect())
}

fn format_log_entry(change: &StatusChange, at: DateTime<Utc>) -> String {
    let timestamp = at.to_rfc3339_opts(SecondsFormat::Millis, true);
    let reason = change
        .reason
        .as_ref()
        .map(|r| format!(" (Reason: {r})"))
        .unwrap_or_default();
    format!(
        "[{timestamp}] {}: {} -> {}{reason}\n",
        change.item_id, change.from, change.to
    )
}

fn format_changelog_entry(change: &StatusChange) -> String {
    let reason = change
        .reason
        .as_ref()
        .map(|r| format!(" ({r})"))
        .unwrap_or_default();
    format!(
        "- [{}] Status changed from {} to {}{reason}",
        change.item_id, change.from, change.to
    )
}

/// Put `entry` first under the `## [date]` heading, creating the heading at
/// the top of the file when this is the first change of the day.
fn insert_changelog_entry(content: &str, date: &str, entry: &str) -> String {
    let header = format!("## [{date}]");
    let mut lines: Vec<&str> = content.split('\n').collect();

    match lines.iter().position(|l| l.starts_with(&header)) {
        Some(idx) => {
            let at = (idx + 2).min(lines.len());
            lines.insert(at, entry);
            lines.join("\n")
        }
        None => format!("{header}\n\n{entry}\n\n{content}"),
    }
}

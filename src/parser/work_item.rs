//! Line-oriented reader and writer for work-item documents.
//!
//! A document is a `# Title` line followed by `Key: value` metadata lines and
//! optional `Dependencies:` / `Blocked By:` / `Blocks:` bullet lists. Writing
//! reserializes the structured record; free-form lines are not preserved.

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use regex::Regex;
use tracing::warn;

use crate::models::{Level, WorkItem, WorkItemStatus, WorkItemType};

pub const DEPENDENCIES_HEADING: &str = "Dependencies";
pub const BLOCKED_BY_HEADING: &str = "Blocked By";
pub const BLOCKS_HEADING: &str = "Blocks";

/// Parse a work-item document. `today` fills in missing dates.
///
/// Only the title, `Status:` and `Type:` are required. An unreadable date or
/// level is logged and treated as absent so the item still takes part in
/// scans and the dependency graph.
pub fn parse_work_item(content: &str, id: &str, today: NaiveDate) -> Result<WorkItem> {
    let title = extract_title(content);
    let status = extract_field(content, "Status")?;
    let item_type = extract_field(content, "Type")?;

    let (Some(title), Some(status), Some(item_type)) = (title, status, item_type) else {
        return Err(anyhow!(
            "Invalid work item format: missing required fields"
        ));
    };

    let status: WorkItemStatus = status.parse()?;
    let item_type: WorkItemType = item_type.parse()?;

    let last_updated = optional_date(content, id, "Last Updated")?.unwrap_or(today);
    let created_at = optional_date(content, id, "Created")?.unwrap_or(today);
    let priority = optional_level(content, id, "Priority")?;
    let complexity = optional_level(content, id, "Complexity")?;

    Ok(WorkItem {
        id: id.to_string(),
        title,
        item_type,
        status,
        priority,
        complexity,
        owner: extract_field(content, "Owner")?,
        dependencies: extract_list(content, DEPENDENCIES_HEADING),
        blocked_by: extract_list(content, BLOCKED_BY_HEADING),
        blocks: extract_list(content, BLOCKS_HEADING),
        last_updated,
        created_at,
        status_reason: extract_field(content, "Status Reason")?,
    })
}

/// Render a work item back to its document form.
pub fn serialize_work_item(item: &WorkItem) -> String {
    let mut out = format!(
        "# {}\n\nType: {}\nStatus: {}\nLast Updated: {}\nCreated: {}\n",
        item.title,
        item.item_type,
        item.status,
        format_date(item.last_updated),
        format_date(item.created_at),
    );

    if let Some(priority) = item.priority {
        out.push_str(&format!("Priority: {priority}\n"));
    }
    if let Some(complexity) = item.complexity {
        out.push_str(&format!("Complexity: {complexity}\n"));
    }
    if let Some(owner) = &item.owner {
        out.push_str(&format!("Owner: {owner}\n"));
    }
    if let Some(reason) = &item.status_reason {
        out.push_str(&format!("Status Reason: {reason}\n"));
    }

    for (heading, ids) in [
        (DEPENDENCIES_HEADING, &item.dependencies),
        (BLOCKED_BY_HEADING, &item.blocked_by),
        (BLOCKS_HEADING, &item.blocks),
    ] {
        if ids.is_empty() {
            continue;
        }
        out.push_str(&format!("\n{heading}:\n"));
        for id in ids {
            out.push_str(&format!("- {id}\n"));
        }
    }

    out
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Accepts `YYYY-MM-DD`, ignoring any trailing time component.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let day = value
        .trim()
        .split(|c: char| c == 'T' || c.is_whitespace())
        .next()
        .unwrap_or_default();
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .with_context(|| format!("Expected YYYY-MM-DD, got '{value}'"))
}

fn optional_date(content: &str, id: &str, key: &str) -> Result<Option<NaiveDate>> {
    let Some(value) = extract_field(content, key)? else {
        return Ok(None);
    };
    match parse_date(&value) {
        Ok(date) => Ok(Some(date)),
        Err(e) => {
            warn!(item = id, field = key, error = %e, "ignoring unreadable date");
            Ok(None)
        }
    }
}

fn optional_level(content: &str, id: &str, key: &str) -> Result<Option<Level>> {
    let Some(value) = extract_field(content, key)? else {
        return Ok(None);
    };
    match value.parse::<Level>() {
        Ok(level) => Ok(Some(level)),
        Err(e) => {
            warn!(item = id, field = key, error = %e, "ignoring unknown level");
            Ok(None)
        }
    }
}

fn extract_title(content: &str) -> Option<String> {
    content
        .lines()
        .find_map(|line| line.strip_prefix("# "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Value of the first `Key: value` line, if any.
pub fn extract_field(content: &str, key: &str) -> Result<Option<String>> {
    let pattern = format!(r"(?m)^{}:[ \t]*(.+?)[ \t]*$", regex::escape(key));
    let re = Regex::new(&pattern).with_context(|| format!("Invalid field pattern: {key}"))?;
    Ok(re
        .captures(content)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim_end_matches('\r').to_string())
        .filter(|v| !v.is_empty()))
}

/// Ids listed under a `Heading:` line as `- id` bullets.
///
/// An inline comma-separated value (`Blocks: a, b`) is accepted as well.
pub fn extract_list(content: &str, heading: &str) -> Vec<String> {
    let mut lines = content.lines();

    while let Some(line) = lines.next() {
        let Some(rest) = line.trim().strip_prefix(heading) else {
            continue;
        };
        let Some(inline) = rest.strip_prefix(':') else {
            continue;
        };

        let inline = inline.trim();
        if !inline.is_empty() {
            return inline
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty() && !is_placeholder(id))
                .map(str::to_string)
                .collect();
        }

        let mut ids = Vec::new();
        for line in lines.by_ref() {
            let trimmed = line.trim();
            if trimmed.is_empty() && ids.is_empty() {
                continue;
            }
            match trimmed.strip_prefix("- ") {
                Some(id) if !is_placeholder(id.trim()) => ids.push(id.trim().to_string()),
                Some(_) => {}
                None => break,
            }
        }
        return ids;
    }

    Vec::new()
}

fn is_placeholder(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "none" | "-" | "n/a")
}

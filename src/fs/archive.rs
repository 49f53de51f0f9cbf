//! Archiving of completed work items.
//!
//! An archived item goes through the normal status pipeline to `Archived`,
//! then its document moves under the archive directory and markdown links
//! elsewhere in the docs tree are pointed at the new location.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use glob::glob;
use regex::{Captures, Regex};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::fs::docs_dir::DocsLayout;
use crate::fs::item_files::{scan_items, ScannedItem};
use crate::fs::locking::{locked_read, locked_write};
use crate::graph::update_dependencies_graph;
use crate::models::{TransitionError, WorkItem, WorkItemStatus};
use crate::parser::work_item::format_date;
use crate::verify::{
    update_work_item_status_at, validate_transition_rules, validate_work_item_status,
    StatusUpdateRequest,
};

/// Documents carrying either marker are never archived
const NO_ARCHIVE_MARKERS: [&str; 2] = ["no-archive", "NO_ARCHIVE"];

const ARCHIVED_SUFFIX: &str = " (Archived)";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveOptions {
    /// Report what would happen without touching any file
    pub dry_run: bool,
    /// Only archive items whose `Last Updated` is at least this many days old
    pub min_age_days: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveReport {
    pub archived: Vec<String>,
    /// `(id, reason)` for completed items that were left in place
    pub skipped: Vec<(String, String)>,
    pub references_updated: Vec<PathBuf>,
    pub dry_run: bool,
}

pub fn archive_completed(layout: &DocsLayout, options: &ArchiveOptions) -> Result<ArchiveReport> {
    archive_completed_at(layout, options, Utc::now())
}

/// Archive every eligible `Completed` item as of `now`.
pub fn archive_completed_at(
    layout: &DocsLayout,
    options: &ArchiveOptions,
    now: DateTime<Utc>,
) -> Result<ArchiveReport> {
    let today = now.date_naive();
    let mut report = ArchiveReport {
        dry_run: options.dry_run,
        ..ArchiveReport::default()
    };

    let scan = scan_items(layout, today)?;
    let completed = scan
        .items
        .into_iter()
        .filter(|s| s.item.status == WorkItemStatus::Completed);

    for scanned in completed {
        let id = scanned.item.id.clone();
        if let Some(reason) = skip_reason(layout, &scanned, options, now)? {
            debug!(item = %id, reason = %reason, "not archiving");
            report.skipped.push((id, reason));
            continue;
        }

        if options.dry_run {
            report.archived.push(id);
            continue;
        }

        let request = StatusUpdateRequest::new(id.as_str(), WorkItemStatus::Archived);
        let update = match update_work_item_status_at(layout, &request, now) {
            Ok(update) => update,
            Err(e) => match e.downcast_ref::<TransitionError>() {
                Some(rejection) => {
                    report.skipped.push((id, rejection.to_string()));
                    continue;
                }
                None => return Err(e),
            },
        };

        move_to_archive(layout, &scanned.path, &update.item, now)?;
        for path in rewrite_references(layout, &update.item)? {
            if !report.references_updated.contains(&path) {
                report.references_updated.push(path);
            }
        }
        info!(item = %id, "archived work item");
        report.archived.push(id);
    }

    if !options.dry_run && !report.archived.is_empty() {
        update_dependencies_graph(layout, today)?;
    }

    Ok(report)
}

fn skip_reason(
    layout: &DocsLayout,
    scanned: &ScannedItem,
    options: &ArchiveOptions,
    now: DateTime<Utc>,
) -> Result<Option<String>> {
    let content = locked_read(&scanned.path)?;
    if NO_ARCHIVE_MARKERS.iter().any(|m| content.contains(m)) {
        return Ok(Some("tagged no-archive".to_string()));
    }

    let item = &scanned.item;
    if let Some(min_age) = options.min_age_days {
        let age = (now.date_naive() - item.last_updated).num_days();
        if age < min_age {
            return Ok(Some(format!("completed {age} days ago, needs {min_age}")));
        }
    }

    let validation = validate_work_item_status(item, WorkItemStatus::Archived, None, false)
        .and_then(|()| {
            if layout.strict_transitions() {
                validate_transition_rules(item, WorkItemStatus::Archived)
            } else {
                Ok(())
            }
        });
    Ok(validation.err().map(|e| e.to_string()))
}

/// Move the document under the archive directory and append an archive note.
fn move_to_archive(
    layout: &DocsLayout,
    source: &Path,
    item: &WorkItem,
    now: DateTime<Utc>,
) -> Result<PathBuf> {
    let dir = layout.archive_type_dir(item.item_type);
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create archive directory: {}", dir.display()))?;

    let target = dir.join(format!("{}.md", item.id));
    let mut content = locked_read(source)?;
    if !content.ends_with('\n') {
        content.push('\n');
    }
    content.push_str(&format!(
        "\n## Archive Note\n\nArchived on {} after completion.\n",
        format_date(now.date_naive())
    ));

    locked_write(&target, &content)?;
    fs::remove_file(source)
        .with_context(|| format!("Failed to remove archived source: {}", source.display()))?;

    debug!(from = %source.display(), to = %target.display(), "moved work item to archive");
    Ok(target)
}

/// Point markdown links at `<type dir>/<id>.md` to the archived copy.
///
/// Links inside the archive directory and links that already point into it
/// are left alone. Returns the files that changed.
fn rewrite_references(layout: &DocsLayout, item: &WorkItem) -> Result<Vec<PathBuf>> {
    let Ok(archive_rel) = layout.archive_dir().strip_prefix(layout.workflows_dir()) else {
        warn!(
            archive = %layout.archive_dir().display(),
            "archive directory is outside the workflows directory, links not rewritten"
        );
        return Ok(Vec::new());
    };
    let archive_rel = archive_rel.to_string_lossy().replace('\\', "/");
    let dir_name = item.item_type.dir_name();

    let link = Regex::new(&format!(
        r"\[([^\]]*)\]\(((?:[^)\s]*/)?){}/{}\.md\)",
        regex::escape(dir_name),
        regex::escape(&item.id)
    ))
    .context("Failed to build reference pattern")?;

    let pattern = layout.root().join("**").join("*.md");
    let files: Vec<PathBuf> = glob(&pattern.to_string_lossy())
        .map_err(|e| anyhow!("Invalid glob pattern '{}': {e}", pattern.display()))?
        .filter_map(|r| r.ok())
        .filter(|p| !p.starts_with(layout.archive_dir()))
        .collect();

    let mut updated = Vec::new();
    for path in files {
        let content = locked_read(&path)?;
        let rewritten = link.replace_all(&content, |caps: &Captures| {
            let text = &caps[1];
            let prefix = &caps[2];
            if prefix.ends_with(&format!("{archive_rel}/")) {
                return caps[0].to_string();
            }
            let suffix = if text.ends_with(ARCHIVED_SUFFIX) {
                ""
            } else {
                ARCHIVED_SUFFIX
            };
            format!(
                "[{text}{suffix}]({prefix}{archive_rel}/{dir_name}/{}.md)",
                item.id
            )
        });

        if rewritten != content {
            locked_write(&path, &rewritten)?;
            updated.push(path);
        }
    }

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::docs_dir::Config;
    use crate::fs::item_files::{load_item_from_path, save_item};
    use crate::models::WorkItemType;
    use chrono::{NaiveDate, TimeZone};
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 20, 12, 0, 0).unwrap()
    }

    fn setup() -> (TempDir, DocsLayout) {
        let temp = TempDir::new().unwrap();
        let layout = DocsLayout::new(temp.path(), &Config::default());
        layout.initialize().unwrap();
        (temp, layout)
    }

    fn completed(layout: &DocsLayout, id: &str, updated_day: u32) -> WorkItem {
        let mut item = WorkItem::new(
            id,
            format!("Title {id}"),
            WorkItemType::Task,
            WorkItemStatus::Completed,
            NaiveDate::from_ymd_opt(2025, 3, updated_day).unwrap(),
        );
        item.created_at = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        save_item(&layout.item_path(WorkItemType::Task, id), &item).unwrap();
        item
    }

    #[test]
    fn test_archive_moves_file_and_marks_status() {
        let (_temp, layout) = setup();
        completed(&layout, "task-done", 5);

        let report = archive_completed_at(&layout, &ArchiveOptions::default(), now()).unwrap();

        assert_eq!(report.archived, vec!["task-done".to_string()]);
        assert!(!layout.item_path(WorkItemType::Task, "task-done").exists());

        let archived = layout
            .archive_type_dir(WorkItemType::Task)
            .join("task-done.md");
        let content = fs::read_to_string(&archived).unwrap();
        assert!(content.contains("Status: Archived"));
        assert!(content.ends_with("\n## Archive Note\n\nArchived on 2025-03-20 after completion.\n"));

        let item = load_item_from_path(&archived, now().date_naive()).unwrap();
        assert_eq!(item.status, WorkItemStatus::Archived);

        let registry = fs::read_to_string(layout.registry_path()).unwrap();
        assert!(registry.contains("| task-done | Title task-done | Archived |"));

        let graph = fs::read_to_string(layout.report_path()).unwrap();
        assert!(!graph.contains("task-done"));
    }

    #[test]
    fn test_blocking_items_are_skipped() {
        let (_temp, layout) = setup();
        let mut item = completed(&layout, "task-blocker", 5);
        item.blocks = vec!["task-next".to_string()];
        save_item(&layout.item_path(WorkItemType::Task, "task-blocker"), &item).unwrap();

        let report = archive_completed_at(&layout, &ArchiveOptions::default(), now()).unwrap();

        assert!(report.archived.is_empty());
        assert_eq!(
            report.skipped,
            vec![(
                "task-blocker".to_string(),
                "Cannot archive item that blocks other items".to_string()
            )]
        );
        assert!(layout.item_path(WorkItemType::Task, "task-blocker").exists());
    }

    #[test]
    fn test_no_archive_tag_and_age_are_respected() {
        let (_temp, layout) = setup();
        completed(&layout, "task-recent", 18);
        completed(&layout, "task-old", 5);
        let tagged = layout.item_path(WorkItemType::Task, "task-pinned");
        completed(&layout, "task-pinned", 5);
        let mut content = fs::read_to_string(&tagged).unwrap();
        content.push_str("\nTags: no-archive\n");
        fs::write(&tagged, content).unwrap();

        let options = ArchiveOptions {
            dry_run: false,
            min_age_days: Some(7),
        };
        let report = archive_completed_at(&layout, &options, now()).unwrap();

        assert_eq!(report.archived, vec!["task-old".to_string()]);
        let skipped: Vec<&str> = report.skipped.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(skipped, vec!["task-pinned", "task-recent"]);
        assert_eq!(report.skipped[1].1, "completed 2 days ago, needs 7");
    }

    #[test]
    fn test_dry_run_changes_nothing() {
        let (_temp, layout) = setup();
        completed(&layout, "task-done", 5);
        let registry_before = fs::read_to_string(layout.registry_path()).unwrap();

        let options = ArchiveOptions {
            dry_run: true,
            min_age_days: None,
        };
        let report = archive_completed_at(&layout, &options, now()).unwrap();

        assert!(report.dry_run);
        assert_eq!(report.archived, vec!["task-done".to_string()]);
        assert!(layout.item_path(WorkItemType::Task, "task-done").exists());
        assert_eq!(fs::read_to_string(layout.registry_path()).unwrap(), registry_before);
        assert!(!layout.changelog_path().exists());
    }

    #[test]
    fn test_links_are_pointed_at_archive() {
        let (_temp, layout) = setup();
        completed(&layout, "task-done", 5);
        let notes = layout.workflows_dir().join("notes.md");
        fs::write(
            &notes,
            "See [the task](tasks/task-done.md) and [again](../workflows/tasks/task-done.md).\n\
             Old: [x (Archived)](archive/tasks/task-done.md)\n\
             Other: [y](tasks/task-done-2.md)\n",
        )
        .unwrap();

        let report = archive_completed_at(&layout, &ArchiveOptions::default(), now()).unwrap();

        assert_eq!(report.references_updated, vec![notes.clone()]);
        assert_eq!(
            fs::read_to_string(&notes).unwrap(),
            "See [the task (Archived)](archive/tasks/task-done.md) and \
             [again (Archived)](../workflows/archive/tasks/task-done.md).\n\
             Old: [x (Archived)](archive/tasks/task-done.md)\n\
             Other: [y](tasks/task-done-2.md)\n"
        );
    }
}

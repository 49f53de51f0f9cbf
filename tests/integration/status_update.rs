//! End-to-end status update scenarios

use serial_test::serial;

use pythia::fs::status_log::item_log_path;
use pythia::graph::update_dependencies_graph;
use pythia::models::WorkItemStatus;
use pythia::verify::{update_work_item_status_at, StatusUpdateRequest};

use super::helpers::*;

/// Not Started -> In Progress touches item, registry and changelog; graph stays the same
#[test]
#[serial]
fn test_start_work_updates_every_artifact() {
    let (_temp, layout) = init_docs_tree();
    write_item(&layout, "task-2025-03-test", "Test Task", WorkItemStatus::NotStarted);
    update_dependencies_graph(&layout, date(10)).expect("Failed to seed graph");
    let graph_before = read(layout.report_path());

    let request = StatusUpdateRequest::new("task-2025-03-test", WorkItemStatus::InProgress);
    update_work_item_status_at(&layout, &request, test_now()).expect("Update should succeed");

    let item_file = read(&layout.item_path(
        pythia::models::WorkItemType::Task,
        "task-2025-03-test",
    ));
    assert!(item_file.contains("Status: In Progress"));
    assert!(item_file.contains("Last Updated: 2025-03-18"));

    let row = registry_row(&layout, "task-2025-03-test").expect("Row should exist");
    assert_eq!(
        row,
        "| task-2025-03-test | Test Task | In Progress | - | - | 2025-03-18 |"
    );
    let registry = read(layout.registry_path());
    let active_tasks = registry
        .split("## ")
        .find(|s| s.starts_with("Active Tasks"))
        .expect("Active Tasks section");
    assert!(active_tasks.contains("task-2025-03-test"));

    assert_eq!(read(layout.report_path()), graph_before);

    let changelog = read(layout.changelog_path());
    assert!(changelog.starts_with("## [2025-03-18]\n\n"));
    assert!(changelog
        .contains("- [task-2025-03-test] Status changed from Not Started to In Progress"));
}

/// The reason check comes before the blocker check
#[test]
#[serial]
fn test_block_without_reason_reports_reason_first() {
    let (_temp, layout) = init_docs_tree();
    write_item(&layout, "task-2025-03-test", "Test Task", WorkItemStatus::InProgress);

    let request = StatusUpdateRequest::new("task-2025-03-test", WorkItemStatus::Blocked);
    let err = update_work_item_status_at(&layout, &request, test_now()).unwrap_err();

    assert_eq!(err.to_string(), "Status transition to Blocked requires a reason");
    assert!(!err.to_string().contains("blocking item"));
}

/// Archiving an item that blocks others is refused with no writes
#[test]
#[serial]
fn test_archive_blocking_item_is_rejected_without_writes() {
    let (_temp, layout) = init_docs_tree();
    let mut item = write_item(&layout, "task-blocker", "Blocker", WorkItemStatus::Completed);
    item.blocks = vec!["task-next".to_string()];
    save_work_item(&layout, &item);

    let registry_before = read(layout.registry_path());

    let request = StatusUpdateRequest::new("task-blocker", WorkItemStatus::Archived);
    let err = update_work_item_status_at(&layout, &request, test_now()).unwrap_err();

    assert_eq!(err.to_string(), "Cannot archive item that blocks other items");
    assert_eq!(read(layout.registry_path()), registry_before);
    assert!(!item_log_path(&layout, "task-blocker").exists());
    assert!(!layout.changelog_path().exists());
}

/// A full lifecycle leaves one log line per change and one changelog heading per day
#[test]
#[serial]
fn test_full_lifecycle_log_and_changelog() {
    let (_temp, layout) = init_docs_tree();
    let mut item = write_item(&layout, "proposal-cache", "Cache layer", WorkItemStatus::NotStarted);
    item.blocked_by = vec!["task-infra".to_string()];
    save_work_item(&layout, &item);

    let steps = [
        StatusUpdateRequest::new("proposal-cache", WorkItemStatus::InProgress),
        StatusUpdateRequest::new("proposal-cache", WorkItemStatus::Blocked)
            .with_reason("waiting for infra"),
        StatusUpdateRequest::new("proposal-cache", WorkItemStatus::InProgress),
        StatusUpdateRequest::new("proposal-cache", WorkItemStatus::UnderReview),
    ];
    for step in &steps {
        update_work_item_status_at(&layout, step, test_now()).expect("Step should succeed");
    }

    let log = read(&item_log_path(&layout, "proposal-cache"));
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[1].ends_with("In Progress -> Blocked (Reason: waiting for infra)"));
    assert!(lines[3].ends_with("In Progress -> Under Review"));

    let changelog = read(layout.changelog_path());
    assert_eq!(changelog.matches("## [2025-03-18]").count(), 1);

    let row = registry_row(&layout, "proposal-cache").expect("Row should exist");
    assert!(row.contains("| Under Review |"));
}

#[test]
#[serial]
fn test_unknown_item_is_not_found() {
    let (_temp, layout) = init_docs_tree();

    let request = StatusUpdateRequest::new("idea-nothing", WorkItemStatus::InProgress);
    let err = update_work_item_status_at(&layout, &request, test_now()).unwrap_err();

    assert_eq!(err.to_string(), "Work item not found: idea-nothing");
}

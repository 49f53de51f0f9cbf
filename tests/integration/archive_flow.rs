//! Archiving completed work items end to end

use serial_test::serial;
use std::fs;

use pythia::fs::{archive_completed_at, ArchiveOptions};
use pythia::models::{WorkItemStatus, WorkItemType};

use super::helpers::*;

#[test]
#[serial]
fn test_archive_completed_items_and_rewrite_links() {
    let (_temp, layout) = init_docs_tree();
    write_item(&layout, "task-done", "Finished work", WorkItemStatus::Completed);
    write_item(&layout, "task-open", "Open work", WorkItemStatus::InProgress);
    let mut blocker = write_item(&layout, "task-blocker", "Blocker", WorkItemStatus::Completed);
    blocker.blocks = vec!["task-open".to_string()];
    save_work_item(&layout, &blocker);

    let overview = layout.root().join("overview.md");
    fs::write(&overview, "- [Finished](workflows/tasks/task-done.md)\n").unwrap();

    let report = archive_completed_at(&layout, &ArchiveOptions::default(), test_now())
        .expect("Archive should succeed");

    assert_eq!(report.archived, vec!["task-done".to_string()]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].0, "task-blocker");

    assert!(!layout.item_path(WorkItemType::Task, "task-done").exists());
    assert!(layout
        .archive_type_dir(WorkItemType::Task)
        .join("task-done.md")
        .exists());
    assert!(layout.item_path(WorkItemType::Task, "task-blocker").exists());

    assert_eq!(
        read(&overview),
        "- [Finished (Archived)](workflows/archive/tasks/task-done.md)\n"
    );

    let row = registry_row(&layout, "task-done").expect("Row should exist");
    assert!(row.contains("| Archived |"));

    let graph = read(layout.report_path());
    assert!(!graph.contains("task-done"));
    assert!(graph.contains("task-blocker -.-> task-open"));
}

//! Helpers shared by the command implementations.

use anyhow::{bail, Result};
use colored::{ColoredString, Colorize};
use std::path::Path;

use crate::fs::docs_dir::DocsLayout;
use crate::models::WorkItemStatus;

/// Resolve the docs layout for `project_root`, requiring an initialised tree.
pub fn open_layout(project_root: &Path) -> Result<DocsLayout> {
    let layout = DocsLayout::discover(project_root)?;
    if !layout.root().is_dir() {
        bail!(
            "{} not found. Run 'pythia init' first.",
            layout.root().display()
        );
    }
    Ok(layout)
}

/// Status label colored for terminal output
pub fn colored_status(status: WorkItemStatus) -> ColoredString {
    paint_status(status, status.as_str())
}

/// Like [`colored_status`], padded before coloring so escape codes don't
/// break column alignment.
pub fn colored_status_padded(status: WorkItemStatus, width: usize) -> ColoredString {
    paint_status(status, &format!("{:width$}", status.as_str()))
}

fn paint_status(status: WorkItemStatus, label: &str) -> ColoredString {
    match status {
        WorkItemStatus::NotStarted => label.white().dimmed(),
        WorkItemStatus::InProgress => label.blue().bold(),
        WorkItemStatus::UnderReview => label.cyan(),
        WorkItemStatus::Blocked => label.red().bold(),
        WorkItemStatus::Completed => label.green(),
        WorkItemStatus::Archived => label.dimmed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_layout_requires_init() {
        let temp = TempDir::new().unwrap();
        let err = open_layout(temp.path()).unwrap_err();
        assert!(err.to_string().contains("Run 'pythia init' first"));

        DocsLayout::discover(temp.path())
            .unwrap()
            .initialize()
            .unwrap();
        assert!(open_layout(temp.path()).is_ok());
    }
}

//! Work item status updates
//!
//! A status update runs as a fixed pipeline:
//! - load the work item document
//! - validate the requested transition
//! - write the item, then the registry, then the report graph, then the audit log
//!
//! Stages run in order and the first failure stops the pipeline. Nothing is
//! written when validation fails. A failure after the item file is written
//! leaves earlier stages in place; there is no rollback across files.


use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::fs::docs_dir::DocsLayout;
use crate::fs::item_files::{find_item_file, load_item_from_path, save_item};
use crate::fs::registry::update_registry;
use crate::fs::status_log::{log_status_change, StatusChange};
use crate::graph::{update_dependencies_graph, GraphSummary};
use crate::models::{WorkItem, WorkItemStatus};

use super::status::{validate_transition_rules, validate_work_item_status};

/// A requested status change for one work item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdateRequest {
    pub item_id: String,
    pub new_status: WorkItemStatus,
    pub reason: Option<String>,
    /// Sign-off for edges that require approval
    pub approved: bool,
}

impl StatusUpdateRequest {
    pub fn new(item_id: impl Into<String>, new_status: WorkItemStatus) -> Self {
        Self {
            item_id: item_id.into(),
            new_status,
            reason: None,
            approved: false,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn approved(mut self) -> Self {
        self.approved = true;
        self
    }
}

/// Outcome of a successful update.
#[derive(Debug, Clone)]
pub struct StatusUpdate {
    pub item: WorkItem,
    pub previous: WorkItemStatus,
    pub graph: GraphSummary,
}

/// Apply a status change using the current time.
pub fn update_work_item_status(
    layout: &DocsLayout,
    request: &StatusUpdateRequest,
) -> Result<StatusUpdate> {
    update_work_item_status_at(layout, request, Utc::now())
}

/// Apply a status change as of `now`.
///
/// `now` stamps the audit log entry; its date becomes the item's
/// `Last Updated` and the changelog heading.
pub fn update_work_item_status_at(
    layout: &DocsLayout,
    request: &StatusUpdateRequest,
    now: DateTime<Utc>,
) -> Result<StatusUpdate> {
    let today = now.date_naive();
    let id = request.item_id.as_str();

    let path =
        find_item_file(layout, id).ok_or_else(|| anyhow!("Work item not found: {id}"))?;
    let mut item = load_item_from_path(&path, today)?;
    let previous = item.status;

    let reason = request
        .reason
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty());

    validate_work_item_status(&item, request.new_status, reason, request.approved)?;
    if layout.strict_transitions() {
        validate_transition_rules(&item, request.new_status)?;
    }

    item.status = request.new_status;
    item.last_updated = today;
    if let Some(reason) = reason {
        item.status_reason = Some(reason.to_string());
    }

    save_item(&path, &item)?;
    debug!(item = id, path = %path.display(), "saved work item");

    update_registry(layout, &item, today)?;

    let graph = update_dependencies_graph(layout, today)?;

    let change = StatusChange {
        item_id: item.id.clone(),
        from: previous,
        to: item.status,
        reason: reason.map(str::to_string),
    };
    log_status_change(layout, &change, now)?;

    info!(item = id, from = %previous, to = %item.status, "work item status updated");

    Ok(StatusUpdate {
        item,
        previous,
        graph,
    })
}

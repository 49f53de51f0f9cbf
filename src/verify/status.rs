//! Status transition validation.
//!
//! Validation is pure: it reads the work item and the request and reports the
//! first rule that fails. Nothing is written here.


use crate::models::{TransitionError, WorkItem, WorkItemStatus};

/// Decide whether `item` may move to `new_status`.
///
/// Checks run in a fixed order and the first failure is returned:
/// 1. the `(current, new)` edge must exist in the transition table
/// 2. edges that require a reason need a non-blank `reason`
/// 3. edges that require approval need `approved`
/// 4. target rules: `Blocked` needs a blocker, `Completed` needs none,
///    `Archived` must not block other items
///
/// Unknown status names never reach this point; they fail to parse into
/// [`WorkItemStatus`] with [`TransitionError::InvalidStatus`].
pub fn validate_work_item_status(
    item: &WorkItem,
    new_status: WorkItemStatus,
    reason: Option<&str>,
    approved: bool,
) -> Result<(), TransitionError> {
    let transition =
        item.status
            .transition_to(new_status)
            .ok_or(TransitionError::InvalidTransition {
                from: item.status,
                to: new_status,
            })?;

    let has_reason = reason.is_some_and(|r| !r.trim().is_empty());
    if transition.requires_reason && !has_reason {
        return Err(TransitionError::ReasonRequired(new_status));
    }

    if transition.requires_approval && !approved {
        return Err(TransitionError::ApprovalRequired(new_status));
    }

    match new_status {
        WorkItemStatus::Blocked if !item.is_blocked() => Err(TransitionError::MissingBlocker),
        WorkItemStatus::Completed if item.is_blocked() => {
            Err(TransitionError::CompleteWhileBlocked)
        }
        WorkItemStatus::Archived if item.is_blocking() => {
            Err(TransitionError::ArchiveWhileBlocking)
        }
        _ => Ok(()),
    }
}

/// Metadata rules layered on top of the transition table when
/// `strict_transitions` is enabled.
pub fn validate_transition_rules(
    item: &WorkItem,
    new_status: WorkItemStatus,
) -> Result<(), TransitionError> {
    match new_status {
        WorkItemStatus::UnderReview if item.owner.is_none() => {
            Err(TransitionError::OwnerRequiredForReview)
        }
        WorkItemStatus::Completed if item.owner.is_none() || item.priority.is_none() => {
            Err(TransitionError::OwnerAndPriorityRequired)
        }
        _ => Ok(()),
    }
}

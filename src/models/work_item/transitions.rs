use thiserror::Error;

use super::types::WorkItemStatus;

/// A legal status edge and the preconditions attached to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: WorkItemStatus,
    pub to: WorkItemStatus,
    pub requires_reason: bool,
    pub requires_approval: bool,
}

impl Transition {
    const fn plain(from: WorkItemStatus, to: WorkItemStatus) -> Self {
        Self {
            from,
            to,
            requires_reason: false,
            requires_approval: false,
        }
    }
}

/// The complete transition table. Any `(from, to)` pair not listed here,
/// including self-transitions, is illegal.
pub const TRANSITIONS: &[Transition] = &[
    Transition::plain(WorkItemStatus::NotStarted, WorkItemStatus::InProgress),
    Transition::plain(WorkItemStatus::InProgress, WorkItemStatus::UnderReview),
    Transition {
        from: WorkItemStatus::InProgress,
        to: WorkItemStatus::Blocked,
        requires_reason: true,
        requires_approval: false,
    },
    Transition::plain(WorkItemStatus::Blocked, WorkItemStatus::InProgress),
    Transition::plain(WorkItemStatus::UnderReview, WorkItemStatus::InProgress),
    Transition {
        from: WorkItemStatus::UnderReview,
        to: WorkItemStatus::Completed,
        requires_reason: false,
        requires_approval: true,
    },
    Transition::plain(WorkItemStatus::Completed, WorkItemStatus::Archived),
];

impl WorkItemStatus {
    /// Look up the table edge from this status to `new_status`.
    pub fn transition_to(&self, new_status: WorkItemStatus) -> Option<&'static Transition> {
        TRANSITIONS
            .iter()
            .find(|t| t.from == *self && t.to == new_status)
    }

    pub fn can_transition_to(&self, new_status: WorkItemStatus) -> bool {
        self.transition_to(new_status).is_some()
    }

    /// Returns the list of statuses reachable in one step.
    pub fn valid_transitions(&self) -> Vec<WorkItemStatus> {
        TRANSITIONS
            .iter()
            .filter(|t| t.from == *self)
            .map(|t| t.to)
            .collect()
    }
}

/// Why a requested status change was refused.
///
/// Messages are part of the tool's output contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition {
        from: WorkItemStatus,
        to: WorkItemStatus,
    },

    #[error("Status transition to {0} requires a reason")]
    ReasonRequired(WorkItemStatus),

    #[error("Status transition to {0} requires approval")]
    ApprovalRequired(WorkItemStatus),

    #[error("Blocked status requires at least one blocking item")]
    MissingBlocker,

    #[error("Cannot complete item with blocking dependencies")]
    CompleteWhileBlocked,

    #[error("Cannot archive item that blocks other items")]
    ArchiveWhileBlocking,

    #[error("Owner must be assigned before review")]
    OwnerRequiredForReview,

    #[error("Owner and priority must be set before completion")]
    OwnerAndPriorityRequired,
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::transitions::TransitionError;

/// One trackable documentation unit, backed by a single markdown file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub item_type: WorkItemType,
    pub status: WorkItemStatus,
    pub priority: Option<Level>,
    pub complexity: Option<Level>,
    pub owner: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub blocked_by: Vec<String>,
    #[serde(default)]
    pub blocks: Vec<String>,
    pub last_updated: NaiveDate,
    pub created_at: NaiveDate,
    pub status_reason: Option<String>,
}

impl WorkItem {
    /// Create a bare work item with no optional metadata.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        item_type: WorkItemType,
        status: WorkItemStatus,
        today: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            item_type,
            status,
            priority: None,
            complexity: None,
            owner: None,
            dependencies: Vec::new(),
            blocked_by: Vec::new(),
            blocks: Vec::new(),
            last_updated: today,
            created_at: today,
            status_reason: None,
        }
    }

    pub fn is_blocked(&self) -> bool {
        !self.blocked_by.is_empty()
    }

    pub fn is_blocking(&self) -> bool {
        !self.blocks.is_empty()
    }
}

/// Kind of work item. Owns every type-keyed lookup (directory, registry
/// section, id prefix) so new kinds fail to compile until they are mapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkItemType {
    Task,
    Proposal,
    Exploration,
    Idea,
}

impl WorkItemType {
    pub fn all() -> &'static [WorkItemType] {
        &[
            WorkItemType::Task,
            WorkItemType::Proposal,
            WorkItemType::Exploration,
            WorkItemType::Idea,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkItemType::Task => "task",
            WorkItemType::Proposal => "proposal",
            WorkItemType::Exploration => "exploration",
            WorkItemType::Idea => "idea",
        }
    }

    /// Storage directory under the workflows dir
    pub fn dir_name(&self) -> &'static str {
        match self {
            WorkItemType::Task => "tasks",
            WorkItemType::Proposal => "proposals",
            WorkItemType::Exploration => "explorations",
            WorkItemType::Idea => "ideas",
        }
    }

    /// Registry section holding this type's table
    pub fn registry_section(&self) -> &'static str {
        match self {
            WorkItemType::Task => "Active Tasks",
            WorkItemType::Proposal => "Active Proposals",
            WorkItemType::Exploration => "Active Explorations",
            WorkItemType::Idea => "New Ideas",
        }
    }

    /// Singularize a storage directory name (`tasks` -> `Task`).
    pub fn from_dir_name(dir: &str) -> Option<Self> {
        Self::all().iter().copied().find(|t| t.dir_name() == dir)
    }

    /// Derive the type from an id's leading segment (`task-2025-03-x` -> `Task`).
    pub fn from_id(id: &str) -> Option<Self> {
        let prefix = id.split('-').next()?;
        Self::all().iter().copied().find(|t| t.as_str() == prefix)
    }
}

impl std::fmt::Display for WorkItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for WorkItemType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "task" | "tasks" => Ok(WorkItemType::Task),
            "proposal" | "proposals" => Ok(WorkItemType::Proposal),
            "exploration" | "explorations" => Ok(WorkItemType::Exploration),
            "idea" | "ideas" => Ok(WorkItemType::Idea),
            _ => anyhow::bail!(
                "Invalid work item type: {s}. Use: task, proposal, exploration, idea"
            ),
        }
    }
}

/// Lifecycle status of a work item.
///
/// See [`super::TRANSITIONS`] for the legal edges between statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkItemStatus {
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Under Review")]
    UnderReview,
    #[serde(rename = "Blocked")]
    Blocked,
    #[serde(rename = "Completed")]
    Completed,
    #[serde(rename = "Archived")]
    Archived,
}

impl WorkItemStatus {
    pub fn all() -> &'static [WorkItemStatus] {
        &[
            WorkItemStatus::NotStarted,
            WorkItemStatus::InProgress,
            WorkItemStatus::UnderReview,
            WorkItemStatus::Blocked,
            WorkItemStatus::Completed,
            WorkItemStatus::Archived,
        ]
    }

    /// Label as written in documents and the registry
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkItemStatus::NotStarted => "Not Started",
            WorkItemStatus::InProgress => "In Progress",
            WorkItemStatus::UnderReview => "Under Review",
            WorkItemStatus::Blocked => "Blocked",
            WorkItemStatus::Completed => "Completed",
            WorkItemStatus::Archived => "Archived",
        }
    }

    /// Completed and Archived items count as finished work.
    pub fn is_finished(&self) -> bool {
        matches!(self, WorkItemStatus::Completed | WorkItemStatus::Archived)
    }
}

impl std::fmt::Display for WorkItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for WorkItemStatus {
    type Err = TransitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| TransitionError::InvalidStatus(s.to_string()))
    }
}

/// Three-step scale shared by priority and complexity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    Low,
    Medium,
    High,
}

impl Level {
    pub fn all() -> &'static [Level] {
        &[Level::Low, Level::Medium, Level::High]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Low => "Low",
            Level::Medium => "Medium",
            Level::High => "High",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Level {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Level::Low),
            "medium" => Ok(Level::Medium),
            "high" => Ok(Level::High),
            _ => anyhow::bail!("Invalid level: {s}. Use: Low, Medium, High"),
        }
    }
}

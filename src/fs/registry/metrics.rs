use std::collections::BTreeMap;

use super::{RegistryRow, METRICS_SECTION};
use crate::models::{Level, WorkItemStatus};

const UNASSIGNED: &str = "Unassigned";

/// Summary counts over every row of the registry tables.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkItemMetrics {
    pub total_items: usize,
    /// All six statuses in lifecycle order, zero counts included
    pub status_distribution: Vec<(WorkItemStatus, usize)>,
    pub priority_distribution: Vec<(Level, usize)>,
    /// Keyed by owner, rows without one count as `Unassigned`
    pub team_distribution: BTreeMap<String, usize>,
    pub blocked_items: usize,
    /// Mean days from creation to last update of finished items, when known
    pub average_completion_days: Option<f64>,
}

impl Default for WorkItemMetrics {
    fn default() -> Self {
        Self::compute(&[], |_| None)
    }
}

impl WorkItemMetrics {
    /// `completion_days` is asked for finished rows only and returns the
    /// creation-to-completion span, or `None` when it is unknown.
    pub fn compute<F>(rows: &[RegistryRow], completion_days: F) -> Self
    where
        F: Fn(&RegistryRow) -> Option<i64>,
    {
        let status_distribution = WorkItemStatus::all()
            .iter()
            .map(|status| {
                let count = rows.iter().filter(|r| r.status == Some(*status)).count();
                (*status, count)
            })
            .collect();

        let priority_distribution = Level::all()
            .iter()
            .map(|level| {
                let count = rows.iter().filter(|r| r.priority == Some(*level)).count();
                (*level, count)
            })
            .collect();

        let mut team_distribution = BTreeMap::new();
        for row in rows {
            let owner = row.owner.clone().unwrap_or_else(|| UNASSIGNED.to_string());
            *team_distribution.entry(owner).or_insert(0) += 1;
        }

        let spans: Vec<i64> = rows
            .iter()
            .filter(|r| r.status.is_some_and(|s| s.is_finished()))
            .filter_map(&completion_days)
            .collect();
        let average_completion_days = if spans.is_empty() {
            None
        } else {
            Some(spans.iter().sum::<i64>() as f64 / spans.len() as f64)
        };

        Self {
            total_items: rows.len(),
            status_distribution,
            priority_distribution,
            team_distribution,
            blocked_items: rows
                .iter()
                .filter(|r| r.status == Some(WorkItemStatus::Blocked))
                .count(),
            average_completion_days,
        }
    }

    /// Render the full `## Work Item Metrics` section.
    pub fn render(&self) -> String {
        let status_lines: Vec<String> = self
            .status_distribution
            .iter()
            .map(|(status, count)| format!("- {status}: {count}"))
            .collect();
        let priority_lines: Vec<String> = self
            .priority_distribution
            .iter()
            .map(|(level, count)| format!("- {level}: {count}"))
            .collect();
        let team_lines: Vec<String> = self
            .team_distribution
            .iter()
            .map(|(owner, count)| format!("- {owner}: {count}"))
            .collect();
        let average = match self.average_completion_days {
            Some(days) => format!("{days:.1} days"),
            None => "n/a".to_string(),
        };

        let blocks = [
            format!("## {METRICS_SECTION}"),
            with_heading("### Status Distribution", &status_lines),
            with_heading("### Priority Distribution", &priority_lines),
            with_heading("### Team Distribution", &team_lines),
            format!(
                "### Other Metrics\n- Total Items: {}\n- Blocked Items: {}\n- Average Completion Time: {average}",
                self.total_items, self.blocked_items
            ),
        ];
        blocks.join("\n\n")
    }
}

fn with_heading(heading: &str, lines: &[String]) -> String {
    if lines.is_empty() {
        heading.to_string()
    } else {
        format!("{heading}\n{}", lines.join("\n"))
    }
}

//! Dependency graph regeneration for the work-items report.
//!
//! The graph is never stored as data. Every update rescans all work-item
//! documents and splices a freshly rendered mermaid block into the
//! `## Dependencies Graph` section of the report file.

mod render;


use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::fs::docs_dir::DocsLayout;
use crate::fs::item_files::scan_items;
use crate::fs::locking::{locked_read, locked_write};
use crate::fs::registry::GRAPH_SECTION;
use crate::parser::markdown::split_at_headings;

pub use render::{find_cycles, render_dependencies_graph};

/// What the last regeneration saw.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphSummary {
    pub nodes: usize,
    pub edges: usize,
    /// Documents left out because they could not be parsed
    pub skipped: Vec<PathBuf>,
    /// Dependency cycles, reported but not rejected
    pub cycles: Vec<Vec<String>>,
}

/// Rebuild the diagram from every work item on disk and rewrite the report.
pub fn update_dependencies_graph(layout: &DocsLayout, today: NaiveDate) -> Result<GraphSummary> {
    regenerate(layout, today).context("Failed to update dependencies graph")
}

fn regenerate(layout: &DocsLayout, today: NaiveDate) -> Result<GraphSummary> {
    let report = layout.report_path();
    if !report.exists() {
        bail!("Report file not found: {}", report.display());
    }
    let content = locked_read(report)?;

    let scan = scan_items(layout, today)?;
    let items = scan.work_items();
    let graph = render_dependencies_graph(&items);
    let cycles = find_cycles(&items);

    for cycle in &cycles {
        warn!(cycle = %cycle.join(" -> "), "dependency cycle in work items");
    }

    let summary = GraphSummary {
        nodes: items.len(),
        edges: items
            .iter()
            .map(|i| i.dependencies.len() + i.blocks.len())
            .sum(),
        skipped: scan.skipped,
        cycles,
    };
    debug!(nodes = summary.nodes, edges = summary.edges, "rendered dependencies graph");

    locked_write(report, &splice_graph_section(&content, &graph))?;
    Ok(summary)
}

/// Replace the body of the graph section, or append the section when absent.
/// Everything outside that section is kept byte for byte.
pub fn splice_graph_section(content: &str, graph: &str) -> String {
    let mut parts = split_at_headings(content);
    let body = format!("{GRAPH_SECTION}\n\n{graph}");

    let position = parts
        .iter()
        .skip(1)
        .position(|p| p.starts_with(GRAPH_SECTION))
        .map(|idx| idx + 1);

    match position {
        Some(idx) if idx + 1 < parts.len() => parts[idx] = format!("{body}\n"),
        Some(idx) => parts[idx] = body,
        None => {
            if let Some(last) = parts.last_mut() {
                if !last.is_empty() && !last.ends_with('\n') {
                    last.push('\n');
                }
                if !last.is_empty() && !last.ends_with("\n\n") {
                    last.push('\n');
                }
            }
            parts.push(body);
        }
    }

    parts.join("## ")
}

/// Report content for a freshly initialised docs tree.
pub fn report_skeleton() -> String {
    format!(
        "# Work Items Report\n\n## {GRAPH_SECTION}\n\n{}",
        render_dependencies_graph(&[])
    )
}

//! `pythia links`: check cross-document links in the docs tree.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::commands::common::open_layout;
use crate::fs::links::{add_backlinks, check_links, LinkReport};
use crate::utils::display_path;

pub fn execute(project_root: &Path, json: bool, fix: bool, report_path: Option<PathBuf>) -> Result<()> {
    let layout = open_layout(project_root)?;
    let report = check_links(&layout)?;

    if let Some(path) = &report_path {
        let content =
            serde_json::to_string_pretty(&report).context("Failed to serialize link report")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write link report: {}", path.display()))?;
    }

    if json {
        let content =
            serde_json::to_string_pretty(&report).context("Failed to serialize link report")?;
        println!("{content}");
    } else {
        print_report(&report);
    }

    if fix && !report.missing_backlinks.is_empty() {
        let changed = add_backlinks(&layout, &report)?;
        for path in &changed {
            println!(
                "{} Added back-links to {}",
                "✓".green(),
                display_path(path, project_root).cyan()
            );
        }
    }

    if !report.broken.is_empty() {
        bail!("Found {} broken link(s)", report.broken.len());
    }
    Ok(())
}

fn print_report(report: &LinkReport) {
    println!(
        "{} Checked {} links in {} documents",
        "ℹ".blue(),
        report.total_links,
        report.documents
    );

    for link in &report.broken {
        println!(
            "{} {}:{} broken link [{}] → {}",
            "✗".red(),
            link.source.cyan(),
            link.line,
            link.text,
            link.target.dimmed()
        );
    }
    for missing in &report.missing_backlinks {
        let link = &missing.link;
        println!(
            "{} {} does not link back to {}",
            "⚠".yellow(),
            link.target.cyan(),
            link.source.cyan()
        );
    }

    if report.is_clean() {
        println!("{} All links resolve and are reciprocal", "✓".green());
    }
}

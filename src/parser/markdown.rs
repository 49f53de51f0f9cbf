//! Section and table helpers for the aggregate markdown files.
//!
//! Registry, report, and changelog files are organised by top-level `## `
//! headings. Deeper headings (`###`) stay inside their parent section.

use anyhow::{Context, Result};
use regex::Regex;

const HEADING_PREFIX: &str = "## ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    /// Full section text including its heading line, trimmed.
    pub text: String,
}

/// A markdown file split into its `## ` sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionedDocument {
    /// Text before the first section (typically the `# ` title).
    pub preamble: String,
    pub sections: Vec<Section>,
}

impl SectionedDocument {
    pub fn parse(content: &str) -> Self {
        let mut preamble = String::new();
        let mut sections = Vec::new();
        let mut current: Option<Section> = None;

        for line in content.lines() {
            if let Some(title) = line.strip_prefix(HEADING_PREFIX) {
                if let Some(mut section) = current.take() {
                    section.text = section.text.trim().to_string();
                    sections.push(section);
                }
                current = Some(Section {
                    title: title.trim().to_string(),
                    text: format!("{line}\n"),
                });
            } else if let Some(ref mut section) = current {
                section.text.push_str(line);
                section.text.push('\n');
            } else {
                preamble.push_str(line);
                preamble.push('\n');
            }
        }

        if let Some(mut section) = current {
            section.text = section.text.trim().to_string();
            sections.push(section);
        }

        Self {
            preamble: preamble.trim().to_string(),
            sections,
        }
    }

    pub fn get(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.title == title)
    }

    pub fn get_mut(&mut self, title: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.title == title)
    }

    /// Replace the text of a section, appending it when absent.
    pub fn upsert(&mut self, title: &str, text: String) {
        match self.get_mut(title) {
            Some(section) => section.text = text,
            None => self.sections.push(Section {
                title: title.to_string(),
                text,
            }),
        }
    }

    /// Render the preamble plus the named sections in the given order.
    /// Sections not named in `order` are dropped.
    pub fn render_ordered(&self, order: &[&str]) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if !self.preamble.is_empty() {
            parts.push(&self.preamble);
        }
        for title in order {
            if let Some(section) = self.get(title) {
                if !section.text.is_empty() {
                    parts.push(&section.text);
                }
            }
        }
        format!("{}\n", parts.join("\n\n"))
    }
}

/// Split raw markdown at every line starting with `## `, dropping the marker.
///
/// The first element is whatever precedes the first heading. Joining the
/// result with `"## "` reproduces the input byte for byte.
pub fn split_at_headings(content: &str) -> Vec<String> {
    let mut parts = vec![String::new()];
    for line in content.split_inclusive('\n') {
        if let Some(rest) = line.strip_prefix(HEADING_PREFIX) {
            parts.push(rest.to_string());
        } else if let Some(last) = parts.last_mut() {
            last.push_str(line);
        }
    }
    parts
}

/// Cells of a `| a | b |` table row, or `None` for non-table lines.
pub fn table_cells(line: &str) -> Option<Vec<String>> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|')?.strip_suffix('|')?;
    Some(inner.split('|').map(|c| c.trim().to_string()).collect())
}

/// `| --- | :---: |` style header separators
pub fn is_separator_row(line: &str) -> bool {
    match table_cells(line) {
        Some(cells) => cells
            .iter()
            .all(|c| !c.is_empty() && c.chars().all(|ch| matches!(ch, '-' | ':' | ' '))),
        None => false,
    }
}

/// An inline `[text](target)` link to another local document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownLink {
    /// 1-based line number
    pub line: usize,
    pub text: String,
    /// Target path with any `#anchor`, `?query`, or `"title"` removed
    pub target: String,
}

/// Local links in document order. External URLs, `mailto:` and pure anchors
/// are left out.
pub fn extract_links(content: &str) -> Result<Vec<MarkdownLink>> {
    let re = Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").context("Failed to build link pattern")?;
    let mut links = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        for caps in re.captures_iter(line) {
            let raw = caps[2].split_whitespace().next().unwrap_or_default();
            if raw.contains("://") || raw.starts_with("mailto:") || raw.starts_with('#') {
                continue;
            }
            let target = raw.split(['#', '?']).next().unwrap_or_default();
            if target.is_empty() {
                continue;
            }
            links.push(MarkdownLink {
                line: idx + 1,
                text: caps[1].to_string(),
                target: target.to_string(),
            });
        }
    }

    Ok(links)
}

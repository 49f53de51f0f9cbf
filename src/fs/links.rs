//! Cross-document link checking for the docs tree.
//!
//! Every markdown file under the docs root is scanned for local links.
//! Two kinds of issue are reported:
//! - broken links, whose target does not exist
//! - missing back-links, where `a.md` links to `b.md` but `b.md` never links
//!   back to `a.md`
//!
//! [`add_backlinks`] repairs the second kind by appending to a
//! `## References` section in the target document.

use anyhow::{anyhow, Result};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

use crate::fs::docs_dir::DocsLayout;
use crate::fs::locking::{locked_read, locked_write};
use crate::parser::markdown::extract_links;

const REFERENCES_HEADING: &str = "## References";

/// Directories never scanned for documents
const EXCLUDED_DIRS: [&str; 2] = ["node_modules", ".git"];

/// A local link found in a document. Paths are relative to the docs root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub source: String,
    pub target: String,
    pub line: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingBacklink {
    pub link: Link,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkReport {
    pub documents: usize,
    pub total_links: usize,
    pub broken: Vec<Link>,
    pub missing_backlinks: Vec<MissingBacklink>,
}

impl LinkReport {
    pub fn is_clean(&self) -> bool {
        self.broken.is_empty() && self.missing_backlinks.is_empty()
    }
}

struct ResolvedLink {
    target: PathBuf,
    link: Link,
}

/// Scan the docs tree and report broken links and missing back-links.
///
/// Links into non-markdown files count as valid when the file exists. The
/// changelog is never expected to link back.
pub fn check_links(layout: &DocsLayout) -> Result<LinkReport> {
    let root = normalize(layout.root());
    let changelog = normalize(layout.changelog_path());

    let mut outgoing: BTreeMap<PathBuf, Vec<ResolvedLink>> = BTreeMap::new();
    for path in markdown_files(&root)? {
        let content = locked_read(&path)?;
        let dir = path.parent().unwrap_or(&root).to_path_buf();
        let links = extract_links(&content)?
            .into_iter()
            .map(|l| {
                let target = normalize(&dir.join(&l.target));
                ResolvedLink {
                    link: Link {
                        source: display_rel(&path, &root),
                        target: display_rel(&target, &root),
                        line: l.line,
                        text: l.text,
                    },
                    target,
                }
            })
            .collect();
        outgoing.insert(path, links);
    }

    let mut report = LinkReport {
        documents: outgoing.len(),
        total_links: outgoing.values().map(Vec::len).sum(),
        ..LinkReport::default()
    };

    for (source, links) in &outgoing {
        for resolved in links {
            if !resolved.target.exists() {
                report.broken.push(resolved.link.clone());
                continue;
            }
            if resolved.target == changelog || resolved.target == *source {
                continue;
            }
            let Some(target_links) = outgoing.get(&resolved.target) else {
                continue;
            };
            if !target_links.iter().any(|l| l.target == *source) {
                report.missing_backlinks.push(MissingBacklink {
                    link: resolved.link.clone(),
                });
            }
        }
    }

    debug!(
        documents = report.documents,
        links = report.total_links,
        broken = report.broken.len(),
        missing_backlinks = report.missing_backlinks.len(),
        "checked links"
    );
    Ok(report)
}

/// Add a `- [Source Title](relative/path.md)` entry under `## References` in
/// every document that is missing a back-link. Returns the files changed.
pub fn add_backlinks(layout: &DocsLayout, report: &LinkReport) -> Result<Vec<PathBuf>> {
    let root = normalize(layout.root());
    let pairs: BTreeSet<(&str, &str)> = report
        .missing_backlinks
        .iter()
        .map(|m| (m.link.target.as_str(), m.link.source.as_str()))
        .collect();

    let mut changed = Vec::new();
    for (target, source) in pairs {
        let target_path = root.join(target);
        let source_path = root.join(source);
        let dir = target_path.parent().unwrap_or(&root);
        let href = relative_path(dir, &source_path);
        let entry = format!("- [{}]({href})", title_from_path(&source_path));

        let content = locked_read(&target_path)?;
        if content.contains(&format!("]({href})")) {
            continue;
        }

        locked_write(&target_path, &insert_reference(&content, &entry))?;
        info!(document = target, link = %href, "added back-link");
        if !changed.contains(&target_path) {
            changed.push(target_path);
        }
    }

    Ok(changed)
}

fn markdown_files(root: &Path) -> Result<Vec<PathBuf>> {
    let pattern = root.join("**").join("*.md");
    let mut files: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())
        .map_err(|e| anyhow!("Invalid glob pattern '{}': {e}", pattern.display()))?
        .filter_map(|r| r.ok())
        .filter(|p| {
            !p.components()
                .any(|c| EXCLUDED_DIRS.iter().any(|d| c.as_os_str() == *d))
        })
        .map(|p| normalize(&p))
        .collect();
    files.sort();
    Ok(files)
}

/// Put `entry` first in the references list, creating the section at the end
/// of the document when it does not exist.
fn insert_reference(content: &str, entry: &str) -> String {
    let mut lines: Vec<&str> = content.split('\n').collect();

    match lines.iter().position(|l| l.trim() == REFERENCES_HEADING) {
        Some(idx) => {
            let at = if lines.get(idx + 1).is_some_and(|l| l.trim().is_empty()) {
                idx + 2
            } else {
                idx + 1
            };
            lines.insert(at.min(lines.len()), entry);
            lines.join("\n")
        }
        None => format!("{}\n\n{REFERENCES_HEADING}\n\n{entry}\n", content.trim_end()),
    }
}

/// `getting-started.md` -> `Getting Started`
fn title_from_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    stem.split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve `.` and `..` without touching the filesystem, so missing targets
/// can still be compared.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Path from directory `from` to `to`, `/`-separated.
fn relative_path(from: &Path, to: &Path) -> String {
    let from: Vec<Component> = from.components().collect();
    let to: Vec<Component> = to.components().collect();
    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();

    let mut parts: Vec<String> = vec!["..".to_string(); from.len() - common];
    parts.extend(
        to[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().to_string()),
    );
    parts.join("/")
}

fn display_rel(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::docs_dir::Config;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, DocsLayout) {
        let temp = TempDir::new().unwrap();
        let layout = DocsLayout::new(temp.path(), &Config::default());
        layout.initialize().unwrap();
        (temp, layout)
    }

    fn write(layout: &DocsLayout, rel: &str, content: &str) -> PathBuf {
        let path = layout.root().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_broken_link_is_reported_with_location() {
        let (_temp, layout) = setup();
        write(
            &layout,
            "guide.md",
            "# Guide\n\nRead [the plan](workflows/plan.md).\n[web](https://example.com)\n",
        );

        let report = check_links(&layout).unwrap();

        assert_eq!(
            report.broken,
            vec![Link {
                source: "guide.md".to_string(),
                target: "workflows/plan.md".to_string(),
                line: 3,
                text: "the plan".to_string(),
            }]
        );
        assert_eq!(report.total_links, 1);
    }

    #[test]
    fn test_one_way_link_is_missing_backlink() {
        let (_temp, layout) = setup();
        write(&layout, "guide.md", "# Guide\n\n[notes](workflows/notes.md)\n");
        write(&layout, "workflows/notes.md", "# Notes\n");

        let report = check_links(&layout).unwrap();

        assert!(report.broken.is_empty());
        assert_eq!(report.missing_backlinks.len(), 1);
        let link = &report.missing_backlinks[0].link;
        assert_eq!(link.source, "guide.md");
        assert_eq!(link.target, "workflows/notes.md");
    }

    #[test]
    fn test_reciprocal_links_are_clean() {
        let (_temp, layout) = setup();
        write(&layout, "guide.md", "# Guide\n\n[notes](workflows/notes.md#usage)\n");
        write(&layout, "workflows/notes.md", "# Notes\n\n[back](../guide.md)\n");

        let report = check_links(&layout).unwrap();

        assert!(report.is_clean());
        assert_eq!(report.total_links, 2);
    }

    #[test]
    fn test_changelog_is_not_expected_to_link_back() {
        let (_temp, layout) = setup();
        write(&layout, "CHANGELOG.md", "## [2025-03-01]\n");
        write(&layout, "guide.md", "# Guide\n\n[changes](CHANGELOG.md)\n");

        let report = check_links(&layout).unwrap();

        assert!(report.is_clean());
    }

    #[test]
    fn test_add_backlinks_creates_references_section() {
        let (_temp, layout) = setup();
        write(&layout, "getting-started.md", "# Start\n\n[notes](workflows/notes.md)\n");
        let notes = write(&layout, "workflows/notes.md", "# Notes\n");

        let report = check_links(&layout).unwrap();
        let changed = add_backlinks(&layout, &report).unwrap();

        assert_eq!(changed.len(), 1);
        assert_eq!(
            fs::read_to_string(&notes).unwrap(),
            "# Notes\n\n## References\n\n- [Getting Started](../getting-started.md)\n"
        );
        assert!(check_links(&layout).unwrap().is_clean());
    }

    #[test]
    fn test_add_backlinks_prepends_to_existing_references() {
        let (_temp, layout) = setup();
        write(&layout, "guide.md", "# Guide\n\n[notes](workflows/notes.md)\n");
        write(&layout, "workflows/other.md", "# Other\n");
        let notes = write(
            &layout,
            "workflows/notes.md",
            "# Notes\n\n## References\n\n- [Other](other.md)\n",
        );

        let report = check_links(&layout).unwrap();
        add_backlinks(&layout, &report).unwrap();

        assert_eq!(
            fs::read_to_string(&notes).unwrap(),
            "# Notes\n\n## References\n\n- [Guide](../guide.md)\n- [Other](other.md)\n"
        );
    }

    #[test]
    fn test_relative_path_and_normalize() {
        assert_eq!(
            relative_path(Path::new("/docs/workflows/tasks"), Path::new("/docs/guide.md")),
            "../../guide.md"
        );
        assert_eq!(
            normalize(Path::new("/docs/workflows/../guide.md")),
            PathBuf::from("/docs/guide.md")
        );
    }
}

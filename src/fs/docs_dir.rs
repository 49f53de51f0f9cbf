//! Documentation tree layout and `pythia.toml` configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::fs::registry::registry_skeleton;
use crate::graph::report_skeleton;
use crate::models::WorkItemType;

/// Name of the optional config file at the project root
pub const CONFIG_FILE: &str = "pythia.toml";

/// Paths are relative to `docs_root`, which is relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub docs_root: PathBuf,
    pub workflows_dir: PathBuf,
    pub registry: PathBuf,
    pub report: PathBuf,
    pub log_dir: PathBuf,
    pub changelog: PathBuf,
    pub archive_dir: PathBuf,
    /// Also require owner/priority metadata on review and completion
    pub strict_transitions: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            docs_root: PathBuf::from(".pythia"),
            workflows_dir: PathBuf::from("workflows"),
            registry: PathBuf::from("workflows/status.md"),
            report: PathBuf::from("workflows/report.md"),
            log_dir: PathBuf::from("logs/status-changes"),
            changelog: PathBuf::from("CHANGELOG.md"),
            archive_dir: PathBuf::from("workflows/archive"),
            strict_transitions: false,
        }
    }
}

impl Config {
    /// Load `pythia.toml` from the project root, or defaults when absent.
    pub fn load(project_root: &Path) -> Result<Self> {
        let config_path = project_root.join(CONFIG_FILE);
        if !config_path.exists() {
            debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))
    }
}

/// Resolved absolute locations of everything Pythia reads and writes.
#[derive(Debug, Clone)]
pub struct DocsLayout {
    root: PathBuf,
    workflows: PathBuf,
    registry: PathBuf,
    report: PathBuf,
    log_dir: PathBuf,
    changelog: PathBuf,
    archive: PathBuf,
    strict_transitions: bool,
}

impl DocsLayout {
    pub fn new(project_root: &Path, config: &Config) -> Self {
        let root = project_root.join(&config.docs_root);
        Self {
            workflows: root.join(&config.workflows_dir),
            registry: root.join(&config.registry),
            report: root.join(&config.report),
            log_dir: root.join(&config.log_dir),
            changelog: root.join(&config.changelog),
            archive: root.join(&config.archive_dir),
            strict_transitions: config.strict_transitions,
            root,
        }
    }

    /// Load the project's config and resolve it against `project_root`.
    pub fn discover(project_root: &Path) -> Result<Self> {
        let config = Config::load(project_root)?;
        Ok(Self::new(project_root, &config))
    }

    /// Create the directory tree plus skeleton registry and report files.
    ///
    /// Existing files are left alone. Returns the paths that were created.
    pub fn initialize(&self) -> Result<Vec<PathBuf>> {
        let mut created = Vec::new();

        let mut dirs = vec![self.root.clone(), self.workflows.clone(), self.log_dir.clone()];
        dirs.extend(WorkItemType::all().iter().map(|t| self.type_dir(*t)));

        for dir in dirs {
            if !dir.exists() {
                fs::create_dir_all(&dir)
                    .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
                created.push(dir);
            }
        }

        for (path, content) in [
            (&self.registry, registry_skeleton()),
            (&self.report, report_skeleton()),
        ] {
            if path.exists() {
                continue;
            }
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
            fs::write(path, content)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            created.push(path.clone());
        }

        Ok(created)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn workflows_dir(&self) -> &Path {
        &self.workflows
    }

    pub fn type_dir(&self, item_type: WorkItemType) -> PathBuf {
        self.workflows.join(item_type.dir_name())
    }

    pub fn item_path(&self, item_type: WorkItemType, id: &str) -> PathBuf {
        self.type_dir(item_type).join(format!("{id}.md"))
    }

    pub fn registry_path(&self) -> &Path {
        &self.registry
    }

    pub fn report_path(&self) -> &Path {
        &self.report
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn changelog_path(&self) -> &Path {
        &self.changelog
    }

    pub fn archive_dir(&self) -> &Path {
        &self.archive
    }

    pub fn archive_type_dir(&self, item_type: WorkItemType) -> PathBuf {
        self.archive.join(item_type.dir_name())
    }

    pub fn strict_transitions(&self) -> bool {
        self.strict_transitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_layout_paths() {
        let layout = DocsLayout::new(Path::new("/project"), &Config::default());
        assert_eq!(layout.root(), Path::new("/project/.pythia"));
        assert_eq!(
            layout.item_path(WorkItemType::Task, "task-a"),
            PathBuf::from("/project/.pythia/workflows/tasks/task-a.md")
        );
        assert_eq!(
            layout.registry_path(),
            Path::new("/project/.pythia/workflows/status.md")
        );
        assert_eq!(
            layout.archive_type_dir(WorkItemType::Idea),
            PathBuf::from("/project/.pythia/workflows/archive/ideas")
        );
    }

    #[test]
    fn test_load_partial_config_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE),
            "docs_root = \"docs\"\nstrict_transitions = true\n",
        )
        .unwrap();

        let config = Config::load(temp.path()).unwrap();
        assert_eq!(config.docs_root, PathBuf::from("docs"));
        assert!(config.strict_transitions);
        assert_eq!(config.changelog, PathBuf::from("CHANGELOG.md"));
    }

    #[test]
    fn test_load_rejects_malformed_config() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE), "docs_root = [").unwrap();
        assert!(Config::load(temp.path()).is_err());
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let layout = DocsLayout::discover(temp.path()).unwrap();

        let created = layout.initialize().unwrap();
        assert!(created.iter().any(|p| p == layout.registry_path()));
        assert!(layout.type_dir(WorkItemType::Exploration).is_dir());

        fs::write(layout.registry_path(), "custom").unwrap();
        let created_again = layout.initialize().unwrap();
        assert!(created_again.is_empty());
        assert_eq!(fs::read_to_string(layout.registry_path()).unwrap(), "custom");
    }
}

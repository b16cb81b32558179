//! Sample configurations and throwaway article repositories.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::constants::{CONFIG_FILE, ZENODO_FILE};
use crate::paths::ProjectPaths;

/// Sample `showyourwork.yml` contents
#[derive(Clone, Debug)]
pub struct ConfigFixture {
    pub name: String,
    pub content: String,
}

impl ConfigFixture {
    /// Empty configuration; everything defaulted
    pub fn empty() -> Self {
        Self {
            name: "empty".to_string(),
            content: String::new(),
        }
    }

    /// Typical article with dependencies written as a list of mappings
    pub fn basic() -> Self {
        Self {
            name: "basic".to_string(),
            content: r"
manuscript_name: paper
verbose: true
dependencies:
  - src/scripts/plot.py:
      - src/data/results.dat
  - src/data/results.dat:
      - src/scripts/simulate.py
stamp:
  url:
    enabled: true
"
            .trim_start()
            .to_string(),
        }
    }

    /// Configuration with a valid `sync` section
    pub fn with_sync() -> Self {
        Self {
            name: "with_sync".to_string(),
            content: r"
sync:
  id: 63d2a1b0f3
  push:
    - src/tex/ms.tex
    - src/tex/figures
  pull:
    - src/tex/bib.bib
"
            .trim_start()
            .to_string(),
        }
    }

    /// Configuration whose `sync` lists share a file
    pub fn overlapping_sync() -> Self {
        Self {
            name: "overlapping_sync".to_string(),
            content: r"
sync:
  push:
    - src/tex/ms.tex
  pull:
    - src/tex/ms.tex
"
            .trim_start()
            .to_string(),
        }
    }

    /// Templated configuration exercising Tera syntax
    pub fn templated() -> Self {
        Self {
            name: "templated".to_string(),
            content: r#"
{% set figures = ["a", "b"] %}
manuscript_name: {{ "Paper" | lower }}
dependencies:
{% for fig in figures %}
  src/scripts/{{ fig }}.py: src/data/{{ fig }}.dat
{% endfor %}
"#
            .trim_start()
            .to_string(),
        }
    }

    /// Configuration with a circular dependency
    pub fn circular_dependencies() -> Self {
        Self {
            name: "circular_dependencies".to_string(),
            content: r"
dependencies:
  src/scripts/a.py: src/data/b.dat
  src/data/b.dat: src/scripts/a.py
"
            .trim_start()
            .to_string(),
        }
    }
}

/// Temporary article repository with a workflow installation next to it.
///
/// Layout:
///
/// ```text
/// <tmp>/article/              user repository
/// <tmp>/tool/workflow/...     workflow installation with LaTeX resources
/// ```
pub struct ProjectFixture {
    _temp: TempDir,
    repo: PathBuf,
    tool: PathBuf,
}

impl ProjectFixture {
    /// Creates the directory layout with two bundled LaTeX resources.
    pub fn new() -> Result<Self> {
        let temp = TempDir::new().context("Failed to create temp dir")?;
        let repo = temp.path().join("article");
        let tool = temp.path().join("tool");

        fs::create_dir_all(repo.join("src").join("tex"))?;
        let resources = tool.join("workflow").join("resources").join("tex");
        fs::create_dir_all(&resources)?;
        fs::write(resources.join("showyourwork.sty"), "% stylesheet\n")?;
        fs::write(resources.join("showyourwork.bst"), "% bibliography style\n")?;

        Ok(Self {
            _temp: temp,
            repo,
            tool,
        })
    }

    /// Article repository root
    pub fn repo(&self) -> &Path {
        &self.repo
    }

    /// Workflow installation root
    pub fn tool(&self) -> &Path {
        &self.tool
    }

    /// Layouts for this fixture
    pub fn paths(&self) -> ProjectPaths {
        ProjectPaths::new(&self.repo, &self.tool)
    }

    /// Writes `showyourwork.yml`.
    pub fn write_config(&self, config: &ConfigFixture) -> Result<PathBuf> {
        self.write_file(CONFIG_FILE, &config.content)
    }

    /// Writes `zenodo.yml`.
    pub fn write_overlay(&self, content: &str) -> Result<PathBuf> {
        self.write_file(ZENODO_FILE, content)
    }

    /// Writes a file relative to the repository root.
    pub fn write_file(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.repo.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Reads a file relative to the repository root.
    pub fn read_file(&self, relative: &str) -> Result<String> {
        let path = self.repo.join(relative);
        fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
    }

    /// Whether a file exists relative to the repository root.
    pub fn file_exists(&self, relative: &str) -> bool {
        self.repo.join(relative).exists()
    }
}

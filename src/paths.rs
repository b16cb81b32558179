//! On-disk layout of an article repository and of the workflow installation.
//!
//! The resolver records several of these locations in the configuration and
//! validates user-supplied paths (for example the `sync.push` list) against
//! them. All paths are absolute and lexically normalized on construction.

use std::path::{Path, PathBuf};

use crate::constants::{CONFIG_JSON_FILE, TEMP_DIR};
use crate::utils::fs::normalize_path;

/// Layout of the user's article repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPaths {
    /// Repository root; the pipeline runs from here.
    pub repo: PathBuf,
    /// Manuscript source root (`src/tex`). Sync files must live below it.
    pub tex: PathBuf,
    /// Analysis scripts (`src/scripts`).
    pub scripts: PathBuf,
    /// Scratch directory for generated artifacts (`.showyourwork`).
    pub temp: PathBuf,
}

impl UserPaths {
    /// Builds the standard layout below `repo`.
    ///
    /// Relative roots are resolved against the process working directory.
    pub fn new(repo: impl AsRef<Path>) -> Self {
        let repo = absolute(repo.as_ref());
        Self {
            tex: repo.join("src").join("tex"),
            scripts: repo.join("src").join("scripts"),
            temp: repo.join(TEMP_DIR),
            repo,
        }
    }

    /// Location of the resolved JSON configuration.
    #[must_use]
    pub fn config_json(&self) -> PathBuf {
        self.temp.join(CONFIG_JSON_FILE)
    }
}

/// Layout of the installed workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    /// Workflow directory handed to the orchestrator.
    pub workflow: PathBuf,
    /// Bundled resources (`workflow/resources`).
    pub resources: PathBuf,
}

impl ToolPaths {
    /// Builds the layout for an installation rooted at `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let workflow = absolute(root.as_ref()).join("workflow");
        Self {
            resources: workflow.join("resources"),
            workflow,
        }
    }

    /// Directory holding the auxiliary LaTeX support files.
    #[must_use]
    pub fn tex_resources(&self) -> PathBuf {
        self.resources.join("tex")
    }
}

/// Both layouts together, as consumed by the loader and the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    /// The article repository
    pub user: UserPaths,
    /// The workflow installation
    pub tool: ToolPaths,
}

impl ProjectPaths {
    /// Creates the layouts for an article repository and a workflow installation.
    pub fn new(repo: impl AsRef<Path>, tool_root: impl AsRef<Path>) -> Self {
        Self {
            user: UserPaths::new(repo),
            tool: ToolPaths::new(tool_root),
        }
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize_path(path)
    } else {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        normalize_path(&cwd.join(path))
    }
}

//! Command-line interface for showyourwork
//!
//! The `syw` binary is a thin front end over the configuration core, used by
//! the workflow to prepare its config files and by authors to inspect what
//! their configuration resolves to.
//!
//! # Commands
//!
//! - `render` - render the template and merge the overlay
//! - `resolve` - resolve defaults, validate and persist the configuration
//! - `deps` - print transitive dependencies of a file
//!
//! # Global Options
//!
//! - `--verbose` / `--quiet` control logging (`RUST_LOG` takes precedence)
//! - `--dir` selects the article repository (default: current directory)
//! - `--workflow-root` points at the workflow installation
//!   (`SHOWYOURWORK_ROOT`, default: the article directory)
//!
//! Logs go to stderr so the printed configuration can be piped.
//!
//! # Examples
//!
//! ```bash
//! syw render
//! syw --verbose resolve --run-type preprocess
//! syw --dir ../paper deps src/scripts/plot.py
//! ```

mod deps;
mod render;
mod resolve;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::paths::ProjectPaths;

pub use resolve::OutputFormat;

/// Settings derived from the global flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Default log filter, used when `RUST_LOG` is not set.
    pub log_level: Option<String>,
}

impl CliConfig {
    /// Create a configuration without a log level override.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default log filter.
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }

    /// Install the global tracing subscriber, writing to stderr.
    ///
    /// Does nothing if a subscriber is already installed.
    pub fn init_logging(&self) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(self.log_level.as_deref().unwrap_or("warn"))
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Main CLI structure for showyourwork.
#[derive(Parser, Debug)]
#[command(
    name = "syw",
    about = "Resolve and inspect showyourwork article configurations",
    version,
    long_about = "Renders showyourwork.yml, fills in defaults, validates it and \
                  computes file dependency closures for the article build."
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Article repository root.
    #[arg(short = 'C', long, global = true, default_value = ".")]
    dir: PathBuf,

    /// Root of the workflow installation.
    #[arg(long, global = true, env = "SHOWYOURWORK_ROOT")]
    workflow_root: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render showyourwork.yml and merge zenodo.yml.
    Render(render::RenderCommand),

    /// Resolve the configuration for a run type and print it.
    Resolve(resolve::ResolveCommand),

    /// Print the transitive dependencies of a file.
    Deps(deps::DepsCommand),
}

impl Cli {
    /// Execute the CLI with the configuration implied by its flags.
    pub fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config)
    }

    /// Build a [`CliConfig`] from the parsed arguments.
    ///
    /// ```rust
    /// use clap::Parser;
    /// use showyourwork::cli::Cli;
    ///
    /// let cli = Cli::parse_from(["syw", "--verbose", "render"]);
    /// assert_eq!(cli.build_config().log_level.as_deref(), Some("debug"));
    /// ```
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        };
        CliConfig::new().with_log_level(level)
    }

    /// Layouts selected by `--dir` and `--workflow-root`.
    #[must_use]
    pub fn project_paths(&self) -> ProjectPaths {
        let tool_root = self.workflow_root.as_ref().unwrap_or(&self.dir);
        ProjectPaths::new(&self.dir, tool_root)
    }

    /// Execute with an explicit configuration.
    pub fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();
        let paths = self.project_paths();

        match self.command {
            Commands::Render(cmd) => cmd.execute(&paths),
            Commands::Resolve(cmd) => cmd.execute(&paths),
            Commands::Deps(cmd) => cmd.execute(&paths),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_log_levels() {
        let cli = Cli::parse_from(["syw", "render"]);
        assert_eq!(cli.build_config(), CliConfig::new().with_log_level("info"));

        let cli = Cli::parse_from(["syw", "-q", "render"]);
        assert_eq!(cli.build_config().log_level.as_deref(), Some("error"));
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["syw", "-v", "-q", "render"]).is_err());
    }

    #[test]
    fn test_workflow_root_defaults_to_dir() {
        let cli = Cli::parse_from(["syw", "--dir", "/work/article", "render"]);
        let paths = cli.project_paths();
        assert_eq!(paths.tool.workflow, PathBuf::from("/work/article/workflow"));

        let cli = Cli::parse_from(["syw", "--dir", "/work/article", "--workflow-root", "/opt/syw", "deps"]);
        assert_eq!(cli.project_paths().tool.workflow, PathBuf::from("/opt/syw/workflow"));
    }

    #[test]
    fn test_run_type_argument() {
        assert!(Cli::try_parse_from(["syw", "resolve", "--run-type", "preprocess"]).is_ok());
        assert!(Cli::try_parse_from(["syw", "resolve", "--run-type", "compile"]).is_err());
    }
}

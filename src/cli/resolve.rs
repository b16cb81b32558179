//! Resolve the configuration for a run type.
//!
//! During preprocessing this renders the sources, fills in defaults,
//! validates and persists `.showyourwork/config.json`. Other run types load
//! that file and refresh the per-run fields. The resolved configuration is
//! printed to stdout.
//!
//! ```bash
//! syw resolve --run-type preprocess
//! SNAKEMAKE_RUN_TYPE=build syw resolve --format yaml
//! ```

use anyhow::Result;
use clap::{Args, ValueEnum};
use tracing::debug;

use crate::config::{RunEnv, RunType, resolve};
use crate::config::resolver::ResolveContext;
use crate::git::GitRepo;
use crate::paths::ProjectPaths;

/// Serialization used for printed configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// YAML
    Yaml,
}

impl OutputFormat {
    /// Serializes `value` in this format.
    pub fn render<T: serde::Serialize>(self, value: &T) -> Result<String> {
        Ok(match self {
            Self::Json => format!("{}\n", serde_json::to_string_pretty(value)?),
            Self::Yaml => serde_yaml::to_string(value)?,
        })
    }
}

/// Command to resolve the configuration.
#[derive(Args, Debug)]
pub struct ResolveCommand {
    /// Run type to resolve for; defaults to `SNAKEMAKE_RUN_TYPE`
    #[arg(long, value_parser = clap::value_parser!(RunType))]
    run_type: Option<RunType>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

impl ResolveCommand {
    /// Execute the resolve command for the article described by `paths`.
    pub fn execute(self, paths: &ProjectPaths) -> Result<()> {
        let mut env = RunEnv::from_env();
        if let Some(run_type) = self.run_type {
            env = env.with_run_type(run_type);
        }
        debug!("Resolving for run type {}", env.run_type);

        let repo = GitRepo::new(&paths.user.repo);
        let ctx = ResolveContext {
            paths,
            env: &env,
            repo: &repo,
            tool_version: env!("CARGO_PKG_VERSION"),
        };

        let config = resolve(env.run_type, &ctx)?;
        print!("{}", self.format.render(&config)?);
        Ok(())
    }
}

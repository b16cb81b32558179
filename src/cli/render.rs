//! Render the user configuration.
//!
//! Runs the template engine over `showyourwork.yml`, merges `zenodo.yml` and
//! records the result in `.showyourwork/showyourwork.yml`. The merged
//! document is also printed, so the command doubles as a way to check what a
//! template expands to.
//!
//! ```bash
//! syw render
//! syw --dir path/to/article render --quiet
//! ```

use anyhow::Result;
use clap::Args;

use crate::config::render_config;
use crate::paths::ProjectPaths;

/// Command to render and merge the configuration sources.
#[derive(Args, Debug)]
pub struct RenderCommand {
    /// Only write the merged file, don't print it
    #[arg(long)]
    no_print: bool,
}

impl RenderCommand {
    /// Execute the render command for the article described by `paths`.
    pub fn execute(self, paths: &ProjectPaths) -> Result<()> {
        let config = render_config(&paths.user.repo, &paths.user)?;
        if !self.no_print {
            print!("{}", serde_yaml::to_string(&config)?);
        }
        Ok(())
    }
}

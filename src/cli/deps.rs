//! Show the transitive dependencies of a file.
//!
//! Reads the `dependencies` section of the resolved configuration (or of the
//! rendered sources when the article has not been preprocessed yet) and
//! prints every file the given file needs, one per line. Without a file, the
//! closure of every declared file is printed as a mapping.
//!
//! ```bash
//! syw deps src/scripts/plot.py
//! syw deps --format yaml
//! ```

use anyhow::Result;
use clap::Args;
use std::collections::BTreeSet;

use super::resolve::OutputFormat;
use crate::config::{Config, load_resolved, render_config};
use crate::dependencies::{closure, closure_map, dependency_map_from_config};
use crate::paths::ProjectPaths;

/// Command to print dependency closures.
#[derive(Args, Debug)]
pub struct DepsCommand {
    /// File to inspect, as written in the configuration
    file: Option<String>,

    /// Output format when printing all closures
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

impl DepsCommand {
    /// Execute the deps command for the article described by `paths`.
    pub fn execute(self, paths: &ProjectPaths) -> Result<()> {
        let config = load_config(paths)?;
        let map = dependency_map_from_config(&config)?;

        match self.file {
            Some(file) => {
                let deps: BTreeSet<String> = closure(&file, &map)?.into_iter().collect();
                for dep in deps {
                    println!("{dep}");
                }
            }
            None => print!("{}", self.format.render(&closure_map(&map)?)?),
        }
        Ok(())
    }
}

fn load_config(paths: &ProjectPaths) -> Result<Config> {
    if paths.user.config_json().exists() {
        load_resolved(&paths.user)
    } else {
        render_config(&paths.user.repo, &paths.user)
    }
}

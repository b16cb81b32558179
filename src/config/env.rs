//! Run type and CI detection from the process environment.

use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::constants::{CI_ENV, CI_RUN_ID_ENV, RUN_TYPE_ENV};

/// The phase of the pipeline that is currently executing.
///
/// Only [`RunType::Preprocess`] fills in defaults; every other run type
/// re-derives the per-run fields on an already resolved configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunType {
    /// File cleanup
    Clean,
    /// Main article build
    Build,
    /// Archival tarball export
    Tarball,
    /// Preprocessing; the configuration is resolved from scratch
    Preprocess,
    /// Anything else (DAG rendering, ad hoc invocations)
    #[default]
    Other,
}

impl RunType {
    /// Name used in the environment variable.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::Build => "build",
            Self::Tarball => "tarball",
            Self::Preprocess => "preprocess",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for RunType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clean" => Ok(Self::Clean),
            "build" => Ok(Self::Build),
            "tarball" => Ok(Self::Tarball),
            "preprocess" => Ok(Self::Preprocess),
            "other" => Ok(Self::Other),
            other => Err(format!(
                "unknown run type '{other}' (expected clean, build, tarball, preprocess or other)"
            )),
        }
    }
}

/// Settings read from the execution environment on every run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunEnv {
    /// Current run type
    pub run_type: RunType,
    /// Whether we are running on a CI runner
    pub ci: bool,
    /// CI run identifier, empty outside CI
    pub ci_run_id: String,
}

impl RunEnv {
    /// Reads the run environment from process environment variables.
    ///
    /// An unrecognized run type is treated as [`RunType::Other`].
    #[must_use]
    pub fn from_env() -> Self {
        let run_type = match std::env::var(RUN_TYPE_ENV) {
            Ok(value) => value.parse().unwrap_or_else(|err: String| {
                warn!("{RUN_TYPE_ENV}: {err}; assuming 'other'");
                RunType::Other
            }),
            Err(_) => RunType::Other,
        };

        Self {
            run_type,
            ci: std::env::var(CI_ENV).is_ok_and(|value| value == "true"),
            ci_run_id: std::env::var(CI_RUN_ID_ENV).unwrap_or_default(),
        }
    }

    /// Same environment with a different run type.
    #[must_use]
    pub fn with_run_type(mut self, run_type: RunType) -> Self {
        self.run_type = run_type;
        self
    }
}

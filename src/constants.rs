//! Global constants used throughout the showyourwork codebase.
//!
//! File names, environment variable names and the fixed values that end up
//! in the resolved configuration. Keeping them here makes the on-disk layout
//! of an article repository discoverable in one place.

/// Templated user configuration at the root of the article repository.
pub const CONFIG_FILE: &str = "showyourwork.yml";

/// Optional overlay holding archival cache settings.
pub const ZENODO_FILE: &str = "zenodo.yml";

/// Scratch directory inside the article repository.
pub const TEMP_DIR: &str = ".showyourwork";

/// Name of the resolved configuration written for the main build stage.
pub const CONFIG_JSON_FILE: &str = "config.json";

/// Environment variable selecting the current run type.
pub const RUN_TYPE_ENV: &str = "SNAKEMAKE_RUN_TYPE";

/// Environment variable set to `"true"` on continuous integration runners.
pub const CI_ENV: &str = "CI";

/// Environment variable holding the CI run identifier.
pub const CI_RUN_ID_ENV: &str = "GITHUB_RUN_ID";

/// Maximum nesting depth accepted by the normalizer.
pub const MAX_NORMALIZE_DEPTH: usize = 30;

/// Main LaTeX style sheet shipped with the workflow.
pub const STYLESHEET: &str = "showyourwork.tex";

/// Generated metadata style sheet.
pub const STYLESHEET_META_FILE: &str = "showyourwork-metadata.tex";

/// Host fragment collapsed and replaced by an icon in the stamp text.
pub const STAMP_HOST: &str = "github.com";

/// Markup that replaces [`STAMP_HOST`] in the stamp text.
pub const STAMP_HOST_ICON: &str = r"{\faGithub}";

/// Stamp version shown for pre-release builds.
pub const DEV_VERSION_LABEL: &str = "dev";

/// Placeholder used when repository metadata is unavailable.
pub const UNKNOWN: &str = "unknown";

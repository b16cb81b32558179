//! Error handling for showyourwork
//!
//! The configuration core has exactly one fatal failure mode that users are
//! expected to fix by editing their configuration: [`SywError::ConfigError`].
//! Every validation step in the resolver raises it synchronously and the
//! current invocation is aborted; there is no retry and no partial success.
//!
//! Errors that originate in collaborators (Tera template rendering, YAML
//! parsing) are not wrapped. They travel through [`anyhow::Error`] unchanged
//! so the caller sees exactly what the collaborator reported.
//!
//! # Error Categories
//!
//! - **Configuration**: [`SywError::ConfigError`], [`SywError::ConfigNotFound`]
//! - **Dependencies**: [`SywError::CircularDependency`]
//! - **Version control**: [`SywError::GitNotFound`], [`SywError::GitCommandError`]
//!
//! Use [`user_friendly_error`] to turn any error into an [`ErrorContext`] with
//! a suggestion suitable for printing from the command line.
//!
//! # Examples
//!
//! ```rust,no_run
//! use showyourwork::core::{SywError, user_friendly_error};
//!
//! let error = SywError::ConfigError {
//!     message: "The `sync.push` field must be a list.".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for showyourwork operations.
#[derive(Error, Debug)]
pub enum SywError {
    /// Configuration could not be parsed or failed validation.
    ///
    /// Raised for normalization depth overruns, malformed `sync` and
    /// `typesetting_args` entries, files outside the manuscript source tree
    /// and overlapping push/pull lists.
    #[error("Error parsing the config. {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// Configuration file missing from the working directory
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// Path that was expected to contain the configuration
        path: String,
    },

    /// The user-declared dependency map contains a cycle.
    ///
    /// `chain` lists the files along the cycle, starting and ending with the
    /// same file, e.g. `src/scripts/a.py → src/data/b.dat → src/scripts/a.py`.
    #[error("Circular dependency through file {}", .chain.first().map(String::as_str).unwrap_or("<unknown>"))]
    CircularDependency {
        /// Files along the cycle
        chain: Vec<String>,
    },

    /// Git executable not found in PATH
    #[error("Git is not installed or not found in PATH")]
    GitNotFound,

    /// Git command returned a non-zero exit code
    #[error("Git operation failed: {operation}")]
    GitCommandError {
        /// The git operation that failed (e.g., "rev-parse", "remote get-url")
        operation: String,
        /// The error output from the git command
        stderr: String,
    },

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl SywError {
    /// Shorthand for building a [`SywError::ConfigError`].
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }
}

/// Error context wrapper that adds details and a suggestion to a [`SywError`].
///
/// When displayed, errors show the main message in red, details in yellow and
/// the suggestion in green.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: SywError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: SywError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error context to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`].
///
/// Recognizes [`SywError`] variants, Tera template errors and YAML parse
/// errors; anything else is reported with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let error = match error.downcast::<SywError>() {
        Ok(syw_error) => return create_error_context(syw_error),
        Err(other) => other,
    };

    if let Some(yaml_error) = error.downcast_ref::<serde_yaml::Error>() {
        let location = yaml_error
            .location()
            .map(|loc| format!(" (line {}, column {})", loc.line(), loc.column()))
            .unwrap_or_default();
        return ErrorContext::new(SywError::config(format!("Invalid YAML{location}: {yaml_error}")))
            .with_suggestion("Check the YAML syntax in showyourwork.yml. Verify indentation and that list items start with '-'")
            .with_details("The configuration is parsed after template rendering, so line numbers refer to the rendered file");
    }

    if error.downcast_ref::<tera::Error>().is_some() {
        return ErrorContext::new(SywError::Other {
            message: format_chain(&error),
        })
        .with_suggestion(
            "Check template syntax: variables use {{ var }}, comments use {# #}, control flow uses {% %}",
        )
        .with_details("showyourwork.yml is rendered as a template before it is parsed");
    }

    ErrorContext::new(SywError::Other {
        message: format_chain(&error),
    })
}

/// Render an error with its cause chain, one cause per line.
fn format_chain(error: &anyhow::Error) -> String {
    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    message
}

fn create_error_context(error: SywError) -> ErrorContext {
    match &error {
        SywError::ConfigError { .. } => ErrorContext::new(error)
            .with_suggestion("Fix the offending entry in showyourwork.yml and re-run the build"),

        SywError::ConfigNotFound { path } => {
            let suggestion = if path.ends_with("config.json") {
                "Resolve the configuration with `syw resolve --run-type preprocess` first"
            } else {
                "Run the build from the root of an article repository containing showyourwork.yml"
            };
            ErrorContext::new(error).with_suggestion(suggestion)
        }

        SywError::CircularDependency { chain } => {
            let details = format!("Dependency chain: {}", chain.join(" → "));
            ErrorContext::new(error)
                .with_details(details)
                .with_suggestion("Remove one of the edges in the `dependencies` section of showyourwork.yml")
        }

        SywError::GitNotFound => ErrorContext::new(error)
            .with_suggestion("Install git from https://git-scm.com/ or your package manager")
            .with_details("Repository metadata (commit, branch, remote) is read with the git command"),

        SywError::GitCommandError { stderr, .. } => {
            let details = stderr.trim().to_string();
            ErrorContext::new(error)
                .with_details(details)
                .with_suggestion("Make sure the article is a git repository with an `origin` remote")
        }

        SywError::Other { .. } => ErrorContext::new(error),
    }
}

//! Builder for the read-only git commands used to collect repository metadata.
//!
//! Every command runs with `-C <dir>` so it is independent of the process
//! working directory. Commands are synchronous: metadata lookup happens once
//! per invocation, before the configuration is resolved.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::core::SywError;
use crate::utils::platform::get_git_command;

/// A git invocation under construction.
#[derive(Debug, Default, Clone)]
pub struct GitCommand {
    /// Arguments passed to git, e.g. `["rev-parse", "HEAD"]`
    args: Vec<String>,

    /// Working directory passed via `-C`
    current_dir: Option<PathBuf>,
}

impl GitCommand {
    /// Creates an empty command.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the repository directory the command runs in.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Adds a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Adds several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Runs the command and returns its trimmed standard output.
    ///
    /// # Errors
    ///
    /// - [`SywError::GitNotFound`] when the git executable cannot be spawned
    /// - [`SywError::GitCommandError`] when git exits with a non-zero status
    pub fn execute_stdout(self) -> Result<String> {
        let git_command = get_git_command();

        let mut full_args = Vec::new();
        if let Some(ref dir) = self.current_dir {
            full_args.push("-C".to_string());
            full_args.push(dir.display().to_string());
        }
        full_args.extend(self.args.iter().cloned());

        tracing::debug!(target: "git", "Executing command: {} {}", git_command, full_args.join(" "));

        let output = match Command::new(git_command)
            .args(&full_args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
        {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SywError::GitNotFound.into());
            }
            Err(e) => {
                return Err(e).context(format!("Failed to execute git {}", full_args.join(" ")));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            tracing::debug!(
                target: "git",
                "Command failed with exit code {:?}: {}",
                output.status.code(),
                stderr.trim()
            );
            return Err(SywError::GitCommandError {
                operation: self.args.join(" "),
                stderr,
            }
            .into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

// Convenience builders for the metadata queries

impl GitCommand {
    /// `git rev-parse HEAD`
    pub fn current_commit() -> Self {
        Self::new().args(["rev-parse", "HEAD"])
    }

    /// `git remote get-url origin`
    pub fn remote_url() -> Self {
        Self::new().args(["remote", "get-url", "origin"])
    }

    /// `git rev-parse --abbrev-ref HEAD`; prints `HEAD` when detached
    pub fn current_branch() -> Self {
        Self::new().args(["rev-parse", "--abbrev-ref", "HEAD"])
    }

    /// `git describe --tags --exact-match HEAD`; fails when HEAD is untagged
    pub fn exact_tag() -> Self {
        Self::new().args(["describe", "--tags", "--exact-match", "HEAD"])
    }
}

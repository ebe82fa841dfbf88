// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Publishing copied files (stage, commit, push)

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::{debug, info};

use crate::{AppConfig, Result, VislibError};

/// Makes a batch of newly copied files durable and publicly retrievable.
/// Reports a single aggregate success or failure for the whole batch.
pub trait Publisher {
    fn publish(&self, files: &[PathBuf], message: &str) -> Result<()>;
}

/// Publishes through the `git` command line in the destination repository
pub struct GitPublisher {
    repo: PathBuf,
    remote: String,
    branch: String,
}

impl GitPublisher {
    pub fn new(repo: impl Into<PathBuf>, remote: &str, branch: &str) -> Self {
        Self {
            repo: repo.into(),
            remote: remote.to_string(),
            branch: branch.to_string(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.destination_root(), &config.publish.remote, &config.publish.branch)
    }

    fn git(&self, args: &[&str], paths: &[&Path]) -> Result<Output> {
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.repo)
            .args(args)
            .args(paths)
            .output()
            .map_err(|e| VislibError::Publish(format!("git {}: {}", args.join(" "), e)))?;
        debug!("git {} exited with {}", args.join(" "), output.status);
        Ok(output)
    }

    fn git_checked(&self, args: &[&str], paths: &[&Path]) -> Result<()> {
        let output = self.git(args, paths)?;
        if !output.status.success() {
            return Err(VislibError::Publish(format!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }

    /// Paths relative to the repository, as git expects them after `-C`
    fn repo_relative<'a>(&self, files: &'a [PathBuf]) -> Vec<&'a Path> {
        files
            .iter()
            .map(|f| f.strip_prefix(&self.repo).unwrap_or(f.as_path()))
            .collect()
    }
}

impl Publisher for GitPublisher {
    fn publish(&self, files: &[PathBuf], message: &str) -> Result<()> {
        if files.is_empty() {
            return Ok(());
        }

        let paths = self.repo_relative(files);
        self.git_checked(&["add", "--"], &paths)?;

        // Exit status 0 means nothing is staged (files were already committed)
        let staged = self.git(&["diff", "--cached", "--quiet"], &[])?;
        if staged.status.success() {
            info!("Nothing new to commit; pushing existing history");
        } else {
            self.git_checked(&["commit", "-m", message], &[])?;
        }

        self.git_checked(&["push", self.remote.as_str(), self.branch.as_str()], &[])?;
        info!("Published {} files to {}/{}", files.len(), self.remote, self.branch);
        Ok(())
    }
}

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::{GitFlowError, Result};

/// Runs the `git` executable inside a repository work tree
#[derive(Debug, Clone)]
pub struct GitCli {
    work_tree: PathBuf,
    program: String,
}

impl GitCli {
    /// Create a runner for the given work tree
    pub fn new<P: AsRef<Path>>(work_tree: P) -> Self {
        GitCli {
            work_tree: work_tree.as_ref().to_path_buf(),
            program: "git".to_string(),
        }
    }

    /// Use a different git executable (e.g. an absolute path)
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

impl super::Runner for GitCli {
    fn run_with(&self, args: &[&str], tolerate_failure: bool) -> Result<String> {
        debug!(cwd = %self.work_tree.display(), "git {}", args.join(" "));

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(&self.work_tree)
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .map_err(|e| GitFlowError::CommandFailure {
                command: args.join(" "),
                exit_code: None,
                stderr: format!("cannot execute {}: {}", self.program, e),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

        if output.status.success() || tolerate_failure {
            return Ok(stdout);
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        debug!(exit_code = ?output.status.code(), "git {} failed: {}", args.join(" "), stderr);

        Err(GitFlowError::CommandFailure {
            command: args.join(" "),
            exit_code: output.status.code(),
            stderr,
        })
    }
}

//! Repository discovery
//!
//! Resolves the repository a command operates on, once, at startup. The
//! resulting [Workspace] is passed explicitly to every component that needs
//! a path.

use std::path::{Path, PathBuf};

use git2::Repository;
use tracing::debug;

use crate::error::{GitFlowError, Result};
use crate::git::GitCli;

/// Directory (relative to the work tree root) holding git-flow state
pub const CONFIG_DIR: &str = ".git_flow";

/// File name of the workflow configuration inside [CONFIG_DIR]
pub const CONFIG_FILE: &str = "config.toml";

/// Location of a repository and its git-flow configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Walk up from `start` to the enclosing repository.
    ///
    /// Handles linked worktrees (where `.git` is a file). Bare repositories
    /// are rejected because the workflow needs a work tree.
    pub fn discover<P: AsRef<Path>>(start: P) -> Result<Self> {
        let start = start.as_ref();
        let repo = Repository::discover(start).map_err(|e| {
            GitFlowError::NotARepository(format!("{}: {}", start.display(), e.message()))
        })?;

        let root = repo
            .workdir()
            .ok_or_else(|| {
                GitFlowError::NotARepository(format!(
                    "{} is a bare repository",
                    repo.path().display()
                ))
            })?
            .to_path_buf();
        let root = strip_trailing_separator(root);

        debug!(root = %root.display(), git_dir = %repo.path().display(), "discovered repository");
        Ok(Workspace { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the structured configuration file
    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// A git runner bound to this work tree
    pub fn runner(&self) -> GitCli {
        GitCli::new(&self.root)
    }
}

fn strip_trailing_separator(path: PathBuf) -> PathBuf {
    path.components().collect()
}

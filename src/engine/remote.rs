use tracing::info;

use super::Engine;
use crate::domain::{Branch, BranchCategory};
use crate::error::{GitFlowError, Result};
use crate::git::mutator::validate_name;
use crate::git::Runner;

/// Outcome of `publish` and `track`
#[derive(Debug, Clone, PartialEq)]
pub struct PublishReport {
    pub branch: Branch,
    pub remote: String,
}

impl<R: Runner> Engine<R> {
    /// Push a local branch to its remote for the first time, tracking it
    /// unless the category's `track` setting is off
    pub fn publish(&self, category: BranchCategory, identifier: &str) -> Result<PublishReport> {
        self.lifecycle_rules(category, "publish")?;
        let branch = self.remote_branch(category, identifier)?;
        let remote = self.config.remote_for(category).to_string();

        self.require_clean()?;
        self.require_branch(&branch.name)?;

        let mutator = self.mutator();
        mutator.fetch(&remote, None)?;
        if self.inspector().remote_branch_exists(&remote, &branch.name) {
            return Err(GitFlowError::BranchAlreadyExists(format!(
                "{}/{}",
                remote, branch.name
            )));
        }

        info!(branch = %branch, remote = %remote, "publishing");
        mutator.push(&remote, &format!("{0}:refs/heads/{0}", branch.name))?;
        if self.config.tracks_on_publish(category) {
            mutator.fetch(&remote, None)?;
            mutator.set_remote_tracking(&branch.name, &remote)?;
        }
        mutator.checkout(&branch.name)?;
        Ok(PublishReport { branch, remote })
    }

    /// Create a local tracking branch from the remote copy
    pub fn track(&self, category: BranchCategory, identifier: &str) -> Result<PublishReport> {
        self.lifecycle_rules(category, "track")?;
        let branch = self.remote_branch(category, identifier)?;
        let remote = self.config.remote_for(category).to_string();

        self.require_clean()?;
        if self.inspector().branch_exists(&branch.name) {
            return Err(GitFlowError::BranchAlreadyExists(branch.name));
        }

        let mutator = self.mutator();
        mutator.fetch(&remote, None)?;
        if !self.inspector().remote_branch_exists(&remote, &branch.name) {
            return Err(GitFlowError::BranchNotFound(format!(
                "{}/{}",
                remote, branch.name
            )));
        }

        info!(branch = %branch, remote = %remote, "tracking");
        mutator.checkout_tracking(&branch.name, &remote)?;
        Ok(PublishReport { branch, remote })
    }

    fn remote_branch(&self, category: BranchCategory, identifier: &str) -> Result<Branch> {
        if identifier.trim().is_empty() {
            return Err(GitFlowError::missing("identifier"));
        }
        let branch = self.config.branch(category, identifier);
        validate_name(&branch.name)?;
        Ok(branch)
    }
}

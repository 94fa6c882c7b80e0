use tracing::info;

use super::Engine;
use crate::domain::{Branch, BranchCategory};
use crate::error::{GitFlowError, Result};
use crate::git::mutator::validate_name;
use crate::git::Runner;

/// Outcome of pulling a feature branch from a remote
#[derive(Debug, Clone, PartialEq)]
pub struct PullOutcome {
    pub branch: Branch,
    /// The local branch did not exist and was created from the remote
    pub created: bool,
}

impl<R: Runner> Engine<R> {
    /// The feature named by `identifier`, or the checked-out feature branch
    fn feature_branch(&self, identifier: Option<&str>, operation: &str) -> Result<Branch> {
        let prefix = self.config.prefix(BranchCategory::Feature);
        let branch = match identifier.filter(|id| !id.trim().is_empty()) {
            Some(id) => self.config.branch(BranchCategory::Feature, id),
            None => {
                let current = self.inspector().current_branch()?;
                Branch::from_name(BranchCategory::Feature, prefix, &current).ok_or_else(|| {
                    GitFlowError::missing(format!(
                        "feature name for {} (not on a feature branch)",
                        operation
                    ))
                })?
            }
        };
        validate_name(&branch.name)?;
        Ok(branch)
    }

    fn require_feature(&self, category: BranchCategory, operation: &str) -> Result<()> {
        if category == BranchCategory::Feature {
            Ok(())
        } else {
            Err(GitFlowError::unsupported(category.as_str(), operation))
        }
    }

    /// Changes on a feature branch since it forked from develop
    pub fn diff(&self, category: BranchCategory, identifier: Option<&str>) -> Result<String> {
        self.require_feature(category, "diff")?;
        let branch = self.feature_branch(identifier, "diff")?;
        self.require_branch(&branch.name)?;

        let inspector = self.inspector();
        let base = inspector.merge_base(&self.config.develop_branch, &branch.name)?;
        let on_branch = inspector.current_branch()? == branch.name;

        // The checked-out branch also shows uncommitted changes
        let range = if on_branch {
            base
        } else {
            format!("{}..{}", base, branch.name)
        };
        self.runner.run(&["diff", &range])
    }

    /// Rebase a feature branch onto develop
    pub fn rebase(&self, category: BranchCategory, identifier: Option<&str>) -> Result<Branch> {
        self.require_feature(category, "rebase")?;
        let branch = self.feature_branch(identifier, "rebase")?;
        self.require_clean()?;
        self.require_branch(&branch.name)?;

        info!(branch = %branch, "rebasing onto {}", self.config.develop_branch);
        let mutator = self.mutator();
        mutator.checkout(&branch.name)?;
        mutator.rebase(&self.config.develop_branch)?;
        Ok(branch)
    }

    /// Pull a feature branch from `remote`, creating it locally when absent
    pub fn pull_feature(
        &self,
        category: BranchCategory,
        remote: &str,
        identifier: Option<&str>,
        rebase: bool,
    ) -> Result<PullOutcome> {
        self.require_feature(category, "pull")?;
        validate_name(remote)?;
        let branch = self.feature_branch(identifier, "pull")?;
        self.require_clean()?;

        let mutator = self.mutator();
        if self.inspector().branch_exists(&branch.name) {
            info!(branch = %branch, remote = %remote, "pulling");
            mutator.checkout(&branch.name)?;
            mutator.pull(remote, &branch.name, rebase)?;
            return Ok(PullOutcome {
                branch,
                created: false,
            });
        }

        info!(branch = %branch, remote = %remote, "creating from remote");
        mutator.fetch(remote, Some(&branch.name))?;
        mutator.branch_from(&branch.name, "FETCH_HEAD")?;
        mutator.checkout(&branch.name)?;
        Ok(PullOutcome {
            branch,
            created: true,
        })
    }

    /// Pull for any category: perpetual branches pull themselves, feature
    /// branches need a remote
    pub fn pull(
        &self,
        category: BranchCategory,
        remote: Option<&str>,
        identifier: Option<&str>,
        rebase: bool,
    ) -> Result<String> {
        if category.is_perpetual() {
            return self.pull_perpetual(category, remote, rebase);
        }
        self.require_feature(category, "pull")?;
        let remote = remote.ok_or_else(|| GitFlowError::missing("remote"))?;
        Ok(self
            .pull_feature(category, remote, identifier, rebase)?
            .branch
            .name)
    }
}

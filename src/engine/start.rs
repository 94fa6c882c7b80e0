use tracing::info;

use super::Engine;
use crate::domain::{BaseRule, Branch, BranchCategory, CategoryRules};
use crate::error::{GitFlowError, Result};
use crate::git::mutator::validate_name;
use crate::git::Runner;

/// Outcome of a successful `start`
#[derive(Debug, Clone, PartialEq)]
pub struct StartReport {
    pub branch: Branch,
    pub base: String,
}

impl<R: Runner> Engine<R> {
    /// Create a branch of `category` named by `identifier` and check it out.
    ///
    /// Every precondition is verified before the branch is created, so a
    /// failed start leaves the repository untouched.
    pub fn start(
        &self,
        category: BranchCategory,
        identifier: &str,
        base: Option<&str>,
    ) -> Result<StartReport> {
        let rules = self.lifecycle_rules(category, "start")?;
        if identifier.trim().is_empty() {
            return Err(GitFlowError::missing("identifier"));
        }

        let branch = self.config.branch(category, identifier);
        validate_name(&branch.name)?;
        let base = self.resolve_base(&rules, identifier, base)?;
        validate_name(&base)?;

        self.check_start(&branch, &rules, &base)?;

        info!(branch = %branch, base = %base, "starting {} branch", category);
        self.mutator().create_branch(&branch.name, &base)?;
        Ok(StartReport { branch, base })
    }

    fn resolve_base(
        &self,
        rules: &CategoryRules,
        identifier: &str,
        base: Option<&str>,
    ) -> Result<String> {
        if let Some(base) = base.filter(|b| !b.trim().is_empty()) {
            return Ok(base.trim().to_string());
        }

        match rules.base {
            BaseRule::Develop => Ok(self.config.develop_branch.clone()),
            BaseRule::Main => Ok(self.config.main_branch.clone()),
            BaseRule::Explicit => Err(GitFlowError::missing("base")),
            BaseRule::ParentFeature => self.task_parent(identifier),
        }
    }

    fn check_start(&self, branch: &Branch, rules: &CategoryRules, base: &str) -> Result<()> {
        let inspector = self.inspector();
        self.require_clean()?;

        if inspector.branch_exists(&branch.name) {
            return Err(GitFlowError::BranchAlreadyExists(branch.name.clone()));
        }

        if rules.single_in_flight {
            if let Some(other) = self.local_branches(branch.category)?.first() {
                return Err(GitFlowError::BranchAlreadyExists(other.name.clone()));
            }
        }

        if rules.versioned {
            let tag = self.config.tag_pattern().format(&branch.identifier);
            if inspector.tag_exists(&tag) {
                return Err(GitFlowError::TagAlreadyExists(tag));
            }
        }

        if rules.base == BaseRule::ParentFeature {
            self.require_branch(&self.task_parent(&branch.identifier)?)?;
        }
        self.require_branch(base)?;

        if rules.base_on_main && !inspector.is_merged_into(base, &self.config.main_branch) {
            return Err(GitFlowError::BaseNotOnBranch {
                base: base.to_string(),
                branch: self.config.main_branch.clone(),
            });
        }
        Ok(())
    }
}

//! Branch-lifecycle engine
//!
//! [Engine] holds a runner and the resolved [WorkflowConfig] and implements
//! every branch operation on top of [Inspector] and [Mutator]. Preconditions
//! are checked before the first mutation; the repository is re-queried on
//! every call and nothing about its state is cached.
//!
//! Operations are split by concern:
//!
//! - `start` - creating branches
//! - `finish` - merging, tagging and deleting
//! - `list` - listing branches with their status
//! - `remote` - publish and track
//! - `perpetual` - checkout, pull, push, merge and sync for main/develop
//! - `feature` - diff, rebase and pull for feature branches

mod feature;
mod finish;
mod list;
mod perpetual;
mod remote;
mod start;

pub use feature::PullOutcome;
pub use finish::{FinishOptions, FinishReport};
pub use list::BranchEntry;
pub use remote::PublishReport;
pub use start::StartReport;

use crate::config::ConfigFile;
use crate::domain::{Branch, BranchCategory, CategoryRules};
use crate::error::{GitFlowError, Result};
use crate::git::{Inspector, Mutator, Runner};
use crate::workflow::WorkflowConfig;

/// Runs lifecycle operations against one repository
pub struct Engine<R> {
    runner: R,
    config: WorkflowConfig,
}

impl<R: Runner> Engine<R> {
    pub fn new(runner: R, config: WorkflowConfig) -> Self {
        Engine { runner, config }
    }

    /// Build an engine from the persisted configuration
    pub fn from_config_file(runner: R, file: &ConfigFile) -> Result<Self> {
        Ok(Engine::new(runner, WorkflowConfig::from_config(file)?))
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub(crate) fn inspector(&self) -> Inspector<&R> {
        Inspector::new(&self.runner)
    }

    pub(crate) fn mutator(&self) -> Mutator<&R> {
        Mutator::new(&self.runner)
    }

    /// Rules of a non-perpetual category; perpetual ones do not support `operation`
    fn lifecycle_rules(&self, category: BranchCategory, operation: &str) -> Result<CategoryRules> {
        category
            .rules()
            .ok_or_else(|| GitFlowError::unsupported(category.as_str(), operation))
    }

    fn require_clean(&self) -> Result<()> {
        if self.inspector().is_clean_working_tree() {
            Ok(())
        } else {
            Err(GitFlowError::DirtyWorkingTree)
        }
    }

    fn require_branch(&self, name: &str) -> Result<()> {
        if self.inspector().branch_exists(name) {
            Ok(())
        } else {
            Err(GitFlowError::BranchNotFound(name.to_string()))
        }
    }

    /// Local branches of `category`, identified by prefix
    fn local_branches(&self, category: BranchCategory) -> Result<Vec<Branch>> {
        let prefix = self.config.prefix(category);
        Ok(self
            .inspector()
            .list_branches(false)?
            .iter()
            .filter_map(|name| Branch::from_name(category, prefix, name))
            .collect())
    }

    /// Feature branch a task identifier `<feature>/<task>` belongs to
    fn task_parent(&self, identifier: &str) -> Result<String> {
        let feature = Branch::task_parent(identifier).ok_or_else(|| {
            GitFlowError::missing(format!(
                "parent feature in task '{}' (expected <feature>/<task>)",
                identifier
            ))
        })?;
        Ok(self.config.branch(BranchCategory::Feature, feature).name)
    }

    /// Branch a simple category merges into on finish
    fn parent_of(&self, branch: &Branch) -> Result<String> {
        match branch.category {
            BranchCategory::Task => self.task_parent(&branch.identifier),
            _ => Ok(self.config.develop_branch.clone()),
        }
    }
}

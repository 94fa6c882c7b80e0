use super::Engine;
use crate::domain::{compare_versions, Branch, BranchCategory, BranchStatus, ListTarget};
use crate::error::Result;
use crate::git::{Comparison, Runner};

/// One line of a branch listing
#[derive(Debug, Clone, PartialEq)]
pub struct BranchEntry {
    pub branch: Branch,
    pub is_current: bool,
    /// Only computed for verbose listings
    pub status: Option<BranchStatus>,
}

impl<R: Runner> Engine<R> {
    /// Local branches of `category`, with their status when `verbose`
    pub fn list(&self, category: BranchCategory, verbose: bool) -> Result<Vec<BranchEntry>> {
        let rules = self.lifecycle_rules(category, "list")?;
        let current = self.inspector().current_branch().unwrap_or_default();

        let mut branches = self.local_branches(category)?;
        if rules.versioned || category == BranchCategory::Support {
            branches.sort_by(|a, b| compare_versions(&a.identifier, &b.identifier));
        } else {
            branches.sort_by(|a, b| a.name.cmp(&b.name));
        }

        branches
            .into_iter()
            .map(|branch| -> Result<BranchEntry> {
                let status = if verbose {
                    Some(self.status_of(&branch, rules.list_target)?)
                } else {
                    None
                };
                Ok(BranchEntry {
                    is_current: branch.name == current,
                    branch,
                    status,
                })
            })
            .collect()
    }

    fn list_target_name(&self, branch: &Branch, target: ListTarget) -> String {
        match target {
            ListTarget::Develop => self.config.develop_branch.clone(),
            ListTarget::Main => self.config.main_branch.clone(),
            ListTarget::ParentFeature => self
                .task_parent(&branch.identifier)
                .ok()
                .filter(|parent| self.inspector().branch_exists(parent))
                .unwrap_or_else(|| self.config.develop_branch.clone()),
        }
    }

    fn status_of(&self, branch: &Branch, target: ListTarget) -> Result<BranchStatus> {
        let inspector = self.inspector();
        let target = self.list_target_name(branch, target);

        let comparison = inspector.compare(&branch.name, &target)?;
        match comparison {
            Comparison::Equal => return Ok(BranchStatus::NoCommitsYet),
            Comparison::NoCommonAncestor => return Ok(BranchStatus::UnrelatedHistory),
            _ => {}
        }

        if branch.category == BranchCategory::Feature {
            return Ok(match comparison {
                Comparison::AFastForwardable => BranchStatus::BehindDevelop,
                Comparison::BFastForwardable => BranchStatus::BasedOnLatestDevelop,
                _ => BranchStatus::MayBeRebased,
            });
        }

        let base = inspector.merge_base(
            &inspector.rev_parse(&branch.name)?,
            &inspector.rev_parse(&target)?,
        )?;
        let described = match inspector.describe_with_tag(&base) {
            Some(tag) => tag,
            None => inspector.short_sha(&base)?,
        };
        Ok(BranchStatus::BasedOn(described))
    }
}

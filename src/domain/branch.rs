use std::fmt;

use crate::domain::BranchCategory;

/// A workflow branch: its category, identifier, and full git name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub category: BranchCategory,
    pub identifier: String,
    pub name: String,
}

impl Branch {
    /// Build a branch name as `prefix + identifier`
    pub fn new(category: BranchCategory, prefix: &str, identifier: impl Into<String>) -> Self {
        let identifier = identifier.into();
        Branch {
            category,
            name: format!("{}{}", prefix, identifier),
            identifier,
        }
    }

    /// A perpetual branch, which has a fixed name and no identifier
    pub fn perpetual(category: BranchCategory, name: impl Into<String>) -> Self {
        let name = name.into();
        Branch {
            category,
            identifier: name.clone(),
            name,
        }
    }

    /// Recover a branch from its full name when it carries `prefix`
    pub fn from_name(category: BranchCategory, prefix: &str, name: &str) -> Option<Self> {
        let identifier = name.strip_prefix(prefix)?;
        if identifier.is_empty() {
            return None;
        }
        Some(Branch::new(category, prefix, identifier))
    }

    /// Feature part of a task identifier `<feature>/<task>`
    pub fn task_parent(identifier: &str) -> Option<&str> {
        match identifier.split_once('/') {
            Some((feature, task)) if !feature.is_empty() && !task.is_empty() => Some(feature),
            _ => None,
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Where a branch stands relative to its upstream target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchStatus {
    /// Tip equals the target's tip
    NoCommitsYet,
    /// Feature tip is an ancestor of develop
    BehindDevelop,
    /// Feature forks from develop's current tip
    BasedOnLatestDevelop,
    /// Feature forks from an older develop commit
    MayBeRebased,
    /// Forks from the target at the named tag or commit
    BasedOn(String),
    /// No merge base with the target
    UnrelatedHistory,
}

impl fmt::Display for BranchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BranchStatus::NoCommitsYet => write!(f, "no commits yet"),
            BranchStatus::BehindDevelop => write!(f, "is behind develop, may ff"),
            BranchStatus::BasedOnLatestDevelop => write!(f, "based on latest develop"),
            BranchStatus::MayBeRebased => write!(f, "may be rebased"),
            BranchStatus::BasedOn(base) => write!(f, "based on {}", base),
            BranchStatus::UnrelatedHistory => write!(f, "unrelated history"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_name_from_prefix() {
        let branch = Branch::new(BranchCategory::Feature, "feature/", "login");
        assert_eq!(branch.name, "feature/login");
        assert_eq!(branch.identifier, "login");
        assert_eq!(branch.to_string(), "feature/login");
    }

    #[test]
    fn test_from_name_strips_prefix() {
        let branch = Branch::from_name(BranchCategory::Release, "release/", "release/1.2").unwrap();
        assert_eq!(branch.identifier, "1.2");
        assert!(Branch::from_name(BranchCategory::Release, "release/", "hotfix/1.2").is_none());
        assert!(Branch::from_name(BranchCategory::Release, "release/", "release/").is_none());
    }

    #[test]
    fn test_perpetual_branch() {
        let branch = Branch::perpetual(BranchCategory::Main, "main");
        assert_eq!(branch.name, "main");
        assert_eq!(branch.identifier, "main");
    }

    #[test]
    fn test_task_parent() {
        assert_eq!(Branch::task_parent("login/validate"), Some("login"));
        assert_eq!(Branch::task_parent("login/form/validate"), Some("login"));
        assert_eq!(Branch::task_parent("login"), None);
        assert_eq!(Branch::task_parent("/validate"), None);
        assert_eq!(Branch::task_parent("login/"), None);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(BranchStatus::NoCommitsYet.to_string(), "no commits yet");
        assert_eq!(
            BranchStatus::BehindDevelop.to_string(),
            "is behind develop, may ff"
        );
        assert_eq!(
            BranchStatus::BasedOnLatestDevelop.to_string(),
            "based on latest develop"
        );
        assert_eq!(BranchStatus::MayBeRebased.to_string(), "may be rebased");
        assert_eq!(
            BranchStatus::BasedOn("v1.0".into()).to_string(),
            "based on v1.0"
        );
    }
}

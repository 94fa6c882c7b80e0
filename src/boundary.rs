use std::fmt;

/// Non-fatal conditions met while running a lifecycle operation.
/// The step is skipped and the warning reported to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryWarning {
    /// The branch is already contained in the merge target
    AlreadyMerged { branch: String, target: String },
    /// The version tag exists from an earlier run
    TagAlreadyPresent { tag: String },
    /// No remote-tracking copy of the branch exists to delete
    RemoteBranchMissing { remote: String, branch: String },
    /// Branch was squash-merged, so it is deleted with force
    SquashedBranchForceDeleted { branch: String },
    /// Branch names come from defaults because init never ran
    NotInitialized,
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::AlreadyMerged { branch, target } => {
                write!(
                    f,
                    "Branch '{}' is already merged into '{}', skipping merge",
                    branch, target
                )
            }
            BoundaryWarning::TagAlreadyPresent { tag } => {
                write!(f, "Tag '{}' already exists, skipping tag", tag)
            }
            BoundaryWarning::RemoteBranchMissing { remote, branch } => {
                write!(
                    f,
                    "Remote '{}' has no branch '{}', nothing to delete",
                    remote, branch
                )
            }
            BoundaryWarning::SquashedBranchForceDeleted { branch } => {
                write!(f, "Branch '{}' was squash-merged and force-deleted", branch)
            }
            BoundaryWarning::NotInitialized => write!(
                f,
                "git-flow is not initialized in this repository, using default branch names (run 'git-flow setup init')"
            ),
        }
    }
}

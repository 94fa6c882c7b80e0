//! Git access layer
//!
//! Everything git-flow knows about a repository comes from running `git`
//! commands in its work tree. This module splits that access in three:
//!
//! - [Runner]: executes a single git command and returns its stdout
//! - [Inspector]: read-only queries (branches, tags, merge bases, tree state)
//! - [Mutator]: state-changing operations (branches, merges, tags, remotes)
//!
//! The concrete runners are:
//!
//! - [runner::GitCli]: runs the `git` executable in a work tree
//! - [mock::MockRunner]: scripted responses for unit tests
//!
//! Inspector and Mutator are generic over [Runner], so lifecycle logic can be
//! exercised against the mock without a repository on disk.
//!
//! ```rust
//! # use git_flow::git::{Inspector, MockRunner};
//! let runner = MockRunner::new();
//! runner.respond(&["branch", "--show-current"], "develop\n");
//! let inspector = Inspector::new(&runner);
//! assert_eq!(inspector.current_branch().unwrap(), "develop");
//! ```

pub mod inspector;
pub mod mock;
pub mod mutator;
pub mod runner;

pub use inspector::{Comparison, Inspector};
pub use mock::MockRunner;
pub use mutator::{Mutator, TagOptions};
pub use runner::GitCli;

use crate::error::Result;

/// Executes git commands against one repository
///
/// The runner has no knowledge of which commands mutate state; callers
/// decide that. Implementations must run every command in the same work
/// tree.
pub trait Runner {
    /// Run `git <args>` and return its standard output
    ///
    /// # Arguments
    /// * `args` - Arguments passed to git (e.g. `["rev-parse", "HEAD"]`)
    /// * `tolerate_failure` - When true, a non-zero exit returns the captured
    ///   stdout instead of an error
    ///
    /// # Returns
    /// * `Ok(String)` - Captured stdout, untrimmed
    /// * `Err(GitFlowError::CommandFailure)` - Non-zero exit when not tolerated
    fn run_with(&self, args: &[&str], tolerate_failure: bool) -> Result<String>;

    /// Run `git <args>`, failing on non-zero exit
    fn run(&self, args: &[&str]) -> Result<String> {
        self.run_with(args, false)
    }

    /// Run `git <args>` and report only whether it succeeded
    ///
    /// Errors of any kind become `false`.
    fn succeeds(&self, args: &[&str]) -> bool {
        self.run(args).is_ok()
    }
}

impl<R: Runner + ?Sized> Runner for &R {
    fn run_with(&self, args: &[&str], tolerate_failure: bool) -> Result<String> {
        (**self).run_with(args, tolerate_failure)
    }
}

use tracing::info;

use super::Engine;
use crate::domain::BranchCategory;
use crate::error::{GitFlowError, Result};
use crate::git::mutator::validate_name;
use crate::git::Runner;

impl<R: Runner> Engine<R> {
    /// Name of main or develop; other categories do not support `operation`
    fn perpetual_branch(&self, category: BranchCategory, operation: &str) -> Result<String> {
        self.config
            .perpetual_name(category)
            .map(str::to_string)
            .ok_or_else(|| GitFlowError::unsupported(category.as_str(), operation))
    }

    pub fn checkout(&self, category: BranchCategory) -> Result<String> {
        let name = self.perpetual_branch(category, "checkout")?;
        self.require_branch(&name)?;
        self.mutator().checkout(&name)?;
        Ok(name)
    }

    /// Check out a perpetual branch and pull it from `remote` (or the
    /// category's configured upstream)
    pub fn pull_perpetual(
        &self,
        category: BranchCategory,
        remote: Option<&str>,
        rebase: bool,
    ) -> Result<String> {
        let name = self.perpetual_branch(category, "pull")?;
        let remote = remote.unwrap_or_else(|| self.config.upstream_for(category));
        validate_name(remote)?;
        self.require_clean()?;
        self.require_branch(&name)?;

        info!(branch = %name, remote = %remote, "pulling");
        let mutator = self.mutator();
        mutator.checkout(&name)?;
        mutator.pull(remote, &name, rebase)?;
        Ok(name)
    }

    pub fn push_perpetual(&self, category: BranchCategory, tags: bool) -> Result<String> {
        let name = self.perpetual_branch(category, "push")?;
        self.require_branch(&name)?;
        let remote = self.config.remote_for(category);

        let mutator = self.mutator();
        mutator.push(remote, &name)?;
        if tags {
            mutator.push_tags(remote)?;
        }
        Ok(name)
    }

    /// Merge `source` into a perpetual branch, with a merge commit unless
    /// `allow_ff`
    pub fn merge(&self, category: BranchCategory, source: &str, allow_ff: bool) -> Result<String> {
        let name = self.perpetual_branch(category, "merge")?;
        validate_name(source)?;
        self.require_clean()?;
        self.require_branch(&name)?;
        self.require_branch(source)?;

        let mutator = self.mutator();
        mutator.checkout(&name)?;
        mutator.merge_into(&name, source, !allow_ff)?;
        Ok(name)
    }

    /// Bring develop up to date with main
    pub fn sync(&self, category: BranchCategory) -> Result<String> {
        if category != BranchCategory::Develop {
            return Err(GitFlowError::unsupported(category.as_str(), "sync"));
        }
        let main = self.config.main_branch.clone();
        if self
            .inspector()
            .is_merged_into(&main, &self.config.develop_branch)
        {
            info!("{} already contains {}", self.config.develop_branch, main);
            return Ok(self.config.develop_branch.clone());
        }
        self.merge(category, &main, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::*;
    use crate::git::MockRunner;
    use crate::workflow::WorkflowConfig;

    fn engine(runner: &MockRunner) -> Engine<&MockRunner> {
        Engine::new(runner, WorkflowConfig::default())
    }

    #[test]
    fn test_checkout_perpetual() {
        let runner = MockRunner::new();
        assert_eq!(engine(&runner).checkout(BranchCategory::Main).unwrap(), "main");
        assert!(runner.was_called(&["checkout", "main"]));
    }

    #[test]
    fn test_checkout_other_category_is_unsupported() {
        let runner = MockRunner::new();
        let err = engine(&runner).checkout(BranchCategory::Feature).unwrap_err();
        assert!(err.is_unsupported());
    }

    #[test]
    fn test_pull_with_rebase() {
        let runner = MockRunner::new();
        engine(&runner)
            .pull_perpetual(BranchCategory::Develop, None, true)
            .unwrap();
        assert!(runner.was_called(&["checkout", "develop"]));
        assert!(runner.was_called(&["pull", "--rebase", "origin", "develop"]));

        engine(&runner)
            .pull_perpetual(BranchCategory::Main, Some("upstream"), false)
            .unwrap();
        assert!(runner.was_called(&["pull", "--no-rebase", "upstream", "main"]));
    }

    #[test]
    fn test_pull_defaults_to_configured_upstream() {
        let runner = MockRunner::new();
        let mut config = WorkflowConfig::default();
        config
            .remotes
            .get_mut(&BranchCategory::Develop)
            .unwrap()
            .upstream = "canonical".into();

        Engine::new(&runner, config)
            .pull_perpetual(BranchCategory::Develop, None, false)
            .unwrap();
        assert!(runner.was_called(&["pull", "--no-rebase", "canonical", "develop"]));
    }

    #[test]
    fn test_push_with_tags() {
        let runner = MockRunner::new();
        engine(&runner)
            .push_perpetual(BranchCategory::Main, true)
            .unwrap();
        assert!(runner.was_called(&["push", "origin", "main"]));
        assert!(runner.was_called(&["push", "--tags", "origin"]));
    }

    #[test]
    fn test_merge_into_main() {
        let runner = MockRunner::new();
        engine(&runner)
            .merge(BranchCategory::Main, "develop", false)
            .unwrap();
        assert!(runner.was_called(&["checkout", "main"]));
        assert!(runner.was_called(&["merge", "--no-edit", "--no-ff", "develop"]));

        engine(&runner)
            .merge(BranchCategory::Develop, "main", true)
            .unwrap();
        assert!(runner.was_called(&["merge", "--no-edit", "main"]));
    }

    #[test]
    fn test_merge_missing_source() {
        let runner = MockRunner::new();
        script_missing(&runner, "topic");
        let err = engine(&runner)
            .merge(BranchCategory::Develop, "topic", false)
            .unwrap_err();
        assert!(matches!(err, GitFlowError::BranchNotFound(ref b) if b == "topic"));
        assert!(!runner.ran_subcommand("checkout"));
    }

    #[test]
    fn test_sync_merges_main_into_develop() {
        let runner = MockRunner::new();
        script_contains(&runner, "main", &["main"]);
        engine(&runner).sync(BranchCategory::Develop).unwrap();
        assert!(runner.was_called(&["checkout", "develop"]));
        assert!(runner.was_called(&["merge", "--no-edit", "--no-ff", "main"]));
    }

    #[test]
    fn test_sync_is_noop_when_up_to_date() {
        let runner = MockRunner::new();
        script_contains(&runner, "main", &["develop", "main"]);
        engine(&runner).sync(BranchCategory::Develop).unwrap();
        assert!(!runner.ran_subcommand("merge"));
    }

    #[test]
    fn test_sync_main_is_unsupported() {
        let runner = MockRunner::new();
        assert!(engine(&runner)
            .sync(BranchCategory::Main)
            .unwrap_err()
            .is_unsupported());
    }
}

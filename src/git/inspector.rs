use crate::error::Result;
use crate::git::Runner;

/// Relationship between the tips of two refs `a` and `b`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Both refs point at the same commit
    Equal,
    /// `a` is an ancestor of `b`; `a` can fast-forward to `b`
    AFastForwardable,
    /// `b` is an ancestor of `a`; `b` can fast-forward to `a`
    BFastForwardable,
    /// The refs have diverged and need a merge commit
    NeedsMerge,
    /// No merge base could be computed
    NoCommonAncestor,
}

/// Read-only repository queries
pub struct Inspector<R> {
    runner: R,
}

/// Branch names from `git branch` output, with the current/worktree
/// markers and detached-HEAD lines removed.
pub(crate) fn parse_branch_lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(|line| line.trim_start_matches(['*', '+']).trim())
        .filter(|name| !name.is_empty() && !name.starts_with('(') && !name.contains(" -> "))
        .map(str::to_string)
        .collect()
}

impl<R: Runner> Inspector<R> {
    pub fn new(runner: R) -> Self {
        Inspector { runner }
    }

    /// Name of the checked-out branch (empty when HEAD is detached)
    pub fn current_branch(&self) -> Result<String> {
        Ok(self
            .runner
            .run(&["branch", "--show-current"])?
            .trim()
            .to_string())
    }

    /// True iff there are neither unstaged nor staged-uncommitted changes.
    ///
    /// Fails closed: any error from git counts as "not clean".
    pub fn is_clean_working_tree(&self) -> bool {
        self.runner.succeeds(&["diff", "--no-ext-diff", "--quiet", "--exit-code"])
            && self
                .runner
                .succeeds(&["diff-index", "--cached", "--quiet", "HEAD", "--"])
    }

    /// True when the index differs from HEAD. Errors count as staged so a
    /// following commit surfaces them.
    pub fn has_staged_changes(&self) -> bool {
        !self
            .runner
            .succeeds(&["diff", "--cached", "--quiet", "--exit-code"])
    }

    /// True iff `name` resolves to a commit. Errors count as absence.
    pub fn branch_exists(&self, name: &str) -> bool {
        self.runner
            .succeeds(&["rev-parse", "--verify", "--quiet", &format!("{}^{{commit}}", name)])
    }

    /// True iff the remote-tracking branch `<remote>/<branch>` exists locally
    pub fn remote_branch_exists(&self, remote: &str, branch: &str) -> bool {
        self.runner.succeeds(&[
            "rev-parse",
            "--verify",
            "--quiet",
            &format!("refs/remotes/{}/{}", remote, branch),
        ])
    }

    /// Local branches, or remote-tracking branches when `remote` is set
    pub fn list_branches(&self, remote: bool) -> Result<Vec<String>> {
        let mut args = vec!["branch", "--no-color"];
        if remote {
            args.push("-r");
        }
        Ok(parse_branch_lines(&self.runner.run(&args)?))
    }

    pub fn list_tags(&self) -> Result<Vec<String>> {
        Ok(self
            .runner
            .run(&["tag", "--list"])?
            .lines()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect())
    }

    pub fn tag_exists(&self, name: &str) -> bool {
        self.runner.succeeds(&[
            "rev-parse",
            "--verify",
            "--quiet",
            &format!("refs/tags/{}", name),
        ])
    }

    /// True iff `base` is among the branches containing the tip of `subject`.
    ///
    /// Errors count as "not merged".
    pub fn is_merged_into(&self, subject: &str, base: &str) -> bool {
        match self.runner.run(&["branch", "--no-color", "--contains", subject]) {
            Ok(output) => parse_branch_lines(&output).iter().any(|b| b == base),
            Err(_) => false,
        }
    }

    /// Full commit id of `reference`
    pub fn rev_parse(&self, reference: &str) -> Result<String> {
        Ok(self
            .runner
            .run(&["rev-parse", "--verify", &format!("{}^{{commit}}", reference)])?
            .trim()
            .to_string())
    }

    /// Abbreviated commit id of `reference`
    pub fn short_sha(&self, reference: &str) -> Result<String> {
        Ok(self
            .runner
            .run(&["rev-parse", "--short", reference])?
            .trim()
            .to_string())
    }

    pub fn merge_base(&self, a: &str, b: &str) -> Result<String> {
        Ok(self.runner.run(&["merge-base", a, b])?.trim().to_string())
    }

    /// Name of a tag reaching `commit` (e.g. `v1.0` or `v1.0~2`), if any
    pub fn describe_with_tag(&self, commit: &str) -> Option<String> {
        self.runner
            .run(&["name-rev", "--tags", "--no-undefined", "--name-only", commit])
            .ok()
            .map(|out| out.trim().to_string())
            .filter(|name| !name.is_empty())
    }

    /// Classify how the tips of `a` and `b` relate
    pub fn compare(&self, a: &str, b: &str) -> Result<Comparison> {
        let commit_a = self.rev_parse(a)?;
        let commit_b = self.rev_parse(b)?;

        if commit_a == commit_b {
            return Ok(Comparison::Equal);
        }

        let base = match self.merge_base(&commit_a, &commit_b) {
            Ok(base) => base,
            Err(_) => return Ok(Comparison::NoCommonAncestor),
        };

        Ok(if base == commit_a {
            Comparison::AFastForwardable
        } else if base == commit_b {
            Comparison::BFastForwardable
        } else {
            Comparison::NeedsMerge
        })
    }

    /// Value of a git config key, `None` when unset
    pub fn config_get(&self, key: &str) -> Option<String> {
        self.runner
            .run(&["config", "--get", key])
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// True when HEAD points at a commit
    pub fn has_commits(&self) -> bool {
        self.runner.succeeds(&["rev-parse", "--quiet", "--verify", "HEAD"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockRunner;

    #[test]
    fn test_parse_branch_lines() {
        let output = "  develop\n* feature/login\n+ feature/wt\n  (HEAD detached at 1a2b3c)\n";
        assert_eq!(
            parse_branch_lines(output),
            vec!["develop", "feature/login", "feature/wt"]
        );
    }

    #[test]
    fn test_parse_remote_branch_lines_skips_symbolic_head() {
        let output = "  origin/HEAD -> origin/main\n  origin/main\n  origin/develop\n";
        assert_eq!(
            parse_branch_lines(output),
            vec!["origin/main", "origin/develop"]
        );
    }

    #[test]
    fn test_clean_tree_fails_closed() {
        let runner = MockRunner::new();
        runner.fail(
            &["diff-index", "--cached", "--quiet", "HEAD", "--"],
            "fatal: bad revision 'HEAD'",
        );
        assert!(!Inspector::new(&runner).is_clean_working_tree());
    }

    #[test]
    fn test_branch_exists_fails_closed() {
        let runner = MockRunner::new();
        runner.fail(
            &["rev-parse", "--verify", "--quiet", "feature/x^{commit}"],
            "",
        );
        let inspector = Inspector::new(&runner);
        assert!(!inspector.branch_exists("feature/x"));
        assert!(inspector.branch_exists("develop"));
    }

    #[test]
    fn test_is_merged_into_strips_current_marker() {
        let runner = MockRunner::new();
        runner.respond(
            &["branch", "--no-color", "--contains", "release/1.0"],
            "* main\n  release/1.0\n",
        );
        let inspector = Inspector::new(&runner);
        assert!(inspector.is_merged_into("release/1.0", "main"));
        assert!(!inspector.is_merged_into("release/1.0", "develop"));
    }

    fn script_tips(runner: &MockRunner, a: &str, b: &str) {
        runner.respond(&["rev-parse", "--verify", "a^{commit}"], format!("{}\n", a));
        runner.respond(&["rev-parse", "--verify", "b^{commit}"], format!("{}\n", b));
    }

    #[test]
    fn test_compare_equal() {
        let runner = MockRunner::new();
        script_tips(&runner, "111", "111");
        assert_eq!(
            Inspector::new(&runner).compare("a", "b").unwrap(),
            Comparison::Equal
        );
        assert!(!runner.ran_subcommand("merge-base"));
    }

    #[test]
    fn test_compare_fast_forward_both_directions() {
        let runner = MockRunner::new();
        script_tips(&runner, "111", "222");
        runner.respond(&["merge-base", "111", "222"], "111\n");
        assert_eq!(
            Inspector::new(&runner).compare("a", "b").unwrap(),
            Comparison::AFastForwardable
        );

        runner.respond(&["merge-base", "111", "222"], "222\n");
        assert_eq!(
            Inspector::new(&runner).compare("a", "b").unwrap(),
            Comparison::BFastForwardable
        );
    }

    #[test]
    fn test_compare_needs_merge() {
        let runner = MockRunner::new();
        script_tips(&runner, "111", "222");
        runner.respond(&["merge-base", "111", "222"], "000\n");
        assert_eq!(
            Inspector::new(&runner).compare("a", "b").unwrap(),
            Comparison::NeedsMerge
        );
    }

    #[test]
    fn test_compare_without_merge_base() {
        let runner = MockRunner::new();
        script_tips(&runner, "111", "222");
        runner.fail(&["merge-base", "111", "222"], "");
        assert_eq!(
            Inspector::new(&runner).compare("a", "b").unwrap(),
            Comparison::NoCommonAncestor
        );
    }

    #[test]
    fn test_describe_with_tag_falls_back_to_none() {
        let runner = MockRunner::new();
        runner.fail(
            &["name-rev", "--tags", "--no-undefined", "--name-only", "abc"],
            "cannot describe",
        );
        assert_eq!(Inspector::new(&runner).describe_with_tag("abc"), None);
    }

    #[test]
    fn test_config_get_unset_is_none() {
        let runner = MockRunner::new();
        runner.fail(&["config", "--get", "workflow.branch.main"], "");
        runner.respond(&["config", "--get", "workflow.branch.develop"], "develop\n");
        let inspector = Inspector::new(&runner);
        assert_eq!(inspector.config_get("workflow.branch.main"), None);
        assert_eq!(
            inspector.config_get("workflow.branch.develop").as_deref(),
            Some("develop")
        );
    }
}

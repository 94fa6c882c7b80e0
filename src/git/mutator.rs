use std::sync::OnceLock;

use regex::Regex;
use tracing::info;

use crate::error::{GitFlowError, Result};
use crate::git::{Inspector, Runner};

/// Options for creating a tag
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagOptions {
    pub annotated: bool,
    pub signed: bool,
    pub signing_key: Option<String>,
    pub message: Option<String>,
}

fn name_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9_.\-/]+$").ok())
        .as_ref()
}

/// Checks a branch or ref name against the allowed character set
/// (letters, digits, `_`, `-`, `.`, `/`).
pub fn validate_name(name: &str) -> Result<()> {
    if name_pattern().is_some_and(|re| re.is_match(name)) {
        Ok(())
    } else {
        Err(GitFlowError::InvalidName(name.to_string()))
    }
}

/// State-changing repository operations
pub struct Mutator<R> {
    runner: R,
}

impl<R: Runner> Mutator<R> {
    pub fn new(runner: R) -> Self {
        Mutator { runner }
    }

    /// Create `name` at `base` and check it out.
    ///
    /// Both names are validated before git is invoked.
    pub fn create_branch(&self, name: &str, base: &str) -> Result<()> {
        validate_name(name)?;
        validate_name(base)?;
        info!("creating branch {} from {}", name, base);
        self.runner.run(&["checkout", "-b", name, base])?;
        Ok(())
    }

    pub fn checkout(&self, branch: &str) -> Result<()> {
        self.runner.run(&["checkout", branch])?;
        Ok(())
    }

    /// Merge `source` into the checked-out branch `current`.
    ///
    /// Refuses to run on a dirty working tree. Always records a merge
    /// commit unless `no_ff` is false.
    pub fn merge_into(&self, current: &str, source: &str, no_ff: bool) -> Result<()> {
        validate_name(source)?;
        if !Inspector::new(&self.runner).is_clean_working_tree() {
            return Err(GitFlowError::DirtyWorkingTree);
        }

        info!("merging {} into {}", source, current);
        let mut args = vec!["merge", "--no-edit"];
        if no_ff {
            args.push("--no-ff");
        }
        args.push(source);
        self.runner.run(&args)?;
        Ok(())
    }

    /// Squash `source` onto the checked-out branch and commit the result.
    ///
    /// Returns false without committing when the squash stages nothing,
    /// i.e. `current` already holds every change of `source`.
    pub fn squash_merge(&self, current: &str, source: &str) -> Result<bool> {
        validate_name(source)?;
        let inspector = Inspector::new(&self.runner);
        if !inspector.is_clean_working_tree() {
            return Err(GitFlowError::DirtyWorkingTree);
        }

        info!("squash-merging {} into {}", source, current);
        self.runner.run(&["merge", "--squash", source])?;
        if !inspector.has_staged_changes() {
            info!("{} already contains the changes of {}", current, source);
            return Ok(false);
        }
        self.runner.run(&["commit", "--no-edit"])?;
        Ok(true)
    }

    /// Delete a local branch; unmerged branches are refused unless `force`
    pub fn delete_branch(&self, name: &str, force: bool) -> Result<()> {
        info!("deleting branch {}", name);
        self.runner
            .run(&["branch", if force { "-D" } else { "-d" }, name])?;
        Ok(())
    }

    /// Create tag `name` pointing at `target`.
    ///
    /// Annotated and signed tags always carry a message so git never
    /// opens an editor; it defaults to the tag name.
    pub fn tag(&self, name: &str, target: &str, options: &TagOptions) -> Result<()> {
        validate_name(name)?;

        let mut args: Vec<&str> = vec!["tag"];
        let needs_message = options.annotated || options.signed || options.signing_key.is_some();
        if options.annotated {
            args.push("-a");
        }
        if options.signed {
            args.push("-s");
        }
        if let Some(key) = options.signing_key.as_deref() {
            args.extend(["-u", key]);
        }
        let message = options.message.as_deref().unwrap_or(name);
        if needs_message || options.message.is_some() {
            args.extend(["-m", message]);
        }
        args.extend([name, target]);

        info!("tagging {} as {}", target, name);
        self.runner.run(&args)?;
        Ok(())
    }

    pub fn push(&self, remote: &str, refspec: &str) -> Result<()> {
        info!("pushing {} to {}", refspec, remote);
        self.runner.run(&["push", remote, refspec])?;
        Ok(())
    }

    pub fn push_tags(&self, remote: &str) -> Result<()> {
        info!("pushing tags to {}", remote);
        self.runner.run(&["push", "--tags", remote])?;
        Ok(())
    }

    pub fn delete_remote_branch(&self, remote: &str, branch: &str) -> Result<()> {
        info!("deleting {}/{}", remote, branch);
        self.runner.run(&["push", remote, &format!(":refs/heads/{}", branch)])?;
        Ok(())
    }

    pub fn fetch(&self, remote: &str, branch: Option<&str>) -> Result<()> {
        let mut args = vec!["fetch", "--quiet", remote];
        if let Some(branch) = branch {
            args.push(branch);
        }
        self.runner.run(&args)?;
        Ok(())
    }

    pub fn pull(&self, remote: &str, branch: &str, rebase: bool) -> Result<()> {
        let mut args = vec!["pull"];
        args.push(if rebase { "--rebase" } else { "--no-rebase" });
        args.extend([remote, branch]);
        self.runner.run(&args)?;
        Ok(())
    }

    pub fn rebase(&self, onto: &str) -> Result<()> {
        self.runner.run(&["rebase", onto])?;
        Ok(())
    }

    /// Point `branch`'s upstream at `<remote>/<branch>`
    pub fn set_remote_tracking(&self, branch: &str, remote: &str) -> Result<()> {
        self.config_set(&format!("branch.{}.remote", branch), remote)?;
        self.config_set(
            &format!("branch.{}.merge", branch),
            &format!("refs/heads/{}", branch),
        )
    }

    /// Create a local branch from `<remote>/<branch>` with tracking enabled
    pub fn checkout_tracking(&self, branch: &str, remote: &str) -> Result<()> {
        validate_name(branch)?;
        self.runner.run(&[
            "checkout",
            "--track",
            "-b",
            branch,
            &format!("{}/{}", remote, branch),
        ])?;
        Ok(())
    }

    pub fn config_set(&self, key: &str, value: &str) -> Result<()> {
        self.runner.run(&["config", key, value])?;
        Ok(())
    }

    /// Add `name` pointing at `url`, or repoint it when it already exists
    pub fn set_remote_url(&self, name: &str, url: &str) -> Result<()> {
        validate_name(name)?;
        if self.runner.succeeds(&["remote", "get-url", name]) {
            self.runner.run(&["remote", "set-url", name, url])?;
        } else {
            self.runner.run(&["remote", "add", name, url])?;
        }
        Ok(())
    }

    pub fn init(&self) -> Result<()> {
        self.runner.run(&["init", "--quiet"])?;
        Ok(())
    }

    pub fn symbolic_head(&self, branch: &str) -> Result<()> {
        validate_name(branch)?;
        self.runner
            .run(&["symbolic-ref", "HEAD", &format!("refs/heads/{}", branch)])?;
        Ok(())
    }

    pub fn commit_empty(&self, message: &str) -> Result<()> {
        self.runner
            .run(&["commit", "--allow-empty", "--quiet", "-m", message])?;
        Ok(())
    }

    /// Create `name` at `base` without checking it out
    pub fn branch_from(&self, name: &str, base: &str) -> Result<()> {
        validate_name(name)?;
        validate_name(base)?;
        info!("creating branch {} at {}", name, base);
        self.runner.run(&["branch", name, base])?;
        Ok(())
    }
}

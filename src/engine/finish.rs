use tracing::{debug, info};

use super::Engine;
use crate::boundary::BoundaryWarning;
use crate::domain::{Branch, BranchCategory, FinishProtocol};
use crate::error::{GitFlowError, Result};
use crate::git::mutator::validate_name;
use crate::git::{Runner, TagOptions};

/// Flags accepted by `finish`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinishOptions {
    /// Push the integration branches (and tags) and delete the remote copy
    pub push: bool,
    /// Keep the branch after merging
    pub keep: bool,
    /// Do not create the version tag
    pub no_tag: bool,
    pub sign: bool,
    pub signing_key: Option<String>,
    pub tag_message: Option<String>,
    /// Squash the branch into a single commit on each target
    pub squash: bool,
}

/// What a `finish` run did
#[derive(Debug, Clone, PartialEq)]
pub struct FinishReport {
    pub branch: Branch,
    /// Targets merged into during this run, in order
    pub merged_into: Vec<String>,
    pub tag: Option<String>,
    pub deleted: bool,
    pub pushed: bool,
    pub warnings: Vec<BoundaryWarning>,
}

impl FinishReport {
    fn new(branch: Branch) -> Self {
        FinishReport {
            branch,
            merged_into: Vec::new(),
            tag: None,
            deleted: false,
            pushed: false,
            warnings: Vec::new(),
        }
    }

    fn warn(&mut self, warning: BoundaryWarning) {
        debug!("{}", warning);
        self.warnings.push(warning);
    }
}

impl<R: Runner> Engine<R> {
    /// Merge a finished branch into its targets, tag it when versioned,
    /// and delete it.
    ///
    /// Each step first checks whether it already happened, so running
    /// `finish` again after a partial failure picks up where it stopped.
    pub fn finish(
        &self,
        category: BranchCategory,
        identifier: &str,
        options: &FinishOptions,
    ) -> Result<FinishReport> {
        let rules = self.lifecycle_rules(category, "finish")?;
        if rules.finish == FinishProtocol::LongLived {
            return Err(GitFlowError::unsupported(category.as_str(), "finish"));
        }
        if identifier.trim().is_empty() {
            return Err(GitFlowError::missing("identifier"));
        }

        let branch = self.config.branch(category, identifier);
        validate_name(&branch.name)?;
        self.require_branch(&branch.name)?;
        self.require_clean()?;

        let mut report = FinishReport::new(branch.clone());
        let targets = match rules.finish {
            FinishProtocol::MainTagDevelop => {
                let main = self.config.main_branch.clone();
                let develop = self.config.develop_branch.clone();
                self.merge_step(&branch, &main, options, &mut report)?;
                self.tag_step(&branch, options, &mut report)?;
                self.merge_step(&branch, &develop, options, &mut report)?;
                vec![main, develop]
            }
            _ => {
                let parent = self.parent_of(&branch)?;
                self.require_branch(&parent)?;
                self.merge_step(&branch, &parent, options, &mut report)?;
                vec![parent]
            }
        };

        // Last target is where the user lands after finishing
        let landing = targets.last().cloned().unwrap_or_default();
        if !options.keep {
            self.delete_step(&branch, &landing, options, &mut report)?;
        }

        if options.push || self.config.push_on_finish(category) {
            self.push_step(&branch, &targets, options, &mut report)?;
        }

        info!(branch = %branch, "finished {} branch", category);
        Ok(report)
    }

    fn merge_step(
        &self,
        branch: &Branch,
        target: &str,
        options: &FinishOptions,
        report: &mut FinishReport,
    ) -> Result<()> {
        if self.inspector().is_merged_into(&branch.name, target) {
            report.warn(BoundaryWarning::AlreadyMerged {
                branch: branch.name.clone(),
                target: target.to_string(),
            });
            return Ok(());
        }

        let mutator = self.mutator();
        mutator.checkout(target)?;
        if options.squash {
            // A squash leaves no ancestry behind; an empty squash means an
            // earlier run already landed it
            if !mutator.squash_merge(target, &branch.name)? {
                report.warn(BoundaryWarning::AlreadyMerged {
                    branch: branch.name.clone(),
                    target: target.to_string(),
                });
                return Ok(());
            }
        } else {
            mutator.merge_into(target, &branch.name, true)?;
        }
        report.merged_into.push(target.to_string());
        Ok(())
    }

    /// Tag the branch tip; runs strictly between the main and develop merges
    fn tag_step(
        &self,
        branch: &Branch,
        options: &FinishOptions,
        report: &mut FinishReport,
    ) -> Result<()> {
        if options.no_tag {
            return Ok(());
        }

        let tag = self.config.tag_pattern().format(&branch.identifier);
        if self.inspector().tag_exists(&tag) {
            report.warn(BoundaryWarning::TagAlreadyPresent { tag });
            return Ok(());
        }

        let tag_options = TagOptions {
            annotated: true,
            signed: options.sign,
            signing_key: options.signing_key.clone(),
            message: options.tag_message.clone(),
        };
        self.mutator().tag(&tag, &branch.name, &tag_options)?;
        report.tag = Some(tag);
        Ok(())
    }

    fn delete_step(
        &self,
        branch: &Branch,
        landing: &str,
        options: &FinishOptions,
        report: &mut FinishReport,
    ) -> Result<()> {
        let inspector = self.inspector();
        let mutator = self.mutator();

        if inspector.current_branch()? == branch.name {
            mutator.checkout(landing)?;
        }

        // Squashed history is invisible to git's merge check
        let force = options.squash || inspector.is_merged_into(&branch.name, landing);
        if options.squash {
            report.warn(BoundaryWarning::SquashedBranchForceDeleted {
                branch: branch.name.clone(),
            });
        }
        mutator.delete_branch(&branch.name, force)?;
        report.deleted = true;
        Ok(())
    }

    fn push_step(
        &self,
        branch: &Branch,
        targets: &[String],
        options: &FinishOptions,
        report: &mut FinishReport,
    ) -> Result<()> {
        let remote = self.config.remote_for(branch.category);
        let mutator = self.mutator();

        for target in targets.iter().rev() {
            mutator.push(remote, target)?;
        }
        if report.tag.is_some() || (targets.len() > 1 && !options.no_tag) {
            mutator.push_tags(remote)?;
        }

        if !options.keep {
            if self.inspector().remote_branch_exists(remote, &branch.name) {
                mutator.delete_remote_branch(remote, &branch.name)?;
            } else {
                report.warn(BoundaryWarning::RemoteBranchMissing {
                    remote: remote.to_string(),
                    branch: branch.name.clone(),
                });
            }
        }
        report.pushed = true;
        Ok(())
    }
}

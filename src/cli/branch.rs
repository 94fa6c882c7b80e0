use anyhow::Result;

use super::{BranchAction, BranchArgs};
use crate::config::ConfigStore;
use crate::engine::{Engine, FinishOptions};
use crate::git::Runner;
use crate::setup;
use crate::ui;
use crate::workspace::Workspace;

/// Run one `branch <category> <action>` command
pub fn handle(workspace: &Workspace, args: BranchArgs) -> Result<()> {
    if let Some(warning) = setup::initialization_warning(workspace.runner()) {
        ui::display_boundary_warning(&warning);
    }
    let store = ConfigStore::new(workspace.config_path());
    let engine = Engine::from_config_file(workspace.runner(), &store.load()?)?;
    dispatch(&engine, args)
}

fn dispatch<R: Runner>(engine: &Engine<R>, args: BranchArgs) -> Result<()> {
    let category = args.category;

    match args.action {
        BranchAction::Start { identifier, base } => {
            let report = engine.start(category, &identifier, base.as_deref())?;
            ui::display_success(&format!(
                "Created branch '{}' from '{}' and switched to it",
                report.branch, report.base
            ));
        }
        BranchAction::Finish {
            identifier,
            push,
            keep,
            no_tag,
            sign,
            signing_key,
            tag_message,
            squash,
        } => {
            let options = FinishOptions {
                push,
                keep,
                no_tag,
                sign,
                signing_key,
                tag_message,
                squash,
            };
            let report = engine.finish(category, &identifier, &options)?;
            ui::display_finish_report(&report);
        }
        BranchAction::Publish { identifier } => {
            let report = engine.publish(category, &identifier)?;
            ui::display_success(&format!(
                "Published '{}' to '{}'",
                report.branch, report.remote
            ));
        }
        BranchAction::Track { identifier } => {
            let report = engine.track(category, &identifier)?;
            ui::display_success(&format!(
                "Created '{}' tracking '{}/{}'",
                report.branch, report.remote, report.branch
            ));
        }
        BranchAction::List { verbose } => {
            let entries = engine.list(category, verbose)?;
            ui::display_branch_list(category, &entries);
        }
        BranchAction::Checkout => {
            let name = engine.checkout(category)?;
            ui::display_success(&format!("Switched to '{}'", name));
        }
        BranchAction::Pull {
            remote,
            identifier,
            rebase,
        } => {
            let name = engine.pull(category, remote.as_deref(), identifier.as_deref(), rebase)?;
            ui::display_success(&format!("Pulled '{}'", name));
        }
        BranchAction::Push { tags } => {
            let name = engine.push_perpetual(category, tags)?;
            ui::display_success(&format!("Pushed '{}'", name));
        }
        BranchAction::Merge { branch, ff } => {
            let name = engine.merge(category, &branch, ff)?;
            ui::display_success(&format!("Merged '{}' into '{}'", branch, name));
        }
        BranchAction::Sync => {
            let name = engine.sync(category)?;
            ui::display_success(&format!(
                "'{}' is up to date with '{}'",
                name,
                engine.config().main_branch
            ));
        }
        BranchAction::Diff { identifier } => {
            print!("{}", engine.diff(category, identifier.as_deref())?);
        }
        BranchAction::Rebase { identifier } => {
            let branch = engine.rebase(category, identifier.as_deref())?;
            ui::display_success(&format!(
                "Rebased '{}' onto '{}'",
                branch,
                engine.config().develop_branch
            ));
        }
    }
    Ok(())
}

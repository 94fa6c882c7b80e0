//! Command-line front-end
//!
//! Argument types are clap-derived; the handlers in `branch` and `setup`
//! resolve the workspace, call into the library, and print the outcome.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::domain::BranchCategory;
use crate::workspace::Workspace;

mod branch;
mod setup;

#[derive(Parser, Debug)]
#[command(
    name = "git-flow",
    version,
    about = "Branching workflow helper: feature, release, hotfix and support branches on top of git"
)]
pub struct Cli {
    /// Repository to operate on instead of the one containing the current directory
    #[arg(long, env = "GIT_FLOW_ROOT")]
    pub root: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Work with the branches of one category
    Branch(BranchArgs),

    /// Initialize and configure git-flow
    #[command(subcommand)]
    Setup(SetupCommand),
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct BranchArgs {
    /// feature, release, hotfix, bugfix, support, task, setup, develop or main
    pub category: BranchCategory,

    #[command(subcommand)]
    pub action: BranchAction,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum BranchAction {
    /// Create a branch and check it out
    Start {
        identifier: String,
        /// Commit or branch to start from
        base: Option<String>,
    },

    /// Merge a branch into its targets and delete it
    Finish {
        identifier: String,
        /// Push the integration branches and delete the remote branch
        #[arg(long)]
        push: bool,
        /// Keep the branch after finishing
        #[arg(long)]
        keep: bool,
        /// Do not tag the release
        #[arg(long)]
        no_tag: bool,
        /// Sign the release tag
        #[arg(long)]
        sign: bool,
        #[arg(long, value_name = "KEY")]
        signing_key: Option<String>,
        #[arg(long, value_name = "MESSAGE")]
        tag_message: Option<String>,
        /// Squash the branch into one commit
        #[arg(long)]
        squash: bool,
    },

    /// Push a local branch to the remote and track it
    Publish { identifier: String },

    /// Create a local branch tracking the remote one
    Track { identifier: String },

    /// List branches of the category
    List {
        /// Show each branch's relation to its base
        #[arg(short, long)]
        verbose: bool,
    },

    /// Check out main or develop
    Checkout,

    /// Pull main/develop, or a feature branch from a remote
    Pull {
        remote: Option<String>,
        identifier: Option<String>,
        #[arg(long)]
        rebase: bool,
    },

    /// Push main or develop
    Push {
        /// Push tags too
        #[arg(long)]
        tags: bool,
    },

    /// Merge a branch into main or develop
    Merge {
        branch: String,
        /// Allow a fast-forward instead of a merge commit
        #[arg(long)]
        ff: bool,
    },

    /// Merge main into develop
    Sync,

    /// Show a feature's changes since it forked from develop
    Diff { identifier: Option<String> },

    /// Rebase a feature onto develop
    Rebase { identifier: Option<String> },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum SetupCommand {
    /// Initialize git-flow in the repository
    Init {
        /// Accept every default without prompting
        #[arg(short, long)]
        defaults: bool,
        /// Reinitialize even if a configuration exists
        #[arg(short, long)]
        force: bool,
    },

    /// Manage the configuration file
    Config {
        #[arg(value_enum)]
        action: ConfigAction,
        /// Dotted section, e.g. branch.feature
        section: Option<String>,
        key: Option<String>,
        value: Option<String>,
    },

    /// Show or set the prefix of a branch category
    BranchPrefix {
        category: BranchCategory,
        prefix: Option<String>,
    },

    /// Show or set a remote's URL
    Remote { name: String, url: Option<String> },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigAction {
    Init,
    Set,
    Get,
    List,
    Delete,
}

/// Directory commands start from: `--root` or the current directory
fn start_dir(cli: &Cli) -> Result<PathBuf> {
    match &cli.root {
        Some(root) => Ok(root.clone()),
        None => std::env::current_dir().context("cannot determine the current directory"),
    }
}

/// Run a parsed command line
pub fn run(cli: Cli) -> Result<()> {
    let start = start_dir(&cli)?;
    match cli.command {
        Commands::Branch(args) => {
            let workspace = Workspace::discover(&start)?;
            branch::handle(&workspace, args)
        }
        Commands::Setup(command) => setup::handle(&start, command),
    }
}

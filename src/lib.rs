//! git-flow: a branching-workflow helper on top of git
//!
//! The [engine] implements the branch lifecycle (start, finish, list,
//! publish, track) per [domain::BranchCategory]. It reaches the repository
//! only through a [git::Runner], and reads the [workflow::WorkflowConfig]
//! resolved from the file managed by [config::ConfigStore].

pub mod boundary;
pub mod cli;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod git;
pub mod logging;
pub mod setup;
pub mod ui;
pub mod workflow;
pub mod workspace;

pub use error::{GitFlowError, Result};

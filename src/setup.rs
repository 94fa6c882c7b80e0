//! Repository setup: `setup init` and the other `setup` commands
//!
//! Configuration building is pure ([build_config]); everything touching the
//! repository goes through a [Runner] so it can be tested with the mock.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use toml::{Table, Value};
use tracing::info;

use crate::boundary::BoundaryWarning;
use crate::config::{ConfigFile, ConfigStore};
use crate::domain::BranchCategory;
use crate::error::{GitFlowError, Result};
use crate::git::mutator::validate_name;
use crate::git::{GitCli, Inspector, Mutator, Runner};
use crate::workflow::{WorkflowConfig, VERSION_SECTION};
use crate::workspace::Workspace;

/// Git config key recording the main branch name
pub const MAIN_KEY: &str = "workflow.branch.main";
/// Git config key recording the develop branch name
pub const DEVELOP_KEY: &str = "workflow.branch.develop";
/// Prefix keys that must be set for a repository to count as initialized.
/// The version tag prefix may legitimately be empty, so it is not required.
pub const REQUIRED_PREFIXES: [&str; 4] = ["feature", "release", "hotfix", "support"];

const INITIAL_COMMIT_MESSAGE: &str = "Initial commit";

/// Git config key of a category prefix (`versiontag` for the tag prefix)
pub fn prefix_key(name: &str) -> String {
    format!("workflow.prefix.{}", name)
}

/// Values collected by `setup init`, interactively or from defaults
#[derive(Debug, Clone, PartialEq)]
pub struct InitAnswers {
    pub user_name: String,
    pub user_email: String,
    pub remote_name: String,
    pub remote_url: Option<String>,
    pub main_branch: String,
    pub develop_branch: String,
    pub prefixes: BTreeMap<BranchCategory, String>,
    pub version_tag_prefix: String,
}

impl Default for InitAnswers {
    fn default() -> Self {
        let defaults = WorkflowConfig::default();
        InitAnswers {
            user_name: String::new(),
            user_email: String::new(),
            remote_name: defaults.default_remote,
            remote_url: None,
            main_branch: defaults.main_branch,
            develop_branch: defaults.develop_branch,
            prefixes: defaults
                .prefixes
                .into_iter()
                .filter(|(category, _)| !category.is_perpetual())
                .collect(),
            version_tag_prefix: defaults.version_tag_prefix,
        }
    }
}

/// Build the configuration file from init answers
pub fn build_config(answers: &InitAnswers) -> ConfigFile {
    let mut file = ConfigFile::default();
    file.user.name = answers.user_name.clone();
    file.user.email = answers.user_email.clone();
    file.remote.default = answers.remote_name.clone();
    if let Some(url) = answers.remote_url.as_ref().filter(|u| !u.is_empty()) {
        file.remote
            .url
            .insert(answers.remote_name.clone(), url.clone());
    }

    let perpetual = [
        (BranchCategory::Main, &answers.main_branch),
        (BranchCategory::Develop, &answers.develop_branch),
    ];
    for (category, name) in perpetual {
        if let Some(settings) = file.branch.get_mut(category.as_str()) {
            settings.default = name.clone();
        }
    }
    for (category, prefix) in &answers.prefixes {
        if let Some(settings) = file.branch.get_mut(category.as_str()) {
            settings.prefix = prefix.clone();
        }
    }
    if let Some(version) = file.branch.get_mut(VERSION_SECTION) {
        version.prefix = answers.version_tag_prefix.clone();
    }
    file
}

/// Discover the repository containing `start`, running `git init` there
/// when there is none
pub fn ensure_repository(start: &Path) -> Result<Workspace> {
    match Workspace::discover(start) {
        Err(GitFlowError::NotARepository(_)) => {
            info!(path = %start.display(), "initializing git repository");
            Mutator::new(GitCli::new(start)).init()?;
            Workspace::discover(start)
        }
        other => other,
    }
}

/// What `setup init` did
#[derive(Debug, Clone, PartialEq)]
pub struct InitReport {
    pub config_path: PathBuf,
    pub created_branches: Vec<String>,
    pub initial_commit: bool,
}

/// Write the configuration, record the git-native keys, and create main
/// and develop.
///
/// Fails with `AlreadyInitialized` when a configuration file exists and
/// `force` is not set.
pub fn init<R: Runner>(
    runner: R,
    store: &ConfigStore,
    answers: &InitAnswers,
    force: bool,
) -> Result<InitReport> {
    if store.exists() && !force {
        return Err(GitFlowError::AlreadyInitialized(store.path().to_path_buf()));
    }

    let file = build_config(answers);
    let workflow = WorkflowConfig::from_config(&file)?;
    store.write(&file.to_table()?)?;
    info!(path = %store.path().display(), "configuration written");

    write_git_keys(&runner, &workflow)?;
    let (created_branches, initial_commit) = setup_branches(&runner, &workflow)?;

    Ok(InitReport {
        config_path: store.path().to_path_buf(),
        created_branches,
        initial_commit,
    })
}

fn write_git_keys<R: Runner>(runner: &R, workflow: &WorkflowConfig) -> Result<()> {
    let mutator = Mutator::new(runner);
    mutator.config_set(MAIN_KEY, &workflow.main_branch)?;
    mutator.config_set(DEVELOP_KEY, &workflow.develop_branch)?;
    for category in BranchCategory::ALL {
        if !category.is_perpetual() {
            mutator.config_set(&prefix_key(category.as_str()), workflow.prefix(category))?;
        }
    }
    mutator.config_set(&prefix_key("versiontag"), &workflow.version_tag_prefix)
}

/// Create main and develop as needed. An empty repository gets an initial
/// commit on main and ends up on develop.
fn setup_branches<R: Runner>(runner: &R, workflow: &WorkflowConfig) -> Result<(Vec<String>, bool)> {
    let inspector = Inspector::new(runner);
    let mutator = Mutator::new(runner);
    let main = workflow.main_branch.as_str();
    let develop = workflow.develop_branch.as_str();
    let mut created = Vec::new();

    let fresh = !inspector.has_commits();
    if fresh {
        mutator.symbolic_head(main)?;
        mutator.commit_empty(INITIAL_COMMIT_MESSAGE)?;
        created.push(main.to_string());
    } else if !inspector.branch_exists(main) {
        mutator.branch_from(main, "HEAD")?;
        created.push(main.to_string());
    }

    if !inspector.branch_exists(develop) {
        mutator.branch_from(develop, main)?;
        created.push(develop.to_string());
    }

    if fresh {
        mutator.checkout(develop)?;
    }
    Ok((created, fresh))
}

/// Whether init has recorded its keys: distinct main and develop names and
/// every prefix in [REQUIRED_PREFIXES]
pub fn is_initialized<R: Runner>(runner: R) -> bool {
    let inspector = Inspector::new(runner);
    let main = inspector.config_get(MAIN_KEY);
    let develop = inspector.config_get(DEVELOP_KEY);
    let (Some(main), Some(develop)) = (main, develop) else {
        return false;
    };

    main != develop
        && REQUIRED_PREFIXES
            .iter()
            .all(|name| inspector.config_get(&prefix_key(name)).is_some())
}

/// Warning shown by branch commands run before `setup init`
pub fn initialization_warning<R: Runner>(runner: R) -> Option<BoundaryWarning> {
    if is_initialized(runner) {
        None
    } else {
        Some(BoundaryWarning::NotInitialized)
    }
}

/// Set a category's prefix in both the file and the git keys
pub fn set_branch_prefix<R: Runner>(
    runner: R,
    store: &ConfigStore,
    category: BranchCategory,
    prefix: &str,
) -> Result<()> {
    if category.is_perpetual() {
        return Err(GitFlowError::unsupported(category.as_str(), "branch-prefix"));
    }
    validate_name(prefix)?;

    let mut partial = Table::new();
    let mut settings = Table::new();
    settings.insert("prefix".to_string(), Value::String(prefix.to_string()));
    let mut branch = Table::new();
    branch.insert(category.as_str().to_string(), Value::Table(settings));
    partial.insert("branch".to_string(), Value::Table(branch));
    store.update(partial)?;

    Mutator::new(runner).config_set(&prefix_key(category.as_str()), prefix)
}

/// Record a remote's URL in the file and configure it in git
pub fn set_remote<R: Runner>(runner: R, store: &ConfigStore, name: &str, url: &str) -> Result<()> {
    validate_name(name)?;
    store.set("remote.url", name, url)?;
    if !url.is_empty() {
        Mutator::new(runner).set_remote_url(name, url)?;
    }
    Ok(())
}

// tests/setup_test.rs
//! `setup` against real repositories

mod common;

use clap::Parser;
use common::{git_in, TestRepo};
use git_flow::cli::{self, Cli};
use git_flow::config::ConfigStore;
use git_flow::domain::BranchCategory;
use git_flow::git::GitCli;
use git_flow::setup::{self, InitAnswers};
use git_flow::GitFlowError;
use serial_test::serial;
use tempfile::TempDir;

#[test]
fn test_init_in_plain_directory() {
    let dir = TempDir::new().unwrap();
    let workspace = setup::ensure_repository(dir.path()).unwrap();
    git_in(workspace.root(), &["config", "user.name", "Test User"]);
    git_in(workspace.root(), &["config", "user.email", "test@example.com"]);
    git_in(workspace.root(), &["config", "commit.gpgsign", "false"]);

    let store = ConfigStore::new(workspace.config_path());
    let report =
        setup::init(workspace.runner(), &store, &InitAnswers::default(), false).unwrap();

    assert!(report.initial_commit);
    assert_eq!(report.created_branches, vec!["main", "develop"]);
    assert!(store.exists());
    assert!(setup::is_initialized(workspace.runner()));
    assert_eq!(
        git_in(workspace.root(), &["branch", "--show-current"]).trim(),
        "develop"
    );
    assert_eq!(
        git_in(workspace.root(), &["config", "workflow.prefix.feature"]).trim(),
        "feature/"
    );
}

#[test]
fn test_init_keeps_existing_history() {
    let repo = TestRepo::new();
    repo.commit_file("README.md", "hello\n", "First commit");
    let first = repo.tip("main");

    let report = setup::init(
        repo.runner(),
        &repo.store(),
        &InitAnswers::default(),
        false,
    )
    .unwrap();

    assert!(!report.initial_commit);
    assert_eq!(report.created_branches, vec!["develop"]);
    assert_eq!(repo.tip("develop"), first);
    assert_eq!(repo.tip("main"), first);
    assert_eq!(repo.current_branch(), "main");
}

#[test]
fn test_init_twice_needs_force() {
    let repo = TestRepo::initialized();

    let err = setup::init(
        repo.runner(),
        &repo.store(),
        &InitAnswers::default(),
        false,
    )
    .unwrap_err();
    assert!(matches!(err, GitFlowError::AlreadyInitialized(_)));

    let report = setup::init(repo.runner(), &repo.store(), &InitAnswers::default(), true).unwrap();
    assert!(report.created_branches.is_empty());
}

#[test]
fn test_uninitialized_repository() {
    let repo = TestRepo::new();
    assert!(!setup::is_initialized(GitCli::new(repo.path())));
}

#[test]
fn test_custom_names_drive_the_workflow() {
    let repo = TestRepo::new();
    let mut answers = InitAnswers {
        main_branch: "master".into(),
        develop_branch: "next".into(),
        version_tag_prefix: String::new(),
        ..InitAnswers::default()
    };
    answers
        .prefixes
        .insert(BranchCategory::Feature, "feat/".into());
    setup::init(repo.runner(), &repo.store(), &answers, false).unwrap();

    assert!(repo.branch_exists("master"));
    assert!(repo.branch_exists("next"));

    let engine = repo.engine();
    let started = engine.start(BranchCategory::Feature, "login", None).unwrap();
    assert_eq!(started.branch.name, "feat/login");
    assert_eq!(started.base, "next");

    repo.git(&["checkout", "--quiet", "next"]);
    engine.start(BranchCategory::Release, "3.0", None).unwrap();
    repo.commit_file("VERSION", "3.0\n", "Bump");
    let report = engine
        .finish(BranchCategory::Release, "3.0", &Default::default())
        .unwrap();
    assert_eq!(report.merged_into, vec!["master", "next"]);
    assert!(repo.tag_exists("3.0"));
}

#[test]
fn test_set_branch_prefix_updates_file_and_git() {
    let repo = TestRepo::initialized();
    let store = repo.store();

    setup::set_branch_prefix(repo.runner(), &store, BranchCategory::Bugfix, "fix/").unwrap();

    assert_eq!(
        repo.git(&["config", "workflow.prefix.bugfix"]).trim(),
        "fix/"
    );
    assert_eq!(
        store.get("branch.bugfix", "prefix").unwrap(),
        Some(toml::Value::String("fix/".into()))
    );
    let started = repo
        .engine()
        .start(BranchCategory::Bugfix, "crash", None)
        .unwrap();
    assert_eq!(started.branch.name, "fix/crash");
}

#[test]
fn test_set_remote_adds_git_remote() {
    let repo = TestRepo::initialized();
    let store = repo.store();

    setup::set_remote(repo.runner(), &store, "upstream", "https://example.com/repo.git").unwrap();
    assert_eq!(
        repo.git(&["remote", "get-url", "upstream"]).trim(),
        "https://example.com/repo.git"
    );

    setup::set_remote(repo.runner(), &store, "upstream", "https://example.com/moved.git").unwrap();
    assert_eq!(
        repo.git(&["remote", "get-url", "upstream"]).trim(),
        "https://example.com/moved.git"
    );
    assert_eq!(
        store.load().unwrap().remote.url.get("upstream").map(String::as_str),
        Some("https://example.com/moved.git")
    );
}

#[test]
fn test_cli_init_with_root() {
    let repo = TestRepo::new();
    let root = repo.path().display().to_string();

    let cli = Cli::try_parse_from(["git-flow", "--root", &root, "setup", "init", "--defaults"])
        .unwrap();
    cli::run(cli).unwrap();

    assert!(setup::is_initialized(repo.runner()));
    assert!(repo.branch_exists("develop"));
}

#[test]
#[serial]
fn test_cli_uses_current_directory() {
    let repo = TestRepo::initialized();
    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(repo.path()).unwrap();

    let cli = Cli::try_parse_from(["git-flow", "branch", "feature", "start", "from-cwd"]).unwrap();
    let result = cli::run(cli);
    std::env::set_current_dir(previous).unwrap();

    result.unwrap();
    assert!(repo.branch_exists("feature/from-cwd"));
}

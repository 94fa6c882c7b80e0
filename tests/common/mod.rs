// tests/common/mod.rs
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

use git2::{Repository, RepositoryInitOptions};
use git_flow::config::ConfigStore;
use git_flow::engine::Engine;
use git_flow::git::GitCli;
use git_flow::setup::{self, InitAnswers};
use git_flow::workflow::WorkflowConfig;
use git_flow::workspace::Workspace;
use tempfile::TempDir;

/// A throwaway repository on disk with an identity configured
pub struct TestRepo {
    _dir: TempDir,
    path: PathBuf,
}

impl TestRepo {
    /// Empty repository whose unborn HEAD is `main`
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let mut options = RepositoryInitOptions::new();
        options.initial_head("main");
        Repository::init_opts(dir.path(), &options).expect("init repository");
        configure_identity(dir.path());
        let path = dir.path().to_path_buf();
        TestRepo { _dir: dir, path }
    }

    /// Repository initialized for git-flow with default answers
    pub fn initialized() -> Self {
        let repo = TestRepo::new();
        let store = repo.store();
        setup::init(repo.runner(), &store, &InitAnswers::default(), false)
            .expect("git-flow init");
        repo
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn workspace(&self) -> Workspace {
        Workspace::discover(self.path()).expect("discover workspace")
    }

    pub fn runner(&self) -> GitCli {
        GitCli::new(self.path())
    }

    pub fn store(&self) -> ConfigStore {
        ConfigStore::new(self.workspace().config_path())
    }

    /// Engine using whatever configuration is on disk (defaults if none)
    pub fn engine(&self) -> Engine<GitCli> {
        let file = self.store().load().expect("load configuration");
        Engine::new(
            self.runner(),
            WorkflowConfig::from_config(&file).expect("valid configuration"),
        )
    }

    /// Run git in the repository, panicking on failure
    pub fn git(&self, args: &[&str]) -> String {
        git_in(self.path(), args)
    }

    /// Whether git exits successfully
    pub fn git_ok(&self, args: &[&str]) -> bool {
        Command::new("git")
            .args(args)
            .current_dir(self.path())
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Write `content` to `name` and commit it on the current branch
    pub fn commit_file(&self, name: &str, content: &str, message: &str) {
        std::fs::write(self.path().join(name), content).expect("write file");
        self.git(&["add", name]);
        self.git(&["commit", "--quiet", "-m", message]);
    }

    pub fn branch_exists(&self, name: &str) -> bool {
        self.git_ok(&["rev-parse", "--verify", "--quiet", &format!("refs/heads/{}", name)])
    }

    pub fn tag_exists(&self, name: &str) -> bool {
        self.git_ok(&["rev-parse", "--verify", "--quiet", &format!("refs/tags/{}", name)])
    }

    pub fn current_branch(&self) -> String {
        self.git(&["branch", "--show-current"]).trim().to_string()
    }

    pub fn tip(&self, reference: &str) -> String {
        self.git(&["rev-parse", reference]).trim().to_string()
    }

    /// Whether `ancestor` is reachable from `descendant`
    pub fn contains(&self, descendant: &str, ancestor: &str) -> bool {
        self.git_ok(&["merge-base", "--is-ancestor", ancestor, descendant])
    }
}

/// A bare repository to act as a shared remote
pub fn bare_remote() -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("create temp dir");
    let mut options = RepositoryInitOptions::new();
    options.bare(true).initial_head("main");
    Repository::init_opts(dir.path(), &options).expect("init bare repository");
    let path = dir.path().to_path_buf();
    (dir, path)
}

/// Clone `remote` into a fresh directory with an identity configured
pub fn clone_of(remote: &Path) -> TestRepo {
    let dir = TempDir::new().expect("create temp dir");
    let target = dir.path().join("clone");
    git_in(
        dir.path(),
        &["clone", "--quiet", &remote.display().to_string(), "clone"],
    );
    configure_identity(&target);
    TestRepo {
        _dir: dir,
        path: target,
    }
}

pub fn git_in(path: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(path)
        .output()
        .expect("run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn configure_identity(path: &Path) {
    let repo = Repository::open(path).expect("open repository");
    let mut config = repo.config().expect("repository config");
    config.set_str("user.name", "Test User").unwrap();
    config.set_str("user.email", "test@example.com").unwrap();
    config.set_bool("commit.gpgsign", false).unwrap();
    config.set_bool("tag.gpgsign", false).unwrap();
}

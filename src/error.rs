use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for git-flow operations
#[derive(Error, Debug)]
pub enum GitFlowError {
    #[error("Working tree contains unstaged or uncommitted changes")]
    DirtyWorkingTree,

    #[error("Branch '{0}' does not exist")]
    BranchNotFound(String),

    #[error("Branch '{0}' already exists")]
    BranchAlreadyExists(String),

    #[error("Tag '{0}' already exists")]
    TagAlreadyExists(String),

    #[error("Invalid name '{0}': only letters, digits, '_', '-', '.' and '/' are allowed")]
    InvalidName(String),

    #[error("Operation '{operation}' is not supported for {category} branches")]
    UnsupportedOperation {
        category: String,
        operation: String,
    },

    #[error("Base '{base}' is not a commit on '{branch}'")]
    BaseNotOnBranch { base: String, branch: String },

    #[error("Missing argument: {0}")]
    MissingArgument(String),

    #[error("git {command} failed{}: {stderr}", exit_suffix(.exit_code))]
    CommandFailure {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("Configuration error: {0}")]
    ConfigurationInvalid(String),

    #[error("Not a git repository: {0}")]
    NotARepository(String),

    #[error("git-flow is already initialized in this repository ({})", .0.display())]
    AlreadyInitialized(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot parse configuration: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Cannot serialize configuration: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

fn exit_suffix(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => format!(" with exit code {}", code),
        None => String::new(),
    }
}

/// Convenience type alias for Results in git-flow
pub type Result<T> = std::result::Result<T, GitFlowError>;

impl GitFlowError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GitFlowError::ConfigurationInvalid(msg.into())
    }

    /// Create an unsupported-operation error for a category
    pub fn unsupported(category: impl Into<String>, operation: impl Into<String>) -> Self {
        GitFlowError::UnsupportedOperation {
            category: category.into(),
            operation: operation.into(),
        }
    }

    /// Create a missing-argument error
    pub fn missing(msg: impl Into<String>) -> Self {
        GitFlowError::MissingArgument(msg.into())
    }

    /// Whether the error is the expected "not supported for this category" outcome
    pub fn is_unsupported(&self) -> bool {
        matches!(self, GitFlowError::UnsupportedOperation { .. })
    }
}

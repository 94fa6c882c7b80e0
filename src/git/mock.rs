use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::{GitFlowError, Result};
use crate::git::Runner;

/// Scripted runner for testing without an actual repository
///
/// Commands are matched on their full argument list. Unscripted commands
/// succeed with empty output. Every invocation is recorded so tests can
/// assert on what was (or was not) executed.
#[derive(Default)]
pub struct MockRunner {
    responses: RefCell<HashMap<String, Result<String>>>,
    calls: RefCell<Vec<Vec<String>>>,
}

fn key(args: &[&str]) -> String {
    args.join("\u{1f}")
}

impl MockRunner {
    /// Create a new mock with no scripted commands
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a successful response
    pub fn respond(&self, args: &[&str], stdout: impl Into<String>) {
        self.responses
            .borrow_mut()
            .insert(key(args), Ok(stdout.into()));
    }

    /// Script a non-zero exit
    pub fn fail(&self, args: &[&str], stderr: impl Into<String>) {
        self.responses.borrow_mut().insert(
            key(args),
            Err(GitFlowError::CommandFailure {
                command: args.join(" "),
                exit_code: Some(1),
                stderr: stderr.into(),
            }),
        );
    }

    /// All recorded invocations, in order
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }

    /// Whether a command with exactly these arguments was run
    pub fn was_called(&self, args: &[&str]) -> bool {
        self.calls
            .borrow()
            .iter()
            .any(|call| call.iter().map(String::as_str).eq(args.iter().copied()))
    }

    /// Whether any recorded command starts with `subcommand`
    pub fn ran_subcommand(&self, subcommand: &str) -> bool {
        self.calls
            .borrow()
            .iter()
            .any(|call| call.first().map(String::as_str) == Some(subcommand))
    }
}

impl Runner for MockRunner {
    fn run_with(&self, args: &[&str], tolerate_failure: bool) -> Result<String> {
        self.calls
            .borrow_mut()
            .push(args.iter().map(|a| a.to_string()).collect());

        match self.responses.borrow().get(&key(args)) {
            None => Ok(String::new()),
            Some(Ok(stdout)) => Ok(stdout.clone()),
            Some(Err(_)) if tolerate_failure => Ok(String::new()),
            Some(Err(GitFlowError::CommandFailure {
                command,
                exit_code,
                stderr,
            })) => Err(GitFlowError::CommandFailure {
                command: command.clone(),
                exit_code: *exit_code,
                stderr: stderr.clone(),
            }),
            Some(Err(e)) => Err(GitFlowError::config(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_runner_scripted_output() {
        let runner = MockRunner::new();
        runner.respond(&["branch", "--show-current"], "main\n");

        assert_eq!(runner.run(&["branch", "--show-current"]).unwrap(), "main\n");
        assert!(runner.was_called(&["branch", "--show-current"]));
    }

    #[test]
    fn test_mock_runner_failure() {
        let runner = MockRunner::new();
        runner.fail(&["merge", "--no-ff", "topic"], "conflict");

        let err = runner.run(&["merge", "--no-ff", "topic"]).unwrap_err();
        assert!(err.to_string().contains("conflict"));
        assert!(!runner.succeeds(&["merge", "--no-ff", "topic"]));
        assert!(runner.run_with(&["merge", "--no-ff", "topic"], true).is_ok());
    }

    #[test]
    fn test_mock_runner_default_is_empty_success() {
        let runner = MockRunner::default();
        assert_eq!(runner.run(&["status"]).unwrap(), "");
        assert!(runner.ran_subcommand("status"));
        assert!(!runner.ran_subcommand("commit"));
        assert_eq!(runner.calls().len(), 1);
    }
}

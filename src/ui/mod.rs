//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Interactive prompts and user input handling

use std::io::{self, BufRead, Write};

use anyhow::Result;

use crate::domain::BranchCategory;
use crate::setup::InitAnswers;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_boundary_warning, display_branch_list, display_config, display_error,
    display_finish_report, display_status, display_success, format_config_value,
};

/// Prompts user to confirm an action with a yes/no prompt.
///
/// Displays the given prompt and accepts "y" or "yes" (case-insensitive) as confirmation.
/// Default is "no" if user presses Enter.
///
/// # Returns
/// * `Ok(true)` - If user entered "y" or "yes"
/// * `Ok(false)` - Otherwise (including Enter, or "n"/"no")
/// * `Err` - If input error occurs
pub fn confirm_action(prompt: &str) -> Result<bool> {
    let stdin = io::stdin();
    confirm_with(&mut stdin.lock(), &mut io::stdout(), prompt, false)
}

/// Asks for a value, returning `default` when the user just presses Enter
pub fn ask(prompt: &str, default: &str) -> Result<String> {
    let stdin = io::stdin();
    ask_with(&mut stdin.lock(), &mut io::stdout(), prompt, default)
}

fn ask_with<I: BufRead, O: Write>(
    input: &mut I,
    output: &mut O,
    prompt: &str,
    default: &str,
) -> Result<String> {
    if default.is_empty() {
        write!(output, "{}: ", prompt)?;
    } else {
        write!(output, "{} [{}]: ", prompt, default)?;
    }
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let answer = line.trim();
    Ok(if answer.is_empty() {
        default.to_string()
    } else {
        answer.to_string()
    })
}

fn confirm_with<I: BufRead, O: Write>(
    input: &mut I,
    output: &mut O,
    prompt: &str,
    default: bool,
) -> Result<bool> {
    let hint = if default { "Y/n" } else { "y/N" };
    write!(output, "{} ({}): ", prompt, hint)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(match line.trim().to_lowercase().as_str() {
        "" => default,
        "y" | "yes" => true,
        _ => false,
    })
}

/// Interactively collect `setup init` answers, offering `defaults` for
/// every question.
pub fn gather_init_answers(defaults: InitAnswers) -> Result<InitAnswers> {
    let stdin = io::stdin();
    gather_with(&mut stdin.lock(), &mut io::stdout(), defaults)
}

fn gather_with<I: BufRead, O: Write>(
    input: &mut I,
    output: &mut O,
    defaults: InitAnswers,
) -> Result<InitAnswers> {
    let mut answers = defaults;

    writeln!(output, "\nConfiguring user settings...")?;
    answers.user_name = ask_with(input, output, "Git username", &answers.user_name)?;
    answers.user_email = ask_with(input, output, "Git email", &answers.user_email)?;

    writeln!(output, "\nConfiguring remote settings...")?;
    if confirm_with(input, output, "Configure a remote repository?", true)? {
        answers.remote_name = ask_with(input, output, "Default remote name", &answers.remote_name)?;
        let url = ask_with(
            input,
            output,
            "Remote URL",
            answers.remote_url.as_deref().unwrap_or(""),
        )?;
        answers.remote_url = Some(url).filter(|u| !u.is_empty());
    }

    writeln!(output, "\nConfiguring branch settings...")?;
    answers.main_branch = ask_with(input, output, "Main branch name", &answers.main_branch)?;
    answers.develop_branch =
        ask_with(input, output, "Develop branch name", &answers.develop_branch)?;

    let categories: Vec<BranchCategory> = answers.prefixes.keys().copied().collect();
    for category in categories {
        let current = answers.prefixes[&category].clone();
        let prefix = ask_with(input, output, &format!("{} branch prefix", category), &current)?;
        answers.prefixes.insert(category, prefix);
    }
    answers.version_tag_prefix =
        ask_with(input, output, "Version tag prefix", &answers.version_tag_prefix)?;

    Ok(answers)
}

use std::path::Path;

use anyhow::{bail, Result};

use super::{ConfigAction, SetupCommand};
use crate::config::{ConfigFile, ConfigStore};
use crate::error::GitFlowError;
use crate::git::Inspector;
use crate::setup::{self, InitAnswers};
use crate::ui;
use crate::workflow::WorkflowConfig;
use crate::workspace::Workspace;

/// Run one `setup` command
pub fn handle(start: &Path, command: SetupCommand) -> Result<()> {
    match command {
        SetupCommand::Init { defaults, force } => init(start, defaults, force),
        SetupCommand::Config {
            action,
            section,
            key,
            value,
        } => {
            let workspace = Workspace::discover(start)?;
            config(&workspace, action, section, key, value)
        }
        SetupCommand::BranchPrefix { category, prefix } => {
            let workspace = Workspace::discover(start)?;
            let store = ConfigStore::new(workspace.config_path());
            match prefix {
                Some(prefix) => {
                    setup::set_branch_prefix(workspace.runner(), &store, category, &prefix)?;
                    ui::display_success(&format!("{} prefix set to '{}'", category, prefix));
                }
                None => {
                    let config = WorkflowConfig::from_config(&store.load()?)?;
                    println!("{}", config.prefix(category));
                }
            }
            Ok(())
        }
        SetupCommand::Remote { name, url } => {
            let workspace = Workspace::discover(start)?;
            let store = ConfigStore::new(workspace.config_path());
            match url {
                Some(url) => {
                    setup::set_remote(workspace.runner(), &store, &name, &url)?;
                    ui::display_success(&format!("Remote '{}' set to '{}'", name, url));
                }
                None => {
                    let file = store.load()?;
                    match file.remote.url.get(&name).filter(|u| !u.is_empty()) {
                        Some(url) => println!("{}", url),
                        None => ui::display_status(&format!("Remote '{}' has no URL", name)),
                    }
                }
            }
            Ok(())
        }
    }
}

fn init(start: &Path, defaults: bool, force: bool) -> Result<()> {
    let workspace = setup::ensure_repository(start)?;
    let runner = workspace.runner();
    let store = ConfigStore::new(workspace.config_path());

    if store.exists() && !force {
        return Err(GitFlowError::AlreadyInitialized(store.path().to_path_buf()).into());
    }

    let inspector = Inspector::new(&runner);
    let mut answers = InitAnswers {
        user_name: inspector.config_get("user.name").unwrap_or_default(),
        user_email: inspector.config_get("user.email").unwrap_or_default(),
        ..InitAnswers::default()
    };
    if !defaults {
        ui::display_status(&format!("Configuring git-flow in {}", workspace.root().display()));
        answers = ui::gather_init_answers(answers)?;
    }

    let report = setup::init(&runner, &store, &answers, force)?;
    if report.initial_commit {
        ui::display_status("Created initial commit");
    }
    for branch in &report.created_branches {
        ui::display_success(&format!("Created branch '{}'", branch));
    }
    ui::display_success(&format!(
        "Git flow initialized; configuration at {}",
        report.config_path.display()
    ));
    Ok(())
}

fn config(
    workspace: &Workspace,
    action: ConfigAction,
    section: Option<String>,
    key: Option<String>,
    value: Option<String>,
) -> Result<()> {
    let store = ConfigStore::new(workspace.config_path());

    match action {
        ConfigAction::Init => {
            if store.exists() {
                ui::display_status(&format!(
                    "Configuration already exists at {}",
                    store.path().display()
                ));
            } else {
                store.write(&ConfigFile::default().to_table()?)?;
                ui::display_success(&format!(
                    "Configuration created at {}",
                    store.path().display()
                ));
            }
        }
        ConfigAction::Set => {
            let (Some(section), Some(key), Some(value)) = (section, key, value) else {
                bail!(GitFlowError::missing("config set needs <section> <key> <value>"));
            };
            store.set(&section, &key, &value)?;
            ui::display_success(&format!("Set {}.{} = {}", section, key, value));
        }
        ConfigAction::Get => {
            let (Some(section), Some(key)) = (section, key) else {
                bail!(GitFlowError::missing("config get needs <section> <key>"));
            };
            match store.get(&section, &key)? {
                Some(value) => println!("{}", ui::format_config_value(&value)),
                None => bail!(GitFlowError::config(format!(
                    "{}.{} is not set",
                    section, key
                ))),
            }
        }
        ConfigAction::List => {
            if !store.exists() {
                ui::display_status("No configuration file; run `git-flow setup init`");
            } else {
                ui::display_config(&store.read()?);
            }
        }
        ConfigAction::Delete => {
            if !store.exists() {
                ui::display_status("No configuration file to delete");
            } else if ui::confirm_action(&format!("Delete {}?", store.path().display()))? {
                store.delete()?;
                ui::display_success("Configuration deleted");
            }
        }
    }
    Ok(())
}

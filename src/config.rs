use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use toml::{Table, Value};
use tracing::debug;

use crate::error::{GitFlowError, Result};
use crate::workflow::WorkflowConfig;

/// Sections every persisted configuration file must contain
pub const REQUIRED_SECTIONS: [&str; 4] = ["user", "branch", "remote", "config"];

/// Represents the complete persisted configuration for git-flow.
///
/// Contains user identity, remote settings, free-form settings, and one
/// [BranchSettings] table per branch category (plus `version`, whose
/// prefix names release tags).
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ConfigFile {
    #[serde(default)]
    pub user: UserConfig,

    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub config: Table,

    #[serde(default = "default_branches")]
    pub branch: BTreeMap<String, BranchSettings>,
}

/// Identity recorded at init time
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct UserConfig {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub email: String,
}

/// Remote repository settings.
///
/// `prefix` and `url` are keyed by remote name.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RemoteConfig {
    #[serde(default = "default_remote_name")]
    pub default: String,

    #[serde(default = "default_remote_map")]
    pub prefix: BTreeMap<String, String>,

    #[serde(default = "default_remote_map")]
    pub url: BTreeMap<String, String>,
}

/// Settings for one branch category
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct BranchSettings {
    #[serde(default)]
    pub prefix: String,

    #[serde(default)]
    pub url: String,

    /// Fixed branch name (used by the perpetual branches)
    #[serde(default)]
    pub default: String,

    #[serde(default)]
    pub remote: RemoteSettings,
}

/// Per-category remote behaviour
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct RemoteSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub upstream: String,

    /// Remote to publish to; empty means the default remote
    #[serde(default)]
    pub origin: String,

    #[serde(default)]
    pub push_on_finish: bool,

    #[serde(default)]
    pub track: bool,
}

fn default_remote_name() -> String {
    "origin".to_string()
}

fn default_remote_map() -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    map.insert("origin".to_string(), String::new());
    map.insert("upstream".to_string(), String::new());
    map
}

fn branch_settings(prefix: &str, default: &str, remote_enabled: bool) -> BranchSettings {
    BranchSettings {
        prefix: prefix.to_string(),
        url: String::new(),
        default: default.to_string(),
        remote: RemoteSettings {
            enabled: remote_enabled,
            upstream: String::new(),
            origin: String::new(),
            push_on_finish: false,
            track: remote_enabled,
        },
    }
}

/// Returns the default settings for every configurable branch category.
pub fn default_branches() -> BTreeMap<String, BranchSettings> {
    let mut map = BTreeMap::new();
    map.insert("main".to_string(), branch_settings("", "main", false));
    map.insert("develop".to_string(), branch_settings("", "develop", false));
    map.insert("feature".to_string(), branch_settings("feature/", "", true));
    map.insert("bugfix".to_string(), branch_settings("bugfix/", "", true));
    map.insert("hotfix".to_string(), branch_settings("hotfix/", "", true));
    map.insert("release".to_string(), branch_settings("release/", "", true));
    map.insert("support".to_string(), branch_settings("support/", "", true));
    map.insert("task".to_string(), branch_settings("task/", "", true));
    map.insert("setup".to_string(), branch_settings("setup/", "", true));
    map.insert("version".to_string(), branch_settings("v", "", false));
    map
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            default: default_remote_name(),
            prefix: default_remote_map(),
            url: default_remote_map(),
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        ConfigFile {
            user: UserConfig::default(),
            remote: RemoteConfig::default(),
            config: Table::new(),
            branch: default_branches(),
        }
    }
}

impl ConfigFile {
    /// Convert to an untyped table, the store's native representation
    pub fn to_table(&self) -> Result<Table> {
        match Value::try_from(self)? {
            Value::Table(table) => Ok(table),
            other => Err(GitFlowError::config(format!(
                "expected a table, found {}",
                other.type_str()
            ))),
        }
    }

    /// Parse a table laid over the defaults, so partial files still resolve
    /// every category.
    pub fn from_table(table: &Table) -> Result<Self> {
        let mut merged = ConfigFile::default().to_table()?;
        deep_update(&mut merged, table.clone());
        Value::Table(merged)
            .try_into()
            .map_err(|e: toml::de::Error| GitFlowError::config(e.to_string().trim().to_string()))
    }
}

/// Recursively merge `updates` into `base`; tables merge, other values replace.
pub fn deep_update(base: &mut Table, updates: Table) {
    for (key, value) in updates {
        match (base.get_mut(&key), value) {
            (Some(Value::Table(existing)), Value::Table(incoming)) => {
                deep_update(existing, incoming)
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Checks that all [REQUIRED_SECTIONS] are present
pub fn validate_sections(table: &Table) -> Result<()> {
    for section in REQUIRED_SECTIONS {
        if !table.contains_key(section) {
            return Err(GitFlowError::config(format!(
                "missing required section '{}'",
                section
            )));
        }
    }
    Ok(())
}

fn section_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-zA-Z0-9_.]+$").ok()).as_ref()
}

fn key_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-zA-Z0-9_]+$").ok()).as_ref()
}

/// Validates a dotted section path (`branch.feature`) and a key (`prefix`)
pub fn validate_section_key(section: &str, key: &str) -> Result<()> {
    let section_ok = section_pattern().is_some_and(|re| re.is_match(section));
    if !section_ok || section.split('.').any(str::is_empty) {
        return Err(GitFlowError::config(format!(
            "invalid section name '{}'",
            section
        )));
    }
    if !key_pattern().is_some_and(|re| re.is_match(key)) {
        return Err(GitFlowError::config(format!("invalid key name '{}'", key)));
    }
    Ok(())
}

/// Interpret a command-line value: booleans and integers keep their type,
/// anything else is a string.
pub fn parse_value(raw: &str) -> Value {
    match raw {
        "true" => Value::Boolean(true),
        "false" => Value::Boolean(false),
        _ => raw
            .parse::<i64>()
            .map(Value::Integer)
            .unwrap_or_else(|_| Value::String(raw.to_string())),
    }
}

/// Build `{a: {b: {key: value}}}` from section `a.b`
fn nested(section: &str, key: &str, value: Value) -> Table {
    let mut inner = Table::new();
    inner.insert(key.to_string(), value);
    section.rsplit('.').fold(inner, |acc, part| {
        let mut outer = Table::new();
        outer.insert(part.to_string(), Value::Table(acc));
        outer
    })
}

/// File-backed configuration store
///
/// Reads and writes the untyped table; every write is validated against
/// the typed [ConfigFile] model first, so an invalid `config set` never
/// reaches disk.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        ConfigStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Raw contents; an absent file reads as an empty table
    pub fn read(&self) -> Result<Table> {
        if !self.exists() {
            return Ok(Table::new());
        }
        let content = fs::read_to_string(&self.path)?;
        let table: Table = toml::from_str(&content)?;
        validate_sections(&table)?;
        Ok(table)
    }

    /// Write `table` after checking it resolves to a valid workflow
    pub fn write(&self, table: &Table) -> Result<()> {
        validate_sections(table)?;
        WorkflowConfig::from_config(&ConfigFile::from_table(table)?)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        debug!(path = %self.path.display(), "writing configuration");
        fs::write(&self.path, toml::to_string_pretty(table)?)?;
        Ok(())
    }

    /// Deep-merge `partial` into the stored table and write it back.
    ///
    /// When no file exists yet the defaults are the starting point.
    pub fn update(&self, partial: Table) -> Result<()> {
        let mut table = if self.exists() {
            self.read()?
        } else {
            ConfigFile::default().to_table()?
        };
        deep_update(&mut table, partial);
        self.write(&table)
    }

    /// Typed configuration: the stored table laid over the defaults
    pub fn load(&self) -> Result<ConfigFile> {
        ConfigFile::from_table(&self.read()?)
    }

    /// Look up `key` in dotted `section`, `None` when any part is absent
    pub fn get(&self, section: &str, key: &str) -> Result<Option<Value>> {
        validate_section_key(section, key)?;
        let table = self.read()?;
        let mut current = &table;
        for part in section.split('.') {
            match current.get(part) {
                Some(Value::Table(next)) => current = next,
                _ => return Ok(None),
            }
        }
        Ok(current.get(key).cloned())
    }

    pub fn set(&self, section: &str, key: &str, raw_value: &str) -> Result<()> {
        validate_section_key(section, key)?;
        self.update(nested(section, key, parse_value(raw_value)))
    }

    /// Remove the configuration file
    pub fn delete(&self) -> Result<()> {
        if self.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

//! Resolved workflow configuration
//!
//! [WorkflowConfig] is derived once per invocation from the persisted
//! [ConfigFile] and handed read-only to the engine.

use std::collections::BTreeMap;

use crate::config::{default_branches, ConfigFile, RemoteSettings};
use crate::domain::{Branch, BranchCategory, TagPattern};
use crate::error::{GitFlowError, Result};
use crate::git::mutator::validate_name;

/// Config table holding the version tag prefix
pub const VERSION_SECTION: &str = "version";

#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowConfig {
    pub main_branch: String,
    pub develop_branch: String,
    pub default_remote: String,
    pub version_tag_prefix: String,
    pub prefixes: BTreeMap<BranchCategory, String>,
    pub remotes: BTreeMap<BranchCategory, RemoteSettings>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        let branches = default_branches();
        let mut prefixes = BTreeMap::new();
        let mut remotes = BTreeMap::new();
        for category in BranchCategory::ALL {
            prefixes.insert(category, category.default_prefix().to_string());
            let settings = branches
                .get(category.as_str())
                .map(|b| b.remote.clone())
                .unwrap_or_default();
            remotes.insert(category, settings);
        }
        WorkflowConfig {
            main_branch: "main".to_string(),
            develop_branch: "develop".to_string(),
            default_remote: "origin".to_string(),
            version_tag_prefix: "v".to_string(),
            prefixes,
            remotes,
        }
    }
}

impl WorkflowConfig {
    /// Resolve and validate the persisted configuration.
    ///
    /// Fails with `ConfigurationInvalid` when main and develop share a name,
    /// or when a branch name or prefix contains disallowed characters.
    pub fn from_config(file: &ConfigFile) -> Result<Self> {
        let mut config = WorkflowConfig::default();

        for category in BranchCategory::ALL {
            let Some(settings) = file.branch.get(category.as_str()) else {
                continue;
            };

            if category.is_perpetual() {
                if !settings.default.is_empty() {
                    let name = settings.default.trim().to_string();
                    match category {
                        BranchCategory::Main => config.main_branch = name,
                        _ => config.develop_branch = name,
                    }
                }
            } else {
                let prefix = settings.prefix.trim();
                if prefix.is_empty() {
                    return Err(GitFlowError::config(format!(
                        "branch.{}.prefix must not be empty",
                        category
                    )));
                }
                config.prefixes.insert(category, prefix.to_string());
            }
            config.remotes.insert(category, settings.remote.clone());
        }

        if let Some(version) = file.branch.get(VERSION_SECTION) {
            config.version_tag_prefix = version.prefix.trim().to_string();
        }
        if !file.remote.default.trim().is_empty() {
            config.default_remote = file.remote.default.trim().to_string();
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.main_branch == self.develop_branch {
            return Err(GitFlowError::config(format!(
                "main and develop must be different branches (both are '{}')",
                self.main_branch
            )));
        }

        let mut names: Vec<(&str, &str)> = vec![
            ("branch.main.default", self.main_branch.as_str()),
            ("branch.develop.default", self.develop_branch.as_str()),
            ("remote.default", self.default_remote.as_str()),
        ];
        for (category, prefix) in &self.prefixes {
            if !category.is_perpetual() {
                names.push((category.as_str(), prefix.as_str()));
            }
        }
        if !self.version_tag_prefix.is_empty() {
            names.push((VERSION_SECTION, self.version_tag_prefix.as_str()));
        }
        for settings in self.remotes.values() {
            for remote in [&settings.origin, &settings.upstream] {
                if !remote.trim().is_empty() {
                    names.push(("remote", remote.trim()));
                }
            }
        }

        for (what, name) in names {
            validate_name(name)
                .map_err(|_| GitFlowError::config(format!("invalid value '{}' for {}", name, what)))?;
        }
        Ok(())
    }

    /// Prefix of a category (empty for the perpetual branches)
    pub fn prefix(&self, category: BranchCategory) -> &str {
        self.prefixes
            .get(&category)
            .map(String::as_str)
            .unwrap_or_else(|| category.default_prefix())
    }

    /// Fixed name of a perpetual branch
    pub fn perpetual_name(&self, category: BranchCategory) -> Option<&str> {
        match category {
            BranchCategory::Main => Some(&self.main_branch),
            BranchCategory::Develop => Some(&self.develop_branch),
            _ => None,
        }
    }

    /// The branch a category and identifier name
    pub fn branch(&self, category: BranchCategory, identifier: &str) -> Branch {
        match self.perpetual_name(category) {
            Some(name) => Branch::perpetual(category, name),
            None => Branch::new(category, self.prefix(category), identifier),
        }
    }

    pub fn tag_pattern(&self) -> TagPattern {
        TagPattern::new(self.version_tag_prefix.clone())
    }

    /// Remote a category publishes to: its `origin` setting, else the default
    pub fn remote_for(&self, category: BranchCategory) -> &str {
        match self.remotes.get(&category) {
            Some(settings) if !settings.origin.trim().is_empty() => settings.origin.trim(),
            _ => &self.default_remote,
        }
    }

    /// Remote a category pulls from: its `upstream` setting, else the one it
    /// publishes to
    pub fn upstream_for(&self, category: BranchCategory) -> &str {
        match self.remotes.get(&category) {
            Some(settings) if !settings.upstream.trim().is_empty() => settings.upstream.trim(),
            _ => self.remote_for(category),
        }
    }

    /// Whether publishing a branch of `category` also sets its upstream
    pub fn tracks_on_publish(&self, category: BranchCategory) -> bool {
        self.remotes
            .get(&category)
            .map(|s| s.track)
            .unwrap_or(true)
    }

    /// Whether finishing a branch of `category` pushes without `--push`
    pub fn push_on_finish(&self, category: BranchCategory) -> bool {
        self.remotes
            .get(&category)
            .map(|s| s.enabled && s.push_on_finish)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_default_config() {
        let config = WorkflowConfig::from_config(&ConfigFile::default()).unwrap();
        assert_eq!(config.main_branch, "main");
        assert_eq!(config.develop_branch, "develop");
        assert_eq!(config.default_remote, "origin");
        assert_eq!(config.version_tag_prefix, "v");
        assert_eq!(config.prefix(BranchCategory::Hotfix), "hotfix/");
        assert_eq!(config.prefix(BranchCategory::Main), "");
    }

    #[test]
    fn test_custom_names_and_prefixes() {
        let mut file = ConfigFile::default();
        file.branch.get_mut("main").unwrap().default = "master".into();
        file.branch.get_mut("feature").unwrap().prefix = "feat-".into();
        file.branch.get_mut("version").unwrap().prefix = "release-".into();

        let config = WorkflowConfig::from_config(&file).unwrap();
        assert_eq!(config.main_branch, "master");
        assert_eq!(
            config.branch(BranchCategory::Feature, "login").name,
            "feat-login"
        );
        assert_eq!(config.tag_pattern().format("1.0"), "release-1.0");
        assert_eq!(config.branch(BranchCategory::Main, "").name, "master");
    }

    #[test]
    fn test_main_equal_to_develop_is_invalid() {
        let mut file = ConfigFile::default();
        file.branch.get_mut("develop").unwrap().default = "main".into();
        assert!(matches!(
            WorkflowConfig::from_config(&file),
            Err(GitFlowError::ConfigurationInvalid(_))
        ));
    }

    #[test]
    fn test_empty_or_invalid_prefix_is_invalid() {
        let mut file = ConfigFile::default();
        file.branch.get_mut("release").unwrap().prefix = String::new();
        assert!(WorkflowConfig::from_config(&file).is_err());

        let mut file = ConfigFile::default();
        file.branch.get_mut("bugfix").unwrap().prefix = "bug fix/".into();
        let err = WorkflowConfig::from_config(&file).unwrap_err();
        assert!(err.to_string().contains("bug fix/"));
    }

    #[test]
    fn test_remote_for_and_push_on_finish() {
        let mut file = ConfigFile::default();
        file.remote.default = "upstream".into();
        {
            let release = file.branch.get_mut("release").unwrap();
            release.remote.origin = "mirror".into();
            release.remote.push_on_finish = true;
        }
        file.branch.get_mut("hotfix").unwrap().remote.push_on_finish = true;
        file.branch.get_mut("hotfix").unwrap().remote.enabled = false;

        let config = WorkflowConfig::from_config(&file).unwrap();
        assert_eq!(config.remote_for(BranchCategory::Release), "mirror");
        assert_eq!(config.remote_for(BranchCategory::Feature), "upstream");
        assert!(config.push_on_finish(BranchCategory::Release));
        assert!(!config.push_on_finish(BranchCategory::Hotfix));
        assert!(!config.push_on_finish(BranchCategory::Feature));
    }

    #[test]
    fn test_upstream_falls_back_to_publish_remote() {
        let mut file = ConfigFile::default();
        file.branch.get_mut("develop").unwrap().remote.upstream = "canonical".into();
        file.branch.get_mut("main").unwrap().remote.origin = "mirror".into();

        let config = WorkflowConfig::from_config(&file).unwrap();
        assert_eq!(config.upstream_for(BranchCategory::Develop), "canonical");
        assert_eq!(config.remote_for(BranchCategory::Develop), "origin");
        assert_eq!(config.upstream_for(BranchCategory::Main), "mirror");
        assert_eq!(config.upstream_for(BranchCategory::Feature), "origin");
    }

    #[test]
    fn test_track_defaults_follow_category() {
        let config = WorkflowConfig::default();
        assert!(config.tracks_on_publish(BranchCategory::Feature));
        assert!(config.tracks_on_publish(BranchCategory::Release));

        let mut file = ConfigFile::default();
        file.branch.get_mut("feature").unwrap().remote.track = false;
        let config = WorkflowConfig::from_config(&file).unwrap();
        assert!(!config.tracks_on_publish(BranchCategory::Feature));
    }

    #[test]
    fn test_invalid_upstream_is_rejected() {
        let mut file = ConfigFile::default();
        file.branch.get_mut("develop").unwrap().remote.upstream = "up stream".into();
        let err = WorkflowConfig::from_config(&file).unwrap_err();
        assert!(err.to_string().contains("up stream"));
    }
}

use std::fmt;
use std::str::FromStr;

/// The fixed workflow roles a branch can play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BranchCategory {
    Feature,
    Release,
    Hotfix,
    Bugfix,
    Support,
    Task,
    Setup,
    Develop,
    Main,
}

/// Where a new branch starts when no base is given
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseRule {
    Develop,
    Main,
    /// The caller must name the base
    Explicit,
    /// The feature branch a task belongs to
    ParentFeature,
}

/// What `finish` does for a category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishProtocol {
    /// Merge into the parent (develop, or the parent feature), then delete
    MergeIntoParent,
    /// Merge into main, tag, merge into develop, then delete
    MainTagDevelop,
    /// Long-lived; cannot be finished
    LongLived,
}

/// Branch the verbose listing compares against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListTarget {
    Develop,
    Main,
    ParentFeature,
}

/// Static rules of one non-perpetual category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryRules {
    pub base: BaseRule,
    /// At most one branch of the category may exist at a time
    pub single_in_flight: bool,
    /// The identifier is a version; its tag must not exist yet
    pub versioned: bool,
    /// The base must be reachable from main
    pub base_on_main: bool,
    pub finish: FinishProtocol,
    pub list_target: ListTarget,
}

impl BranchCategory {
    pub const ALL: [BranchCategory; 9] = [
        BranchCategory::Feature,
        BranchCategory::Release,
        BranchCategory::Hotfix,
        BranchCategory::Bugfix,
        BranchCategory::Support,
        BranchCategory::Task,
        BranchCategory::Setup,
        BranchCategory::Develop,
        BranchCategory::Main,
    ];

    /// Name used on the command line and as the `[branch.<name>]` config key
    pub fn as_str(&self) -> &'static str {
        match self {
            BranchCategory::Feature => "feature",
            BranchCategory::Release => "release",
            BranchCategory::Hotfix => "hotfix",
            BranchCategory::Bugfix => "bugfix",
            BranchCategory::Support => "support",
            BranchCategory::Task => "task",
            BranchCategory::Setup => "setup",
            BranchCategory::Develop => "develop",
            BranchCategory::Main => "main",
        }
    }

    pub fn default_prefix(&self) -> &'static str {
        match self {
            BranchCategory::Feature => "feature/",
            BranchCategory::Release => "release/",
            BranchCategory::Hotfix => "hotfix/",
            BranchCategory::Bugfix => "bugfix/",
            BranchCategory::Support => "support/",
            BranchCategory::Task => "task/",
            BranchCategory::Setup => "setup/",
            BranchCategory::Develop | BranchCategory::Main => "",
        }
    }

    /// Main and develop: exactly one instance for the repository's lifetime
    pub fn is_perpetual(&self) -> bool {
        matches!(self, BranchCategory::Develop | BranchCategory::Main)
    }

    /// Lifecycle rules, `None` for the perpetual branches
    pub fn rules(&self) -> Option<CategoryRules> {
        let simple = CategoryRules {
            base: BaseRule::Develop,
            single_in_flight: false,
            versioned: false,
            base_on_main: false,
            finish: FinishProtocol::MergeIntoParent,
            list_target: ListTarget::Develop,
        };

        match self {
            BranchCategory::Feature | BranchCategory::Bugfix | BranchCategory::Setup => {
                Some(simple)
            }
            BranchCategory::Release => Some(CategoryRules {
                single_in_flight: true,
                versioned: true,
                finish: FinishProtocol::MainTagDevelop,
                ..simple
            }),
            BranchCategory::Hotfix => Some(CategoryRules {
                base: BaseRule::Main,
                single_in_flight: true,
                versioned: true,
                base_on_main: true,
                finish: FinishProtocol::MainTagDevelop,
                list_target: ListTarget::Main,
            }),
            BranchCategory::Support => Some(CategoryRules {
                base: BaseRule::Explicit,
                base_on_main: true,
                finish: FinishProtocol::LongLived,
                list_target: ListTarget::Main,
                ..simple
            }),
            BranchCategory::Task => Some(CategoryRules {
                base: BaseRule::ParentFeature,
                list_target: ListTarget::ParentFeature,
                ..simple
            }),
            BranchCategory::Develop | BranchCategory::Main => None,
        }
    }
}

impl fmt::Display for BranchCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BranchCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        if lower == "master" {
            return Ok(BranchCategory::Main);
        }
        BranchCategory::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == lower)
            .ok_or_else(|| {
                let names: Vec<&str> = BranchCategory::ALL.iter().map(|c| c.as_str()).collect();
                format!(
                    "unknown branch category '{}' (expected one of: {})",
                    s,
                    names.join(", ")
                )
            })
    }
}

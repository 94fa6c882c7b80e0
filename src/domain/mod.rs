//! Domain logic - pure workflow rules independent of git operations

pub mod branch;
pub mod category;
pub mod tag;

pub use branch::{Branch, BranchStatus};
pub use category::{BaseRule, BranchCategory, CategoryRules, FinishProtocol, ListTarget};
pub use tag::{compare_versions, parse_lenient, TagPattern};

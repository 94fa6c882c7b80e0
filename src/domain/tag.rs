use std::cmp::Ordering;

use semver::Version;

/// Version tag naming: a fixed prefix followed by the version (`v1.2`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPattern {
    pub prefix: String,
}

impl TagPattern {
    pub fn new(prefix: impl Into<String>) -> Self {
        TagPattern {
            prefix: prefix.into(),
        }
    }

    /// Format a version according to the pattern
    /// Example: prefix="v", version="1.2" -> "v1.2"
    pub fn format(&self, version: &str) -> String {
        format!("{}{}", self.prefix, version)
    }
}

/// Parse a semantic version, padding short forms (`1` -> `1.0.0`,
/// `1.2` -> `1.2.0`)
pub fn parse_lenient(version: &str) -> Option<Version> {
    if let Ok(v) = Version::parse(version) {
        return Some(v);
    }

    let (core, rest) = match version.find(['-', '+']) {
        Some(pos) => version.split_at(pos),
        None => (version, ""),
    };
    let padded = match core.split('.').count() {
        1 => format!("{}.0.0{}", core, rest),
        2 => format!("{}.0{}", core, rest),
        _ => return None,
    };
    Version::parse(&padded).ok()
}

/// Order identifiers by semantic version; non-versions sort after
/// versions, alphabetically
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (parse_lenient(a), parse_lenient(b)) {
        (Some(va), Some(vb)) => va.cmp(&vb).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_format() {
        let pattern = TagPattern::new("v");
        assert_eq!(pattern.format("1.2.3"), "v1.2.3");
        assert_eq!(TagPattern::new("").format("1.0"), "1.0");
    }

    #[test]
    fn test_pattern_with_longer_prefix() {
        let pattern = TagPattern::new("release-");
        assert_eq!(pattern.format("1.2.3"), "release-1.2.3");
    }

    #[test]
    fn test_parse_lenient_pads_short_versions() {
        assert_eq!(parse_lenient("1"), Some(Version::new(1, 0, 0)));
        assert_eq!(parse_lenient("1.2"), Some(Version::new(1, 2, 0)));
        assert_eq!(parse_lenient("1.2.3"), Some(Version::new(1, 2, 3)));
        assert_eq!(
            parse_lenient("2.0-rc.1").map(|v| v.to_string()),
            Some("2.0.0-rc.1".to_string())
        );
        assert_eq!(parse_lenient("next"), None);
    }

    #[test]
    fn test_compare_versions_orders_numerically() {
        let mut ids = vec!["1.10", "1.2", "legacy", "1.9.1", "2.0-rc.1", "2.0"];
        ids.sort_by(|a, b| compare_versions(a, b));
        assert_eq!(ids, vec!["1.2", "1.9.1", "1.10", "2.0-rc.1", "2.0", "legacy"]);
    }
}

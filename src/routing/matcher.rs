//! Path pattern matching for push rules.
//!
//! # Design Decisions
//! - Patterns are path prefixes; no regex in the hot path
//! - `/` and the empty pattern match every path
//! - Case sensitivity is a site-wide setting

/// Matches request paths against a rule pattern.
#[derive(Debug, Clone, Copy)]
pub struct PathMatcher {
    case_sensitive: bool,
}

impl PathMatcher {
    pub fn new(case_sensitive: bool) -> Self {
        Self { case_sensitive }
    }

    /// Returns true if `path` falls under `pattern`.
    pub fn matches(&self, path: &str, pattern: &str) -> bool {
        if pattern.is_empty() || pattern == "/" {
            return true;
        }
        if self.case_sensitive {
            path.starts_with(pattern)
        } else {
            path.len() >= pattern.len()
                && path.as_bytes()[..pattern.len()].eq_ignore_ascii_case(pattern.as_bytes())
        }
    }
}

impl Default for PathMatcher {
    fn default() -> Self {
        Self::new(true)
    }
}

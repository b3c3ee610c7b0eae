//! Line matching predicates
//!
//! A matcher decides whether a scanned line belongs in the output. Matchers
//! are stateless and shared across all producer threads.

use anyhow::Result;
use regex::RegexBuilder;

/// Predicate applied to every scanned line
pub trait Matcher: Send + Sync {
    fn matches(&self, line: &str) -> bool;
}

impl Matcher for Box<dyn Matcher> {
    fn matches(&self, line: &str) -> bool {
        (**self).matches(line)
    }
}

/// Literal substring containment (the default matcher)
pub struct SubstringMatcher {
    token: String,
    ignore_case: bool,
}

impl SubstringMatcher {
    pub fn new(token: &str, ignore_case: bool) -> Self {
        let token = if ignore_case {
            token.to_lowercase()
        } else {
            token.to_string()
        };
        Self { token, ignore_case }
    }
}

impl Matcher for SubstringMatcher {
    fn matches(&self, line: &str) -> bool {
        if self.ignore_case {
            line.to_lowercase().contains(&self.token)
        } else {
            line.contains(&self.token)
        }
    }
}

/// Regex matcher selected by --regex
pub struct RegexMatcher {
    pattern: regex::Regex,
}

impl RegexMatcher {
    pub fn new(pattern: &str, ignore_case: bool) -> Result<Self> {
        let pattern = RegexBuilder::new(pattern)
            .case_insensitive(ignore_case)
            .build()
            .map_err(|e| anyhow::anyhow!("Invalid pattern '{}': {}", pattern, e))?;
        Ok(Self { pattern })
    }
}

impl Matcher for RegexMatcher {
    fn matches(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }
}

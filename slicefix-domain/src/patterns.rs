//! Glob matching for the ignore and test-file lists.

use glob::{MatchOptions, Pattern};
use thiserror::Error;

use crate::path::normalize_separators;

#[derive(Debug, Error)]
#[error("invalid glob pattern '{pattern}': {source}")]
pub struct PatternError {
    pub pattern: String,
    #[source]
    pub source: glob::PatternError,
}

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A compiled list of globs. An empty list matches nothing.
#[derive(Debug, Clone, Default)]
pub struct PathMatcher {
    patterns: Vec<Pattern>,
}

impl PathMatcher {
    pub fn new<I, S>(patterns: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| {
                let raw = normalize_separators(p.as_ref());
                Pattern::new(&raw).map_err(|source| PatternError {
                    pattern: p.as_ref().to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// True when any pattern matches `candidate` after separator normalization.
    pub fn matches(&self, candidate: &str) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let candidate = normalize_separators(candidate);
        self.patterns
            .iter()
            .any(|p| p.matches_with(&candidate, MATCH_OPTIONS))
    }

    /// True when any candidate matches.
    pub fn matches_any<'a>(&self, candidates: impl IntoIterator<Item = &'a str>) -> bool {
        candidates.into_iter().any(|c| self.matches(c))
    }
}

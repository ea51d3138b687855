use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A proposed equivalence: `source` (hypothesis spelling) should count as
/// `target` (reference spelling).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Suggestion {
    pub source: String,
    pub target: String,
}

impl Suggestion {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

/// Drops repeated pairs, comparing case-insensitively. The first spelling
/// seen is kept.
pub fn dedupe_suggestions(suggestions: Vec<Suggestion>) -> Vec<Suggestion> {
    let mut seen = HashSet::new();
    suggestions
        .into_iter()
        .filter(|s| seen.insert((s.source.to_lowercase(), s.target.to_lowercase())))
        .collect()
}

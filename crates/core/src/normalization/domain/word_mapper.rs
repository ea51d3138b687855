use std::collections::HashMap;

use regex::{Captures, Regex};

use super::equivalence_map::EquivalenceMap;

/// Compiled form of an [`EquivalenceMap`]: one case-insensitive alternation
/// of every alias, longest first, bounded by word boundaries.
#[derive(Debug, Clone)]
pub struct WordMapper {
    pattern: Option<Regex>,
    lookup: HashMap<String, String>,
}

impl WordMapper {
    pub fn new(map: &EquivalenceMap) -> Result<Self, regex::Error> {
        let lookup: HashMap<String, String> = map
            .alias_lookup()
            .into_iter()
            .map(|(alias, target)| (alias.to_string(), target.to_string()))
            .collect();
        if lookup.is_empty() {
            return Ok(Self::identity());
        }

        let mut aliases: Vec<&str> = lookup.keys().map(String::as_str).collect();
        // Longer aliases first so "going to" wins over "going".
        aliases.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        let alternation = aliases
            .iter()
            .map(|alias| regex::escape(alias))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(r"(?i)\b(?:{alternation})\b"))?;

        log::debug!("Compiled word mapper with {} aliases", lookup.len());
        Ok(Self {
            pattern: Some(pattern),
            lookup,
        })
    }

    /// A mapper that leaves text untouched.
    pub fn identity() -> Self {
        Self {
            pattern: None,
            lookup: HashMap::new(),
        }
    }

    pub fn is_identity(&self) -> bool {
        self.pattern.is_none()
    }

    /// Replaces every alias occurrence with its canonical target.
    pub fn apply(&self, text: &str) -> String {
        let Some(pattern) = &self.pattern else {
            return text.to_string();
        };
        pattern
            .replace_all(text, |caps: &Captures| {
                let matched = &caps[0];
                self.lookup
                    .get(&matched.to_lowercase())
                    .cloned()
                    .unwrap_or_else(|| matched.to_string())
            })
            .into_owned()
    }
}

/// Builds a [`WordMapper`] for `map` and applies it once.
///
/// If the alias pattern cannot be compiled the text is returned unchanged.
pub fn apply_word_map(text: &str, map: &EquivalenceMap) -> String {
    match WordMapper::new(map) {
        Ok(mapper) => mapper.apply(text),
        Err(e) => {
            log::warn!("Word map could not be compiled, leaving text as is: {e}");
            text.to_string()
        }
    }
}

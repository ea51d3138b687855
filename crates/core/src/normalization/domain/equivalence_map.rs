use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WordMapError {
    #[error("source and target words must not be empty")]
    EmptyWord,
    #[error("'{0}' cannot be mapped to itself")]
    SelfMapping(String),
    #[error("invalid word map payload (expected an object of string arrays): {0}")]
    InvalidPayload(#[source] serde_json::Error),
    #[error("alias '{alias}' is listed under both '{first}' and '{second}'")]
    DuplicateAlias {
        alias: String,
        first: String,
        second: String,
    },
}

/// Canonical target word → set of alias spellings, all lower-cased.
///
/// An alias belongs to at most one target, and a target without aliases is
/// removed. Serializes as `{ "target": ["alias", ...] }` with sorted keys and
/// aliases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EquivalenceMap {
    #[serde(deserialize_with = "deserialize_targets")]
    targets: BTreeMap<String, BTreeSet<String>>,
}

fn deserialize_targets<'de, D>(deserializer: D) -> Result<BTreeMap<String, BTreeSet<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = BTreeMap::<String, Vec<String>>::deserialize(deserializer)?;
    EquivalenceMap::try_from(raw)
        .map(|map| map.targets)
        .map_err(serde::de::Error::custom)
}

fn canonical(word: &str) -> String {
    word.trim().to_lowercase()
}

impl EquivalenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an exported map, rejecting anything that is not an object of
    /// string arrays or that lists one alias under two targets.
    pub fn from_json(json: &str) -> Result<Self, WordMapError> {
        let raw: BTreeMap<String, Vec<String>> =
            serde_json::from_str(json).map_err(WordMapError::InvalidPayload)?;
        Self::try_from(raw)
    }

    /// Replaces the whole map with `json`. On error `self` is left as it was.
    pub fn replace_with_json(&mut self, json: &str) -> Result<(), WordMapError> {
        *self = Self::from_json(json)?;
        Ok(())
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Builds a grouped map from the older flat `{ "source": "target" }`
    /// layout. Pairs that cannot be added are skipped.
    pub fn from_flat_pairs(pairs: &BTreeMap<String, String>) -> Self {
        let mut map = Self::new();
        for (source, target) in pairs {
            if let Err(e) = map.add_alias(source, target) {
                log::warn!("Skipping legacy mapping '{source}' -> '{target}': {e}");
            }
        }
        map
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Number of target words.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn alias_count(&self) -> usize {
        self.targets.values().map(BTreeSet::len).sum()
    }

    /// Targets in sorted order with their sorted aliases.
    pub fn iter(&self) -> impl Iterator<Item = (&str, impl Iterator<Item = &str>)> {
        self.targets
            .iter()
            .map(|(target, aliases)| (target.as_str(), aliases.iter().map(String::as_str)))
    }

    pub fn aliases_of(&self, target: &str) -> Option<&BTreeSet<String>> {
        self.targets.get(&canonical(target))
    }

    pub fn target_of(&self, alias: &str) -> Option<&str> {
        let alias = canonical(alias);
        self.targets
            .iter()
            .find(|(_, aliases)| aliases.contains(&alias))
            .map(|(target, _)| target.as_str())
    }

    /// True if `source` is already an alias of `target` (case-insensitive).
    pub fn contains_mapping(&self, source: &str, target: &str) -> bool {
        self.aliases_of(target)
            .is_some_and(|aliases| aliases.contains(&canonical(source)))
    }

    /// Flat alias → target lookup.
    pub fn alias_lookup(&self) -> HashMap<&str, &str> {
        self.targets
            .iter()
            .flat_map(|(target, aliases)| {
                aliases
                    .iter()
                    .map(move |alias| (alias.as_str(), target.as_str()))
            })
            .collect()
    }

    /// Maps `source` to `target`. An alias already filed under a different
    /// target is moved. Returns whether the map changed.
    pub fn add_alias(&mut self, source: &str, target: &str) -> Result<bool, WordMapError> {
        let source = canonical(source);
        let target = canonical(target);
        if source.is_empty() || target.is_empty() {
            return Err(WordMapError::EmptyWord);
        }
        if source == target {
            return Err(WordMapError::SelfMapping(source));
        }
        if self.contains_mapping(&source, &target) {
            return Ok(false);
        }

        if let Some(previous) = self.target_of(&source).map(str::to_string) {
            log::debug!("Moving alias '{source}' from '{previous}' to '{target}'");
            self.remove_alias(&source, &previous);
        }
        self.targets.entry(target).or_default().insert(source);
        Ok(true)
    }

    /// Removes one alias; the target goes too once it has none left.
    pub fn remove_alias(&mut self, source: &str, target: &str) -> bool {
        let target = canonical(target);
        let Some(aliases) = self.targets.get_mut(&target) else {
            return false;
        };
        let removed = aliases.remove(&canonical(source));
        if aliases.is_empty() {
            self.targets.remove(&target);
        }
        removed
    }

    pub fn remove_target(&mut self, target: &str) -> bool {
        self.targets.remove(&canonical(target)).is_some()
    }
}

impl TryFrom<BTreeMap<String, Vec<String>>> for EquivalenceMap {
    type Error = WordMapError;

    fn try_from(raw: BTreeMap<String, Vec<String>>) -> Result<Self, Self::Error> {
        let mut targets: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut owner: HashMap<String, String> = HashMap::new();

        for (target, sources) in raw {
            let target = canonical(&target);
            if target.is_empty() {
                continue;
            }
            for source in sources {
                let source = canonical(&source);
                if source.is_empty() || source == target {
                    continue;
                }
                if let Some(first) = owner.get(&source) {
                    if *first != target {
                        return Err(WordMapError::DuplicateAlias {
                            alias: source,
                            first: first.clone(),
                            second: target,
                        });
                    }
                }
                owner.insert(source.clone(), target.clone());
                targets.entry(target.clone()).or_default().insert(source);
            }
        }

        Ok(Self { targets })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn behavior_map() -> EquivalenceMap {
        let mut map = EquivalenceMap::new();
        map.add_alias("behaviour", "behavior").unwrap();
        map.add_alias("Behavier", "Behavior").unwrap();
        map
    }

    #[test]
    fn test_add_alias_lowercases_and_groups() {
        let map = behavior_map();
        assert_eq!(map.len(), 1);
        let aliases: Vec<_> = map.aliases_of("BEHAVIOR").unwrap().iter().collect();
        assert_eq!(aliases, vec!["behavier", "behaviour"]);
    }

    #[test]
    fn test_add_existing_alias_is_noop() {
        let mut map = behavior_map();
        assert!(!map.add_alias("BEHAVIOUR", "behavior").unwrap());
        assert_eq!(map.alias_count(), 2);
    }

    #[test]
    fn test_add_alias_rejects_empty_and_self() {
        let mut map = EquivalenceMap::new();
        assert!(matches!(map.add_alias(" ", "x"), Err(WordMapError::EmptyWord)));
        assert!(matches!(
            map.add_alias("Color", "color"),
            Err(WordMapError::SelfMapping(_))
        ));
        assert!(map.is_empty());
    }

    #[test]
    fn test_alias_moves_to_new_target() {
        let mut map = EquivalenceMap::new();
        map.add_alias("colour", "color").unwrap();
        map.add_alias("colour", "hue").unwrap();
        assert_eq!(map.target_of("colour"), Some("hue"));
        // The old target lost its only alias and disappears.
        assert!(map.aliases_of("color").is_none());
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_removing_last_alias_removes_target() {
        let mut map = behavior_map();
        assert!(map.remove_alias("behaviour", "behavior"));
        assert_eq!(map.len(), 1);
        assert!(map.remove_alias("BEHAVIER", "behavior"));
        assert!(map.is_empty());
        assert!(!map.remove_alias("behavier", "behavior"));
    }

    #[test]
    fn test_remove_target() {
        let mut map = behavior_map();
        assert!(map.remove_target("Behavior"));
        assert!(map.is_empty());
        assert!(!map.remove_target("behavior"));
    }

    #[test]
    fn test_contains_mapping_ignores_case() {
        let map = behavior_map();
        assert!(map.contains_mapping("Behaviour", "BEHAVIOR"));
        assert!(!map.contains_mapping("behaviour", "conduct"));
    }

    #[test]
    fn test_json_round_trip() {
        let map = behavior_map();
        let json = map.to_json_pretty().unwrap();
        assert!(json.contains("\"behavior\""));
        assert_eq!(EquivalenceMap::from_json(&json).unwrap(), map);
    }

    #[test]
    fn test_from_json_normalizes_entries() {
        let map = EquivalenceMap::from_json(r#"{"OK": ["Okay", "okay", "ok"], "empty": []}"#)
            .unwrap();
        assert_eq!(map.len(), 1);
        let aliases: Vec<_> = map.aliases_of("ok").unwrap().iter().collect();
        assert_eq!(aliases, vec!["okay"]);
    }

    #[test]
    fn test_from_json_rejects_wrong_shapes() {
        for payload in [r#"["a"]"#, r#"{"a": "b"}"#, r#"{"a": [1, 2]}"#, "not json"] {
            assert!(
                matches!(
                    EquivalenceMap::from_json(payload),
                    Err(WordMapError::InvalidPayload(_))
                ),
                "payload should be rejected: {payload}"
            );
        }
    }

    #[test]
    fn test_from_json_rejects_alias_under_two_targets() {
        let result = EquivalenceMap::from_json(r#"{"a": ["x"], "b": ["X"]}"#);
        assert!(matches!(result, Err(WordMapError::DuplicateAlias { .. })));
    }

    #[test]
    fn test_replace_with_invalid_json_keeps_state() {
        let mut map = behavior_map();
        let before = map.clone();
        assert!(map.replace_with_json(r#"{"a": 5}"#).is_err());
        assert_eq!(map, before);

        map.replace_with_json(r#"{"gonna": ["going to"]}"#).unwrap();
        assert_eq!(map.target_of("going to"), Some("gonna"));
    }

    #[test]
    fn test_serde_deserialize_applies_validation() {
        let err = serde_json::from_str::<EquivalenceMap>(r#"{"a": ["x"], "b": ["x"]}"#);
        assert!(err.is_err());
        let map: EquivalenceMap = serde_json::from_str(r#"{"Yes": ["Yeah"]}"#).unwrap();
        assert!(map.contains_mapping("yeah", "yes"));
    }

    #[test]
    fn test_from_flat_pairs_groups_by_target() {
        let pairs = BTreeMap::from([
            ("Behaviour".to_string(), "behavior".to_string()),
            ("behavier".to_string(), "Behavior".to_string()),
            ("same".to_string(), "same".to_string()),
        ]);
        let map = EquivalenceMap::from_flat_pairs(&pairs);
        assert_eq!(map.len(), 1);
        assert_eq!(map.alias_count(), 2);
    }

    #[test]
    fn test_alias_lookup_is_flat() {
        let map = behavior_map();
        let lookup = map.alias_lookup();
        assert_eq!(lookup.get("behaviour"), Some(&"behavior"));
        assert_eq!(lookup.len(), 2);
    }
}

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::normalization::domain::equivalence_map::{EquivalenceMap, WordMapError};
use crate::shared::constants::{APP_CONFIG_DIR, WORD_MAP_FILENAME};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("failed to access word map at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("word map at {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("word map at {path} is invalid: {source}")]
    Map {
        path: PathBuf,
        #[source]
        source: WordMapError,
    },
}

/// File-backed persistence for the [`EquivalenceMap`].
#[derive(Debug, Clone)]
pub struct WordMapStore {
    path: PathBuf,
}

impl WordMapStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<config dir>/TranscriptCompare/word_map.json`.
    pub fn default_location() -> Result<Self, StoreError> {
        let dir = dirs::config_dir().ok_or(StoreError::NoConfigDir)?;
        Ok(Self::new(dir.join(APP_CONFIG_DIR).join(WORD_MAP_FILENAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored map. A missing file is an empty map; a file in the
    /// old flat `{ "source": "target" }` layout is converted and rewritten.
    pub fn load(&self) -> Result<EquivalenceMap, StoreError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("No word map at {}, starting empty", self.path.display());
                return Ok(EquivalenceMap::new());
            }
            Err(source) => return Err(self.io_error(source)),
        };

        let value: serde_json::Value =
            serde_json::from_str(&json).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;

        if let Some(legacy) = flat_pairs(&value) {
            let map = EquivalenceMap::from_flat_pairs(&legacy);
            log::info!(
                "Migrated {} legacy word mappings in {} to grouped format",
                legacy.len(),
                self.path.display()
            );
            self.save(&map)?;
            return Ok(map);
        }

        let map = EquivalenceMap::from_json(&json).map_err(|source| StoreError::Map {
            path: self.path.clone(),
            source,
        })?;
        log::debug!(
            "Loaded {} word targets from {}",
            map.len(),
            self.path.display()
        );
        Ok(map)
    }

    pub fn save(&self, map: &EquivalenceMap) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }
        let json = map.to_json_pretty().map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json).map_err(|source| self.io_error(source))
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// `Some` when `value` is a non-empty object whose values are all strings.
fn flat_pairs(value: &serde_json::Value) -> Option<BTreeMap<String, String>> {
    let object = value.as_object().filter(|object| !object.is_empty())?;
    object
        .iter()
        .map(|(source, target)| Some((source.clone(), target.as_str()?.to_string())))
        .collect()
}

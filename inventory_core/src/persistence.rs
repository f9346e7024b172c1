//! Saved inventory records and the stores they are written to

use crate::PersistError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Identity stored for an empty slot
pub const EMPTY_SLOT_ID: i64 = -1;

/// Default key inventories are saved under
pub const DEFAULT_SAVE_KEY: &str = "InventoryData";

/// Flat per-slot record of an inventory
///
/// Both sequences are indexed by slot position. Identities are only meaningful
/// against the catalog the inventory was saved with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryData {
    pub item_ids: Vec<i64>,
    pub amounts: Vec<u32>,
}

impl InventoryData {
    /// Number of slot entries
    pub fn len(&self) -> usize {
        self.item_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.item_ids.is_empty()
    }

    /// Check that both sequences have the same length
    pub fn validate(&self) -> Result<(), PersistError> {
        if self.item_ids.len() != self.amounts.len() {
            return Err(PersistError::Malformed(format!(
                "{} item ids but {} amounts",
                self.item_ids.len(),
                self.amounts.len()
            )));
        }
        Ok(())
    }

    /// Iterate `(identity, amount)` pairs; `None` marks an empty slot
    pub fn entries(&self) -> impl Iterator<Item = (Option<i64>, u32)> + '_ {
        self.item_ids
            .iter()
            .zip(&self.amounts)
            .map(|(&id, &amount)| ((id != EMPTY_SLOT_ID).then_some(id), amount))
    }

    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, PersistError> {
        let data: InventoryData = serde_json::from_str(json)?;
        data.validate()?;
        Ok(data)
    }
}

/// Named string storage for saved records
pub trait SaveStore {
    /// Fetch a record; `Ok(None)` if the key was never saved
    fn read(&self, key: &str) -> Result<Option<String>, PersistError>;

    /// Store a record, replacing any previous value
    fn write(&mut self, key: &str, value: &str) -> Result<(), PersistError>;

    fn contains(&self, key: &str) -> Result<bool, PersistError> {
        Ok(self.read(key)?.is_some())
    }
}

/// In-process store, mainly for tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.records.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.records.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per record in a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File a key is stored in
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl SaveStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, PersistError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PersistError::Io {
                error: e,
                path: Some(path),
            }),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| PersistError::Io {
            error: e,
            path: Some(self.dir.clone()),
        })?;
        let path = self.path_for(key);
        std::fs::write(&path, value).map_err(|e| PersistError::Io {
            error: e,
            path: Some(path),
        })
    }
}

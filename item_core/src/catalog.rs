use crate::definition::ItemDefinition;
use crate::item::ItemInstance;
use crate::types::{ItemId, ItemType, Rarity};
use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk layout of a catalog file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub items: Vec<ItemDefinition>,
}

/// Ordered collection of item definitions, loaded from TOML files
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    items: Vec<ItemDefinition>,
}

impl ItemCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut catalog = Self::new();
        catalog.extend_from_str(content, None)?;
        Ok(catalog)
    }

    /// Load every `*.toml` file under a directory (recursively)
    ///
    /// Files are read in path order so ids allocated later stay stable.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let mut catalog = Self::new();
        catalog.load_dir(dir)?;
        log::info!(
            "Loaded {} item definitions from {}",
            catalog.len(),
            dir.display()
        );
        Ok(catalog)
    }

    /// Load definitions from a directory recursively
    pub fn load_dir(&mut self, dir: &Path) -> Result<(), ConfigError> {
        if !dir.exists() {
            return Ok(());
        }

        let entries = std::fs::read_dir(dir).map_err(|e| ConfigError::Io {
            error: e,
            path: Some(dir.to_path_buf()),
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ConfigError::Io {
                error: e,
                path: Some(dir.to_path_buf()),
            })?;
            paths.push(entry.path());
        }
        paths.sort();

        for path in paths {
            if path.is_dir() {
                self.load_dir(&path)?;
            } else if path.extension().is_some_and(|ext| ext == "toml") {
                self.load_file(&path)?;
            }
        }

        Ok(())
    }

    /// Load a single catalog file, appending its definitions
    pub fn load_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            error: e,
            path: Some(path.to_path_buf()),
        })?;
        self.extend_from_str(&content, Some(path))
    }

    /// Parse and append; nothing is added if any definition is rejected
    fn extend_from_str(&mut self, content: &str, path: Option<&Path>) -> Result<(), ConfigError> {
        let file: CatalogFile = toml::from_str(content).map_err(|e| ConfigError::Parse {
            error: e,
            path: path.map(Path::to_path_buf),
        })?;

        let mut staged = self.clone();
        for def in file.items {
            staged.add_definition(def).map_err(|e| match e {
                ConfigError::Validation { message, .. } => ConfigError::Validation {
                    message,
                    path: path.map(Path::to_path_buf),
                },
                other => other,
            })?;
        }
        *self = staged;
        Ok(())
    }

    /// Identity the next authored definition should receive
    ///
    /// `None` once the last definition holds the largest possible id.
    pub fn next_id(&self) -> Option<ItemId> {
        match self.items.last() {
            Some(def) => def.id.checked_add(1),
            None => Some(1),
        }
    }

    /// Validate and append a definition
    ///
    /// An id of 0 is replaced with [`next_id`](Self::next_id). Returns the
    /// id the definition was stored under.
    pub fn add_definition(&mut self, mut def: ItemDefinition) -> Result<ItemId, ConfigError> {
        if def.id == 0 {
            def.id = self.next_id().ok_or_else(|| ConfigError::Validation {
                message: format!("no free item id left for '{}'", def.name),
                path: None,
            })?;
        }
        def.validate().map_err(|e| ConfigError::Validation {
            message: format!("item {} ('{}'): {}", def.id, def.name, e),
            path: None,
        })?;
        if self.contains(def.id) {
            return Err(ConfigError::Validation {
                message: format!("duplicate item id {}", def.id),
                path: None,
            });
        }

        let id = def.id;
        self.items.push(def);
        Ok(id)
    }

    /// Remove a definition by id
    pub fn remove_definition(&mut self, id: ItemId) -> Option<ItemDefinition> {
        let index = self.items.iter().position(|def| def.id == id)?;
        Some(self.items.remove(index))
    }

    /// First definition with the given id
    pub fn get(&self, id: ItemId) -> Option<&ItemDefinition> {
        self.items.iter().find(|def| def.id == id)
    }

    /// Check if an id is defined
    pub fn contains(&self, id: ItemId) -> bool {
        self.get(id).is_some()
    }

    /// Definitions of a type, in catalog order
    pub fn by_type(&self, item_type: ItemType) -> Vec<&ItemDefinition> {
        self.items
            .iter()
            .filter(|def| def.item_type == item_type)
            .collect()
    }

    /// Definitions of a rarity, in catalog order
    pub fn by_rarity(&self, rarity: Rarity) -> Vec<&ItemDefinition> {
        self.items
            .iter()
            .filter(|def| def.rarity == rarity)
            .collect()
    }

    /// Stamp a fresh instance of a definition
    pub fn instantiate(&self, id: ItemId) -> Option<ItemInstance> {
        self.get(id).map(ItemInstance::new)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemDefinition> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

//! item_core - Item definitions and live item instances
//!
//! This library provides:
//! - ItemDefinition / ItemCatalog: Item templates, loadable from TOML
//! - ItemInstance: A live item with durability, enhancement and enchantments
//! - Set bonuses backed by a process-wide set registry
//! - UseHandler: The hook run when an item is used
//!
//! # Quick Start
//!
//! ```rust
//! use item_core::prelude::*;
//! use rand::rngs::mock::StepRng;
//!
//! let catalog = ItemCatalog::from_toml_str(r#"
//! [[items]]
//! id = 1
//! name = "Iron Sword"
//! icon = "icons/iron_sword.png"
//! item_type = "weapon"
//!
//! [items.stats]
//! attack = 10.0
//! "#).unwrap();
//!
//! let mut sword = catalog.instantiate(1).unwrap();
//! sword.add_enchantment(Enchantment::new("Fire", "Burns").with_bonus("attack", 2.0)).unwrap();
//!
//! let outcome = sword.enhance(&mut StepRng::new(0, 0));
//! assert_eq!(outcome, EnhanceOutcome::Success { level: 1 });
//! assert!((sword.total_stats().attack - 13.0).abs() < 1e-9);
//! ```

pub mod catalog;
pub mod definition;
pub mod enchantment;
pub mod enhance;
pub mod item;
pub mod prelude;
pub mod set_registry;
pub mod sets;
pub mod types;
pub mod use_action;

pub use catalog::{CatalogFile, ItemCatalog};
pub use definition::{DefinitionError, DurabilityConfig, ItemDefinition, SetBonusTier};
pub use enchantment::{Enchantment, DEFAULT_ENCHANT_MAX_LEVEL, MAX_ENCHANTMENTS};
pub use enhance::{EnhanceOutcome, MAX_ENHANCE_LEVEL};
pub use item::{Durability, ItemInstance};
pub use set_registry::{InstanceKey, SetRegistry};
pub use sets::{active_sets, aggregate_set_bonuses, ActiveSet};
pub use types::{ItemId, ItemType, Rarity, RarityColor};
pub use use_action::{LogUseHandler, UseHandler, UseHandlers, UseOutcome};

// Re-export stat types used in item APIs
pub use stat_core::{EquipmentStats, StatKind};

use std::path::PathBuf;
use thiserror::Error;

/// Error loading or authoring item definitions
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading '{path:?}': {error}")]
    Io {
        error: std::io::Error,
        path: Option<PathBuf>,
    },
    #[error("Parse error in '{path:?}': {error}")]
    Parse {
        error: toml::de::Error,
        path: Option<PathBuf>,
    },
    #[error("Validation error in '{path:?}': {message}")]
    Validation {
        message: String,
        path: Option<PathBuf>,
    },
}

/// Error applying an enchantment
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnchantError {
    #[error("Enchantment '{name}' is already at max level {max_level}")]
    MaxLevel { name: String, max_level: u32 },
    #[error("All {max} enchantment slots are in use")]
    SlotsFull { max: usize },
    #[error("Enchantment '{name}' has level {level} outside [1, {max_level}]")]
    InvalidLevel {
        name: String,
        level: u32,
        max_level: u32,
    },
}

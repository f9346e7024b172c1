//! inventory_core - Slot-based player inventories
//!
//! This library provides:
//! - Slot: One stack with lock and highlight flags
//! - Inventory: Fixed-capacity slots with add/remove/move/use operations
//! - InventoryEvent: Synchronous change notifications by slot index
//! - InventoryData / SaveStore: Flat save records and where they are kept
//!
//! # Quick Start
//!
//! ```rust
//! use inventory_core::{Inventory, MemoryStore, DEFAULT_SAVE_KEY};
//! use item_core::{ItemCatalog, ItemDefinition, ItemType};
//!
//! let mut catalog = ItemCatalog::new();
//! catalog.add_definition(
//!     ItemDefinition::new(1, "Health Potion")
//!         .with_icon("icons/potion.png")
//!         .with_type(ItemType::Consumable)
//!         .with_max_stack(20),
//! ).unwrap();
//!
//! let mut bag = Inventory::new(20);
//! let potion = catalog.instantiate(1).unwrap();
//! bag.add_item(&potion, 5).unwrap();
//!
//! let mut store = MemoryStore::new();
//! bag.save(&mut store, DEFAULT_SAVE_KEY).unwrap();
//!
//! let mut restored = Inventory::new(20);
//! assert!(restored.load(&catalog, &store, DEFAULT_SAVE_KEY).unwrap());
//! assert_eq!(restored.count_item(1), 5);
//! ```

mod config;
pub mod events;
mod inventory;
mod persistence;
mod slot;

pub use config::{InventoryConfig, InventoryFileConfig};
pub use events::{InventoryEvent, SubscriberId};
pub use inventory::Inventory;
pub use persistence::{
    FileStore, InventoryData, MemoryStore, SaveStore, DEFAULT_SAVE_KEY, EMPTY_SLOT_ID,
};
pub use slot::Slot;

use item_core::ItemId;
use std::path::PathBuf;
use thiserror::Error;

/// Error loading inventory configuration
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

/// Why a slot-level stacking operation was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SlotError {
    #[error("Slot is empty")]
    Empty,
    #[error("Slot is locked")]
    Locked,
    #[error("Target slot is locked")]
    TargetLocked,
    #[error("Target slot holds a different item")]
    IdentityMismatch,
    #[error("Requested {requested} but only {available} available")]
    InsufficientAmount { requested: u32, available: u32 },
    #[error("Target stack has no room")]
    NoRoom,
    #[error("Amount must be at least 1")]
    InvalidAmount,
}

/// Why an inventory operation was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    #[error("Amount must be at least 1")]
    InvalidAmount,
    #[error("No single slot can take {amount} x item {id}")]
    NoSpace { id: ItemId, amount: u32 },
    #[error("Slot {index} out of range (capacity {capacity})")]
    SlotOutOfRange { index: usize, capacity: usize },
    #[error("Slot {0} is empty")]
    EmptySlot(usize),
    #[error("Slot {slot} holds {available}, cannot remove {requested}")]
    InsufficientAmount {
        slot: usize,
        requested: u32,
        available: u32,
    },
    /// Partial removal already applied
    #[error("Removed only {removed} of {requested} x item {id}")]
    Insufficient {
        id: ItemId,
        requested: u32,
        removed: u32,
    },
    #[error("Source and target are both slot {0}")]
    SameSlot(usize),
    #[error("Slot {slot}: {source}")]
    Slot { slot: usize, source: SlotError },
}

/// Error saving or loading an inventory
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error on '{path:?}': {error}")]
    Io {
        error: std::io::Error,
        path: Option<PathBuf>,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Malformed inventory record: {0}")]
    Malformed(String),
}

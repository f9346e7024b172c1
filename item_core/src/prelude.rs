//! Prelude module for convenient imports
//!
//! ```rust
//! use item_core::prelude::*;
//! ```

pub use crate::catalog::ItemCatalog;
pub use crate::definition::{ItemDefinition, SetBonusTier};
pub use crate::enchantment::Enchantment;
pub use crate::enhance::EnhanceOutcome;
pub use crate::item::ItemInstance;
pub use crate::sets::aggregate_set_bonuses;
pub use crate::types::{ItemId, ItemType, Rarity, RarityColor};
pub use crate::use_action::{UseHandler, UseOutcome};
pub use crate::{ConfigError, EnchantError};
pub use stat_core::{EquipmentStats, StatKind};

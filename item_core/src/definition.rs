//! Item templates as authored in catalog files

use crate::types::{ItemId, ItemType, Rarity};
use serde::{Deserialize, Serialize};
use stat_core::EquipmentStats;
use thiserror::Error;

/// Durability configuration of an item kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurabilityConfig {
    #[serde(default = "default_max_durability")]
    pub max: f64,
    #[serde(default = "default_can_be_broken")]
    pub can_be_broken: bool,
}

impl Default for DurabilityConfig {
    fn default() -> Self {
        DurabilityConfig {
            max: default_max_durability(),
            can_be_broken: default_can_be_broken(),
        }
    }
}

fn default_max_durability() -> f64 {
    100.0
}
fn default_can_be_broken() -> bool {
    true
}

/// One tier of a set bonus; all satisfied tiers stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetBonusTier {
    pub required_pieces: u32,
    #[serde(default)]
    pub bonus_stats: EquipmentStats,
    #[serde(default)]
    pub description: String,
}

impl SetBonusTier {
    pub fn new(
        required_pieces: u32,
        bonus_stats: EquipmentStats,
        description: impl Into<String>,
    ) -> Self {
        SetBonusTier {
            required_pieces,
            bonus_stats,
            description: description.into(),
        }
    }
}

/// Template describing one kind of item
///
/// Definitions live in an [`ItemCatalog`](crate::ItemCatalog) and are never
/// placed in inventories directly; live items are stamped from them with
/// [`ItemInstance::new`](crate::ItemInstance::new).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Opaque icon handle, typically an asset path
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub item_type: ItemType,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default)]
    pub price: f64,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub tag: String,
    #[serde(default = "default_max_stack_size")]
    pub max_stack_size: u32,
    #[serde(default)]
    pub stats: EquipmentStats,
    #[serde(default)]
    pub durability: DurabilityConfig,
    #[serde(default = "default_success_rate")]
    pub enhance_success_rate: f64,
    #[serde(default)]
    pub enhance_break_rate: f64,
    #[serde(default)]
    pub set_name: Option<String>,
    #[serde(default)]
    pub set_bonuses: Vec<SetBonusTier>,
}

fn default_level() -> u32 {
    1
}
fn default_max_stack_size() -> u32 {
    1
}
fn default_success_rate() -> f64 {
    100.0
}

/// Why a definition was rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DefinitionError {
    #[error("item name must not be empty")]
    MissingName,
    #[error("item icon must not be empty")]
    MissingIcon,
    #[error("max stack size must be at least 1")]
    InvalidStackSize,
    #[error("level must be at least 1")]
    InvalidLevel,
    #[error("price must be a non-negative number, got {0}")]
    InvalidPrice(f64),
    #[error("max durability must be a non-negative number, got {0}")]
    InvalidDurability(f64),
    #[error("{name} must be within [0, 100], got {value}")]
    InvalidRate { name: &'static str, value: f64 },
    #[error("set bonus tiers must require at least one piece")]
    InvalidSetTier,
    #[error("set bonus tiers require a set name")]
    TiersWithoutSet,
}

impl ItemDefinition {
    /// Create a definition with defaults for every optional field
    pub fn new(id: ItemId, name: impl Into<String>) -> Self {
        ItemDefinition {
            id,
            name: name.into(),
            description: String::new(),
            icon: String::new(),
            item_type: ItemType::default(),
            rarity: Rarity::default(),
            price: 0.0,
            level: default_level(),
            tag: String::new(),
            max_stack_size: default_max_stack_size(),
            stats: EquipmentStats::default(),
            durability: DurabilityConfig::default(),
            enhance_success_rate: default_success_rate(),
            enhance_break_rate: 0.0,
            set_name: None,
            set_bonuses: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_type(mut self, item_type: ItemType) -> Self {
        self.item_type = item_type;
        self
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_max_stack(mut self, max_stack_size: u32) -> Self {
        self.max_stack_size = max_stack_size;
        self
    }

    pub fn with_stats(mut self, stats: EquipmentStats) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_durability(mut self, max: f64, can_be_broken: bool) -> Self {
        self.durability = DurabilityConfig { max, can_be_broken };
        self
    }

    /// Set enhancement success and break chances, in percent
    pub fn with_enhance_rates(mut self, success_rate: f64, break_rate: f64) -> Self {
        self.enhance_success_rate = success_rate;
        self.enhance_break_rate = break_rate;
        self
    }

    pub fn with_set(mut self, set_name: impl Into<String>) -> Self {
        self.set_name = Some(set_name.into());
        self
    }

    pub fn with_set_bonus(mut self, tier: SetBonusTier) -> Self {
        self.set_bonuses.push(tier);
        self
    }

    /// Set name, treating an empty string as no set
    pub fn set_name(&self) -> Option<&str> {
        self.set_name.as_deref().filter(|s| !s.is_empty())
    }

    /// Whether more than one unit fits in a slot
    pub fn is_stackable(&self) -> bool {
        self.max_stack_size > 1
    }

    /// Check authoring-time constraints
    pub fn validate(&self) -> Result<(), DefinitionError> {
        if self.name.trim().is_empty() {
            return Err(DefinitionError::MissingName);
        }
        if self.icon.trim().is_empty() {
            return Err(DefinitionError::MissingIcon);
        }
        if self.max_stack_size == 0 {
            return Err(DefinitionError::InvalidStackSize);
        }
        if self.level == 0 {
            return Err(DefinitionError::InvalidLevel);
        }
        if self.price.is_nan() || self.price < 0.0 {
            return Err(DefinitionError::InvalidPrice(self.price));
        }
        if self.durability.max.is_nan() || self.durability.max < 0.0 {
            return Err(DefinitionError::InvalidDurability(self.durability.max));
        }
        for (name, value) in [
            ("enhance_success_rate", self.enhance_success_rate),
            ("enhance_break_rate", self.enhance_break_rate),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(DefinitionError::InvalidRate { name, value });
            }
        }
        if self.set_bonuses.iter().any(|t| t.required_pieces == 0) {
            return Err(DefinitionError::InvalidSetTier);
        }
        if !self.set_bonuses.is_empty() && self.set_name().is_none() {
            return Err(DefinitionError::TiersWithoutSet);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stat_core::StatKind;

    fn sword() -> ItemDefinition {
        ItemDefinition::new(1, "Iron Sword")
            .with_icon("icons/iron_sword.png")
            .with_type(ItemType::Weapon)
            .with_stats(EquipmentStats::new().with(StatKind::Attack, 10.0))
    }

    #[test]
    fn test_defaults() {
        let def = ItemDefinition::new(7, "Stone");
        assert_eq!(def.level, 1);
        assert_eq!(def.max_stack_size, 1);
        assert!((def.durability.max - 100.0).abs() < f64::EPSILON);
        assert!(def.durability.can_be_broken);
        assert!((def.enhance_success_rate - 100.0).abs() < f64::EPSILON);
        assert_eq!(def.enhance_break_rate, 0.0);
        assert!(!def.is_stackable());
    }

    #[test]
    fn test_validate_ok() {
        assert_eq!(sword().validate(), Ok(()));
    }

    #[test]
    fn test_validate_missing_name_and_icon() {
        let mut def = sword();
        def.name = "  ".to_string();
        assert_eq!(def.validate(), Err(DefinitionError::MissingName));

        let def = ItemDefinition::new(2, "Potion");
        assert_eq!(def.validate(), Err(DefinitionError::MissingIcon));
    }

    #[test]
    fn test_validate_numbers() {
        assert_eq!(
            sword().with_max_stack(0).validate(),
            Err(DefinitionError::InvalidStackSize)
        );
        assert_eq!(sword().with_level(0).validate(), Err(DefinitionError::InvalidLevel));
        assert!(matches!(
            sword().with_price(-1.0).validate(),
            Err(DefinitionError::InvalidPrice(_))
        ));
        assert!(matches!(
            sword().with_enhance_rates(120.0, 0.0).validate(),
            Err(DefinitionError::InvalidRate { name: "enhance_success_rate", .. })
        ));
    }

    #[test]
    fn test_validate_set_tiers() {
        let tier = SetBonusTier::new(2, EquipmentStats::new(), "2 pieces");
        assert_eq!(
            sword().with_set_bonus(tier.clone()).validate(),
            Err(DefinitionError::TiersWithoutSet)
        );
        assert_eq!(
            sword().with_set("Knight").with_set_bonus(tier).validate(),
            Ok(())
        );
        let zero = SetBonusTier::new(0, EquipmentStats::new(), "");
        assert_eq!(
            sword().with_set("Knight").with_set_bonus(zero).validate(),
            Err(DefinitionError::InvalidSetTier)
        );
    }

    #[test]
    fn test_empty_set_name_is_none() {
        assert_eq!(sword().with_set("").set_name(), None);
        assert_eq!(sword().with_set("Knight").set_name(), Some("Knight"));
    }
}

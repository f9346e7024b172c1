use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of an item kind, shared by a definition and every
/// instance stamped from it. Two stacks merge only when their ids match.
pub type ItemId = u32;

/// Broad item categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Weapon,
    Armor,
    Consumable,
    #[default]
    Material,
    Quest,
    Accessory,
}

impl ItemType {
    /// Get all item types
    pub fn all() -> &'static [ItemType] {
        &[
            ItemType::Weapon,
            ItemType::Armor,
            ItemType::Consumable,
            ItemType::Material,
            ItemType::Quest,
            ItemType::Accessory,
        ]
    }

    /// Weapons and armour show their combat stats in descriptions
    pub fn is_equipment(&self) -> bool {
        matches!(self, ItemType::Weapon | ItemType::Armor)
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemType::Weapon => write!(f, "Weapon"),
            ItemType::Armor => write!(f, "Armor"),
            ItemType::Consumable => write!(f, "Consumable"),
            ItemType::Material => write!(f, "Material"),
            ItemType::Quest => write!(f, "Quest"),
            ItemType::Accessory => write!(f, "Accessory"),
        }
    }
}

/// Item rarity tiers, ordered from most to least common
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Get all rarities in ascending order
    pub fn all() -> &'static [Rarity] {
        &[
            Rarity::Common,
            Rarity::Uncommon,
            Rarity::Rare,
            Rarity::Epic,
            Rarity::Legendary,
        ]
    }

    /// Rarity from its ordinal (0 = Common)
    pub fn from_index(index: u8) -> Option<Rarity> {
        Rarity::all().get(index as usize).copied()
    }

    /// Display color for this rarity
    pub fn color(&self) -> RarityColor {
        match self {
            Rarity::Common => RarityColor::White,
            Rarity::Uncommon => RarityColor::Green,
            Rarity::Rare => RarityColor::Blue,
            Rarity::Epic => RarityColor::Purple,
            Rarity::Legendary => RarityColor::Yellow,
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rarity::Common => write!(f, "Common"),
            Rarity::Uncommon => write!(f, "Uncommon"),
            Rarity::Rare => write!(f, "Rare"),
            Rarity::Epic => write!(f, "Epic"),
            Rarity::Legendary => write!(f, "Legendary"),
        }
    }
}

/// Fixed display colors, one per rarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RarityColor {
    #[default]
    White,
    Green,
    Blue,
    Purple,
    Yellow,
}

impl RarityColor {
    /// Color for a raw rarity ordinal; anything unrecognized is white
    pub fn from_index(index: u8) -> RarityColor {
        Rarity::from_index(index)
            .map(|r| r.color())
            .unwrap_or_default()
    }

    /// Get display color RGB
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            RarityColor::White => (255, 255, 255),
            RarityColor::Green => (0, 255, 0),
            RarityColor::Blue => (0, 0, 255),
            RarityColor::Purple => (128, 0, 128),
            RarityColor::Yellow => (255, 235, 4),
        }
    }
}

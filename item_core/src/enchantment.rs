use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Default level cap for a new enchantment
pub const DEFAULT_ENCHANT_MAX_LEVEL: u32 = 5;

/// Maximum number of distinct enchantments on one item
pub const MAX_ENCHANTMENTS: usize = 3;

/// A named, levelled enchantment with free-form stat bonuses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enchantment {
    /// Unique among the enchantments of one item
    pub name: String,
    pub description: String,
    pub level: u32,
    #[serde(default = "default_max_level")]
    pub max_level: u32,
    /// Stat name to bonus value, e.g. `"attack" -> 5.0`
    #[serde(default)]
    pub bonus_stats: HashMap<String, f64>,
}

fn default_max_level() -> u32 {
    DEFAULT_ENCHANT_MAX_LEVEL
}

impl Enchantment {
    /// Create a level 1 enchantment with the default level cap
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Enchantment {
            name: name.into(),
            description: description.into(),
            level: 1,
            max_level: DEFAULT_ENCHANT_MAX_LEVEL,
            bonus_stats: HashMap::new(),
        }
    }

    /// Set the level cap
    pub fn with_max_level(mut self, max_level: u32) -> Self {
        self.max_level = max_level;
        self
    }

    /// Set the starting level
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Add a stat bonus
    pub fn with_bonus(mut self, stat: impl Into<String>, value: f64) -> Self {
        self.bonus_stats.insert(stat.into(), value);
        self
    }

    /// Whether another level can be gained
    pub fn can_level_up(&self) -> bool {
        self.level < self.max_level
    }

    /// Level is within [1, max_level]
    pub fn is_valid(&self) -> bool {
        self.level >= 1 && self.level <= self.max_level
    }
}

impl fmt::Display for Enchantment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Lv.{}", self.name, self.level)
    }
}

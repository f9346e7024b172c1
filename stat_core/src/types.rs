//! Stat identifiers shared by items, enchantments and set bonuses

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One numeric field of an [`EquipmentStats`](crate::EquipmentStats) record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    // Resources
    Hp,
    Mp,
    // Combat
    Attack,
    Defense,
    Speed,
    CritRate,
    DodgeRate,
    // Attributes
    Strength,
    Intelligence,
    Dexterity,
    Vitality,
    Luck,
    // Advanced
    MagicResist,
    ArmorPen,
    MagicPen,
    LifeSteal,
    CooldownReduction,
}

impl StatKind {
    /// Get all stat kinds in record order
    pub fn all() -> &'static [StatKind] {
        &[
            StatKind::Hp,
            StatKind::Mp,
            StatKind::Attack,
            StatKind::Defense,
            StatKind::Speed,
            StatKind::CritRate,
            StatKind::DodgeRate,
            StatKind::Strength,
            StatKind::Intelligence,
            StatKind::Dexterity,
            StatKind::Vitality,
            StatKind::Luck,
            StatKind::MagicResist,
            StatKind::ArmorPen,
            StatKind::MagicPen,
            StatKind::LifeSteal,
            StatKind::CooldownReduction,
        ]
    }

    /// Whether this stat is a percentage clamped to [0, 100]
    pub fn is_percentage(&self) -> bool {
        matches!(
            self,
            StatKind::CritRate
                | StatKind::DodgeRate
                | StatKind::LifeSteal
                | StatKind::CooldownReduction
        )
    }

    /// Machine name used in bonus maps and config files
    pub fn key(&self) -> &'static str {
        match self {
            StatKind::Hp => "hp",
            StatKind::Mp => "mp",
            StatKind::Attack => "attack",
            StatKind::Defense => "defense",
            StatKind::Speed => "speed",
            StatKind::CritRate => "crit_rate",
            StatKind::DodgeRate => "dodge_rate",
            StatKind::Strength => "strength",
            StatKind::Intelligence => "intelligence",
            StatKind::Dexterity => "dexterity",
            StatKind::Vitality => "vitality",
            StatKind::Luck => "luck",
            StatKind::MagicResist => "magic_resist",
            StatKind::ArmorPen => "armor_pen",
            StatKind::MagicPen => "magic_pen",
            StatKind::LifeSteal => "life_steal",
            StatKind::CooldownReduction => "cooldown_reduction",
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatKind::Hp => write!(f, "HP"),
            StatKind::Mp => write!(f, "MP"),
            StatKind::Attack => write!(f, "Attack"),
            StatKind::Defense => write!(f, "Defense"),
            StatKind::Speed => write!(f, "Speed"),
            StatKind::CritRate => write!(f, "Crit Rate"),
            StatKind::DodgeRate => write!(f, "Dodge Rate"),
            StatKind::Strength => write!(f, "Strength"),
            StatKind::Intelligence => write!(f, "Intelligence"),
            StatKind::Dexterity => write!(f, "Dexterity"),
            StatKind::Vitality => write!(f, "Vitality"),
            StatKind::Luck => write!(f, "Luck"),
            StatKind::MagicResist => write!(f, "Magic Resist"),
            StatKind::ArmorPen => write!(f, "Armor Penetration"),
            StatKind::MagicPen => write!(f, "Magic Penetration"),
            StatKind::LifeSteal => write!(f, "Life Steal"),
            StatKind::CooldownReduction => write!(f, "Cooldown Reduction"),
        }
    }
}

/// A stat name that does not match any [`StatKind`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown stat: {0}")]
pub struct UnknownStat(pub String);

impl FromStr for StatKind {
    type Err = UnknownStat;

    /// Accepts the snake_case key as well as the camelCase spelling
    /// (`critRate`, `lifeSteal`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != ' ')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        StatKind::all()
            .iter()
            .copied()
            .find(|kind| kind.key().replace('_', "") == normalized)
            .ok_or_else(|| UnknownStat(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_snake_and_camel_case() {
        assert_eq!("crit_rate".parse::<StatKind>(), Ok(StatKind::CritRate));
        assert_eq!("critRate".parse::<StatKind>(), Ok(StatKind::CritRate));
        assert_eq!("HP".parse::<StatKind>(), Ok(StatKind::Hp));
        assert_eq!(
            "CooldownReduction".parse::<StatKind>(),
            Ok(StatKind::CooldownReduction)
        );
    }

    #[test]
    fn test_parse_unknown() {
        let err = "fire_damage".parse::<StatKind>().unwrap_err();
        assert_eq!(err, UnknownStat("fire_damage".to_string()));
    }

    #[test]
    fn test_keys_round_trip() {
        for kind in StatKind::all() {
            assert_eq!(kind.key().parse::<StatKind>(), Ok(*kind));
        }
    }

    #[test]
    fn test_percentage_stats() {
        let percent: Vec<_> = StatKind::all()
            .iter()
            .filter(|k| k.is_percentage())
            .collect();
        assert_eq!(percent.len(), 4);
        assert!(!StatKind::Attack.is_percentage());
    }
}

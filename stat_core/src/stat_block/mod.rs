//! EquipmentStats - the numeric stat record carried by every item

mod aggregator;

pub use aggregator::StatAccumulator;

use crate::types::StatKind;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// Numeric stats granted by an item, an enchantment or a set bonus tier
///
/// Percentage fields (`crit_rate`, `dodge_rate`, `life_steal`,
/// `cooldown_reduction`) are expressed in points, so 12.5 means 12.5%.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquipmentStats {
    // === Resources ===
    pub hp: f64,
    pub mp: f64,

    // === Combat ===
    pub attack: f64,
    pub defense: f64,
    pub speed: f64,
    pub crit_rate: f64,
    pub dodge_rate: f64,

    // === Attributes ===
    pub strength: f64,
    pub intelligence: f64,
    pub dexterity: f64,
    pub vitality: f64,
    pub luck: f64,

    // === Advanced ===
    pub magic_resist: f64,
    pub armor_pen: f64,
    pub magic_pen: f64,
    pub life_steal: f64,
    pub cooldown_reduction: f64,
}

impl EquipmentStats {
    /// Create a zeroed record
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, kind: StatKind, value: f64) -> Self {
        self.set(kind, value);
        self
    }

    /// Read a single stat
    pub fn get(&self, kind: StatKind) -> f64 {
        match kind {
            StatKind::Hp => self.hp,
            StatKind::Mp => self.mp,
            StatKind::Attack => self.attack,
            StatKind::Defense => self.defense,
            StatKind::Speed => self.speed,
            StatKind::CritRate => self.crit_rate,
            StatKind::DodgeRate => self.dodge_rate,
            StatKind::Strength => self.strength,
            StatKind::Intelligence => self.intelligence,
            StatKind::Dexterity => self.dexterity,
            StatKind::Vitality => self.vitality,
            StatKind::Luck => self.luck,
            StatKind::MagicResist => self.magic_resist,
            StatKind::ArmorPen => self.armor_pen,
            StatKind::MagicPen => self.magic_pen,
            StatKind::LifeSteal => self.life_steal,
            StatKind::CooldownReduction => self.cooldown_reduction,
        }
    }

    /// Mutable access to a single stat
    pub fn get_mut(&mut self, kind: StatKind) -> &mut f64 {
        match kind {
            StatKind::Hp => &mut self.hp,
            StatKind::Mp => &mut self.mp,
            StatKind::Attack => &mut self.attack,
            StatKind::Defense => &mut self.defense,
            StatKind::Speed => &mut self.speed,
            StatKind::CritRate => &mut self.crit_rate,
            StatKind::DodgeRate => &mut self.dodge_rate,
            StatKind::Strength => &mut self.strength,
            StatKind::Intelligence => &mut self.intelligence,
            StatKind::Dexterity => &mut self.dexterity,
            StatKind::Vitality => &mut self.vitality,
            StatKind::Luck => &mut self.luck,
            StatKind::MagicResist => &mut self.magic_resist,
            StatKind::ArmorPen => &mut self.armor_pen,
            StatKind::MagicPen => &mut self.magic_pen,
            StatKind::LifeSteal => &mut self.life_steal,
            StatKind::CooldownReduction => &mut self.cooldown_reduction,
        }
    }

    /// Overwrite a single stat
    pub fn set(&mut self, kind: StatKind, value: f64) {
        *self.get_mut(kind) = value;
    }

    /// Add to a single stat
    pub fn add_stat(&mut self, kind: StatKind, value: f64) {
        *self.get_mut(kind) += value;
    }

    /// Multiply a single stat by `factor`
    pub fn scale(&mut self, kind: StatKind, factor: f64) {
        *self.get_mut(kind) *= factor;
    }

    /// Iterate over every (stat, value) pair in record order
    pub fn iter(&self) -> impl Iterator<Item = (StatKind, f64)> + '_ {
        StatKind::all().iter().map(move |kind| (*kind, self.get(*kind)))
    }

    /// Iterate over stats with a non-zero value
    pub fn non_zero(&self) -> impl Iterator<Item = (StatKind, f64)> + '_ {
        self.iter().filter(|(_, v)| *v != 0.0)
    }

    /// Whether every stat is zero
    pub fn is_zero(&self) -> bool {
        self.non_zero().next().is_none()
    }

    /// Clamp percentages into [0, 100] and everything else to >= 0
    pub fn validate(&mut self) {
        for kind in StatKind::all() {
            let value = self.get_mut(*kind);
            *value = if kind.is_percentage() {
                value.clamp(0.0, 100.0)
            } else {
                value.max(0.0)
            };
        }
    }

    /// Copy with [`validate`](Self::validate) applied
    pub fn validated(mut self) -> Self {
        self.validate();
        self
    }
}

impl AddAssign<&EquipmentStats> for EquipmentStats {
    fn add_assign(&mut self, rhs: &EquipmentStats) {
        for (kind, value) in rhs.iter() {
            self.add_stat(kind, value);
        }
    }
}

impl AddAssign for EquipmentStats {
    fn add_assign(&mut self, rhs: EquipmentStats) {
        *self += &rhs;
    }
}

impl Add for EquipmentStats {
    type Output = EquipmentStats;

    fn add(mut self, rhs: EquipmentStats) -> EquipmentStats {
        self += &rhs;
        self
    }
}

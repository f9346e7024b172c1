//! Equipment set bonuses
//!
//! Pieces sharing a set name unlock tiered bonuses when equipped together.
//! Every satisfied tier applies; tiers never replace one another.

use crate::definition::SetBonusTier;
use crate::item::ItemInstance;
use stat_core::EquipmentStats;
use std::collections::HashMap;

/// A set with at least one satisfied tier in a loadout
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveSet {
    pub name: String,
    /// Equipped pieces claiming this set
    pub pieces: u32,
    /// Satisfied tiers, in authoring order
    pub tiers: Vec<SetBonusTier>,
    /// Sum of the satisfied tiers' bonuses
    pub bonus: EquipmentStats,
}

/// Sum the bonuses of every tier satisfied by `pieces`
fn sum_tiers(tiers: &[SetBonusTier], pieces: u32) -> EquipmentStats {
    tiers
        .iter()
        .filter(|tier| tier.required_pieces <= pieces)
        .fold(EquipmentStats::new(), |acc, tier| acc + tier.bonus_stats)
        .validated()
}

/// Count equipped pieces per set name
fn count_pieces<'a>(equipped: &[&'a ItemInstance]) -> HashMap<&'a str, u32> {
    let mut counts = HashMap::new();
    for &item in equipped {
        if let Some(set) = item.set_name() {
            *counts.entry(set).or_insert(0) += 1;
        }
    }
    counts
}

impl ItemInstance {
    /// Bonus this item's set grants for the given loadout
    ///
    /// `equipped` should include this item itself if it is worn. Items
    /// without a set yield a zero record.
    pub fn set_bonus(&self, equipped: &[&ItemInstance]) -> EquipmentStats {
        let Some(set) = self.set_name() else {
            return EquipmentStats::new();
        };
        let pieces = equipped
            .iter()
            .filter(|item| item.set_name() == Some(set))
            .count() as u32;
        sum_tiers(&self.set_bonuses, pieces)
    }
}

/// Every set with a satisfied tier, sorted by name
///
/// Each set is evaluated once using the tiers of its first equipped piece.
pub fn active_sets(equipped: &[&ItemInstance]) -> Vec<ActiveSet> {
    let counts = count_pieces(equipped);
    let mut active = Vec::new();

    for (set, pieces) in counts {
        let Some(first) = equipped.iter().find(|item| item.set_name() == Some(set)) else {
            continue;
        };
        let tiers: Vec<SetBonusTier> = first
            .set_bonuses()
            .iter()
            .filter(|tier| tier.required_pieces <= pieces)
            .cloned()
            .collect();
        if tiers.is_empty() {
            continue;
        }
        active.push(ActiveSet {
            name: set.to_string(),
            pieces,
            bonus: sum_tiers(&tiers, pieces),
            tiers,
        });
    }

    active.sort_by(|a, b| a.name.cmp(&b.name));
    active
}

/// Total set bonus of a loadout, counting each set once
pub fn aggregate_set_bonuses(equipped: &[&ItemInstance]) -> EquipmentStats {
    active_sets(equipped)
        .iter()
        .fold(EquipmentStats::new(), |acc, set| acc + set.bonus)
        .validated()
}

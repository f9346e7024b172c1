//! StatAccumulator - Collects stat contributions before producing a final record

use super::EquipmentStats;
use crate::types::StatKind;
use std::collections::HashMap;

/// Accumulates stat contributions from various sources
///
/// Sources are either whole [`EquipmentStats`] records (base stats, set bonus
/// tiers) or free-form `name -> value` bonus maps (enchantments). Names that do
/// not resolve to a [`StatKind`] are kept aside in `unknown` instead of being
/// silently lost, so callers can report them.
#[derive(Debug, Clone, Default)]
pub struct StatAccumulator {
    total: EquipmentStats,
    unknown: HashMap<String, f64>,
}

impl StatAccumulator {
    /// Create a new empty accumulator
    pub fn new() -> Self {
        StatAccumulator::default()
    }

    /// Add a whole stat record
    pub fn add_stats(&mut self, stats: &EquipmentStats) {
        self.total += stats;
    }

    /// Add a single typed stat
    pub fn add(&mut self, kind: StatKind, value: f64) {
        self.total.add_stat(kind, value);
    }

    /// Add a named stat; returns false if the name is not a known stat
    pub fn add_named(&mut self, name: &str, value: f64) -> bool {
        match name.parse::<StatKind>() {
            Ok(kind) => {
                self.add(kind, value);
                true
            }
            Err(e) => {
                log::debug!("{}, ignoring bonus of {}", e, value);
                *self.unknown.entry(name.to_string()).or_insert(0.0) += value;
                false
            }
        }
    }

    /// Add every entry of a `name -> value` bonus map
    pub fn add_bonus_map(&mut self, bonuses: &HashMap<String, f64>) {
        for (name, value) in bonuses {
            self.add_named(name, *value);
        }
    }

    /// Bonuses whose names did not resolve to a stat
    pub fn unknown(&self) -> &HashMap<String, f64> {
        &self.unknown
    }

    /// Current total without consuming the accumulator
    pub fn total(&self) -> &EquipmentStats {
        &self.total
    }

    /// Consume the accumulator and return the summed record
    pub fn finish(self) -> EquipmentStats {
        self.total
    }
}

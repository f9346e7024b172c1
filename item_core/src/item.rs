use crate::definition::{ItemDefinition, SetBonusTier};
use crate::enchantment::{Enchantment, MAX_ENCHANTMENTS};
use crate::set_registry::{self, InstanceKey};
use crate::types::{ItemId, ItemType, Rarity, RarityColor};
use crate::EnchantError;
use stat_core::{EquipmentStats, StatAccumulator};
use std::fmt;

/// Current and maximum durability of an item instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Durability {
    pub(crate) current: f64,
    pub(crate) max: f64,
    pub(crate) can_be_broken: bool,
}

impl Durability {
    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn can_be_broken(&self) -> bool {
        self.can_be_broken
    }

    /// Remaining durability as a fraction of the maximum (1.0 when max is 0)
    pub fn fraction(&self) -> f64 {
        if self.max <= 0.0 {
            return 1.0;
        }
        self.current / self.max
    }
}

/// A live item with its own mutable runtime state
///
/// Instances are stamped from an [`ItemDefinition`] and own everything they
/// carry: cloning deep-copies stats, durability, enhancement and
/// enchantments. Each instance has a process-unique [`InstanceKey`], and while
/// it has a set name it is indexed under that name in the global
/// [set registry](crate::set_registry). The index is updated on construction,
/// clone, [`set_set_name`](Self::set_set_name) and drop.
#[derive(Debug)]
pub struct ItemInstance {
    pub(crate) key: InstanceKey,

    // === Definition fields ===
    pub(crate) id: ItemId,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) icon: String,
    pub(crate) item_type: ItemType,
    pub(crate) rarity: Rarity,
    pub(crate) price: f64,
    pub(crate) level: u32,
    pub(crate) tag: String,
    pub(crate) max_stack_size: u32,

    // === Runtime state ===
    pub(crate) stats: EquipmentStats,
    pub(crate) durability: Durability,
    pub(crate) broken: bool,
    pub(crate) enhance_level: u32,
    pub(crate) enhance_success_rate: f64,
    pub(crate) enhance_break_rate: f64,
    pub(crate) enchantments: Vec<Enchantment>,

    // === Sets ===
    pub(crate) set_name: Option<String>,
    pub(crate) set_bonuses: Vec<SetBonusTier>,
}

impl ItemInstance {
    /// Stamp a fresh instance from a definition
    ///
    /// The instance starts at full durability, enhancement level 0 and with no
    /// enchantments.
    pub fn new(def: &ItemDefinition) -> Self {
        let max_durability = def.durability.max.max(0.0);
        let item = ItemInstance {
            key: InstanceKey::next(),
            id: def.id,
            name: def.name.clone(),
            description: def.description.clone(),
            icon: def.icon.clone(),
            item_type: def.item_type,
            rarity: def.rarity,
            price: def.price,
            level: def.level,
            tag: def.tag.clone(),
            max_stack_size: def.max_stack_size.max(1),
            stats: def.stats.validated(),
            durability: Durability {
                current: max_durability,
                max: max_durability,
                can_be_broken: def.durability.can_be_broken,
            },
            broken: false,
            enhance_level: 0,
            enhance_success_rate: def.enhance_success_rate.clamp(0.0, 100.0),
            enhance_break_rate: def.enhance_break_rate.clamp(0.0, 100.0),
            enchantments: Vec::new(),
            set_name: def.set_name().map(str::to_string),
            set_bonuses: def.set_bonuses.clone(),
        };
        item.register();
        item
    }

    fn register(&self) {
        if let Some(set) = &self.set_name {
            set_registry::register(set, self.key);
        }
    }

    /// Process-unique key of this instance
    pub fn key(&self) -> InstanceKey {
        self.key
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn item_type(&self) -> ItemType {
        self.item_type
    }

    pub fn rarity(&self) -> Rarity {
        self.rarity
    }

    /// Display color derived from rarity
    pub fn rarity_color(&self) -> RarityColor {
        self.rarity.color()
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn max_stack_size(&self) -> u32 {
        self.max_stack_size
    }

    /// Whether two instances stack together
    pub fn is_same_kind(&self, other: &ItemInstance) -> bool {
        self.id == other.id
    }

    pub fn stats(&self) -> &EquipmentStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut EquipmentStats {
        &mut self.stats
    }

    pub fn durability(&self) -> &Durability {
        &self.durability
    }

    /// Whether the break transition has fired and not been repaired
    pub fn is_broken(&self) -> bool {
        self.broken
    }

    // ------------------------------------------------------------------
    // Durability
    // ------------------------------------------------------------------

    /// Add `delta` to current durability, clamped to [0, max]
    ///
    /// Reaching 0 on a breakable item fires the break transition. Returns
    /// true if this call broke the item.
    pub fn update_durability(&mut self, delta: f64) -> bool {
        self.durability.current =
            (self.durability.current + delta).clamp(0.0, self.durability.max);
        if self.durability.current <= 0.0 && self.durability.can_be_broken {
            return self.break_item();
        }
        false
    }

    /// Restore durability up to the maximum; never breaks the item
    ///
    /// A broken item with durability left after the repair is whole again.
    pub fn repair_item(&mut self, amount: f64) {
        self.durability.current =
            (self.durability.current + amount).clamp(0.0, self.durability.max);
        if self.broken && self.durability.current > 0.0 {
            log::info!("Item {} repaired", self.name);
            self.broken = false;
        }
    }

    /// Mark the item broken; returns false if it already was
    pub(crate) fn break_item(&mut self) -> bool {
        if self.broken {
            return false;
        }
        self.broken = true;
        log::warn!("Item {} ({}) has broken", self.name, self.id);
        true
    }

    // ------------------------------------------------------------------
    // Enchantments
    // ------------------------------------------------------------------

    pub fn enchantments(&self) -> &[Enchantment] {
        &self.enchantments
    }

    /// Find an enchantment by name
    pub fn enchantment(&self, name: &str) -> Option<&Enchantment> {
        self.enchantments.iter().find(|e| e.name == name)
    }

    /// Apply an enchantment
    ///
    /// An enchantment with the same name gains one level instead of being
    /// added twice. A new name needs a free enchantment slot. Nothing changes
    /// when an error is returned.
    pub fn add_enchantment(&mut self, enchantment: Enchantment) -> Result<(), EnchantError> {
        if let Some(existing) = self
            .enchantments
            .iter_mut()
            .find(|e| e.name == enchantment.name)
        {
            if !existing.can_level_up() {
                return Err(EnchantError::MaxLevel {
                    name: existing.name.clone(),
                    max_level: existing.max_level,
                });
            }
            existing.level += 1;
            log::debug!(
                "Enchantment {} on {} upgraded to level {}",
                existing.name,
                self.name,
                existing.level
            );
            return Ok(());
        }

        if self.enchantments.len() >= MAX_ENCHANTMENTS {
            return Err(EnchantError::SlotsFull {
                max: MAX_ENCHANTMENTS,
            });
        }
        if !enchantment.is_valid() {
            return Err(EnchantError::InvalidLevel {
                name: enchantment.name,
                level: enchantment.level,
                max_level: enchantment.max_level,
            });
        }

        self.enchantments.push(enchantment);
        Ok(())
    }

    /// Remove an enchantment by name
    pub fn remove_enchantment(&mut self, name: &str) -> Option<Enchantment> {
        let index = self.enchantments.iter().position(|e| e.name == name)?;
        Some(self.enchantments.remove(index))
    }

    /// Sum of every enchantment's bonus map; unknown stat names are ignored
    pub fn enchantment_bonus(&self) -> EquipmentStats {
        let mut acc = StatAccumulator::new();
        for enchantment in &self.enchantments {
            acc.add_bonus_map(&enchantment.bonus_stats);
        }
        acc.finish()
    }

    /// Current stats plus enchantment bonuses, clamped to each stat's range
    pub fn total_stats(&self) -> EquipmentStats {
        (self.stats + self.enchantment_bonus()).validated()
    }

    // ------------------------------------------------------------------
    // Sets
    // ------------------------------------------------------------------

    /// Set name, if this item belongs to an equipment set
    pub fn set_name(&self) -> Option<&str> {
        self.set_name.as_deref()
    }

    pub fn set_bonuses(&self) -> &[SetBonusTier] {
        &self.set_bonuses
    }

    /// Move this instance to another set (or out of any set)
    ///
    /// The registry is updated in the same call; an empty name means no set.
    pub fn set_set_name(&mut self, set_name: Option<String>) {
        let set_name = set_name.filter(|s| !s.is_empty());
        if self.set_name == set_name {
            return;
        }
        if let Some(old) = self.set_name.take() {
            set_registry::unregister(&old, self.key);
        }
        self.set_name = set_name;
        self.register();
    }

    /// Append a set bonus tier
    pub fn add_set_bonus(
        &mut self,
        required_pieces: u32,
        bonus_stats: EquipmentStats,
        description: impl Into<String>,
    ) {
        self.set_bonuses
            .push(SetBonusTier::new(required_pieces, bonus_stats, description));
    }
}

impl From<&ItemDefinition> for ItemInstance {
    fn from(def: &ItemDefinition) -> Self {
        ItemInstance::new(def)
    }
}

impl Clone for ItemInstance {
    /// Deep copy under a new key, registered exactly as a fresh instance with
    /// the same set name would be
    fn clone(&self) -> Self {
        let clone = ItemInstance {
            key: InstanceKey::next(),
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            icon: self.icon.clone(),
            item_type: self.item_type,
            rarity: self.rarity,
            price: self.price,
            level: self.level,
            tag: self.tag.clone(),
            max_stack_size: self.max_stack_size,
            stats: self.stats,
            durability: self.durability,
            broken: self.broken,
            enhance_level: self.enhance_level,
            enhance_success_rate: self.enhance_success_rate,
            enhance_break_rate: self.enhance_break_rate,
            enchantments: self.enchantments.clone(),
            set_name: self.set_name.clone(),
            set_bonuses: self.set_bonuses.clone(),
        };
        clone.register();
        clone
    }
}

impl Drop for ItemInstance {
    fn drop(&mut self) {
        if let Some(set) = &self.set_name {
            set_registry::unregister(set, self.key);
        }
    }
}

impl fmt::Display for ItemInstance {
    /// Detailed description as shown in an item tooltip
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.description)?;

        // Combat stats for equipment
        if self.item_type.is_equipment() {
            writeln!(f)?;
            writeln!(f, "Required level: {}", self.level)?;
            for (kind, value) in self.stats.non_zero() {
                if kind.is_percentage() {
                    writeln!(f, "{}: +{}%", kind, value)?;
                } else {
                    writeln!(f, "{}: +{}", kind, value)?;
                }
            }
        }

        if self.enhance_level > 0 {
            writeln!(f)?;
            writeln!(f, "Enhancement: +{}", self.enhance_level)?;
        }

        if self.durability.max > 0.0 {
            writeln!(f)?;
            writeln!(
                f,
                "Durability: {}/{}",
                self.durability.current, self.durability.max
            )?;
        }
        if self.broken {
            writeln!(f, "Broken")?;
        }

        if !self.enchantments.is_empty() {
            writeln!(f)?;
            writeln!(f, "Enchantments:")?;
            for enchantment in &self.enchantments {
                writeln!(f, "{}", enchantment)?;
                writeln!(f, "  {}", enchantment.description)?;
            }
        }

        if let Some(ref set) = self.set_name {
            writeln!(f)?;
            writeln!(f, "Set: {}", set)?;
            for tier in &self.set_bonuses {
                writeln!(f, "{}-piece bonus:", tier.required_pieces)?;
                writeln!(f, "  {}", tier.description)?;
            }
        }

        writeln!(f)?;
        write!(f, "Price: {} gold", self.price)?;
        if !self.tag.is_empty() {
            write!(f, "\nTag: {}", self.tag)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stat_core::StatKind;

    fn sword_def() -> ItemDefinition {
        ItemDefinition::new(10, "Iron Sword")
            .with_icon("icons/iron_sword.png")
            .with_type(ItemType::Weapon)
            .with_rarity(Rarity::Rare)
            .with_price(120.0)
            .with_stats(
                EquipmentStats::new()
                    .with(StatKind::Attack, 10.0)
                    .with(StatKind::CritRate, 5.0),
            )
    }

    #[test]
    fn test_new_instance_state() {
        let item = ItemInstance::new(&sword_def());
        assert_eq!(item.id(), 10);
        assert_eq!(item.name(), "Iron Sword");
        assert_eq!(item.enhance_level(), 0);
        assert!(item.enchantments().is_empty());
        assert!((item.durability().current() - 100.0).abs() < f64::EPSILON);
        assert!(!item.is_broken());
        assert_eq!(item.rarity_color(), RarityColor::Blue);
    }

    #[test]
    fn test_update_durability_clamps() {
        let mut item = ItemInstance::new(&sword_def());
        assert!(!item.update_durability(-30.0));
        assert!((item.durability().current() - 70.0).abs() < f64::EPSILON);

        assert!(!item.update_durability(500.0));
        assert!((item.durability().current() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_durability_zero_breaks() {
        let mut item = ItemInstance::new(&sword_def());
        assert!(item.update_durability(-250.0));
        assert_eq!(item.durability().current(), 0.0);
        assert!(item.is_broken());

        // Already broken: no second transition
        assert!(!item.update_durability(-1.0));
    }

    #[test]
    fn test_unbreakable_item_never_breaks() {
        let def = sword_def().with_durability(50.0, false);
        let mut item = ItemInstance::new(&def);
        assert!(!item.update_durability(-50.0));
        assert_eq!(item.durability().current(), 0.0);
        assert!(!item.is_broken());
    }

    #[test]
    fn test_repair() {
        let mut item = ItemInstance::new(&sword_def());
        item.update_durability(-100.0);
        assert!(item.is_broken());

        item.repair_item(40.0);
        assert!((item.durability().current() - 40.0).abs() < f64::EPSILON);
        assert!(!item.is_broken());

        item.repair_item(1000.0);
        assert!((item.durability().current() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_enchantment_append_and_upgrade() {
        let mut item = ItemInstance::new(&sword_def());
        let fire = Enchantment::new("Fire", "Burns").with_bonus("attack", 3.0);

        assert!(item.add_enchantment(fire.clone()).is_ok());
        assert!(item.add_enchantment(fire).is_ok());

        assert_eq!(item.enchantments().len(), 1);
        assert_eq!(item.enchantment("Fire").map(|e| e.level), Some(2));
    }

    #[test]
    fn test_enchantment_max_level() {
        let mut item = ItemInstance::new(&sword_def());
        let frost = Enchantment::new("Frost", "Chills").with_max_level(2);
        item.add_enchantment(frost.clone()).unwrap();
        item.add_enchantment(frost.clone()).unwrap();

        let err = item.add_enchantment(frost).unwrap_err();
        assert!(matches!(err, EnchantError::MaxLevel { max_level: 2, .. }));
        assert_eq!(item.enchantment("Frost").map(|e| e.level), Some(2));
    }

    #[test]
    fn test_enchantment_slots_full() {
        let mut item = ItemInstance::new(&sword_def());
        for name in ["A", "B", "C"] {
            item.add_enchantment(Enchantment::new(name, "")).unwrap();
        }

        let err = item.add_enchantment(Enchantment::new("D", "")).unwrap_err();
        assert!(matches!(err, EnchantError::SlotsFull { max: 3 }));
        assert_eq!(item.enchantments().len(), 3);

        // Upgrading an existing one still works with all slots used
        assert!(item.add_enchantment(Enchantment::new("B", "")).is_ok());
        assert_eq!(item.enchantment("B").map(|e| e.level), Some(2));
    }

    #[test]
    fn test_enchantment_invalid_level_rejected() {
        let mut item = ItemInstance::new(&sword_def());
        let bad = Enchantment::new("Void", "").with_max_level(2).with_level(3);
        assert!(matches!(
            item.add_enchantment(bad),
            Err(EnchantError::InvalidLevel { level: 3, .. })
        ));
        assert!(item.enchantments().is_empty());
    }

    #[test]
    fn test_total_stats_include_enchantments() {
        let mut item = ItemInstance::new(&sword_def());
        item.add_enchantment(
            Enchantment::new("Sharpness", "")
                .with_bonus("attack", 4.0)
                .with_bonus("not_a_stat", 99.0),
        )
        .unwrap();

        let total = item.total_stats();
        assert!((total.attack - 14.0).abs() < f64::EPSILON);
        assert!((total.crit_rate - 5.0).abs() < f64::EPSILON);
        // Base record untouched
        assert!((item.stats().attack - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_clone_is_deep() {
        let mut source_item = ItemInstance::new(&sword_def());
        source_item
            .add_enchantment(Enchantment::new("Fire", "").with_bonus("attack", 1.0))
            .unwrap();
        source_item.update_durability(-20.0);

        let copy = source_item.clone();
        assert_ne!(copy.key(), source_item.key());
        assert!(copy.is_same_kind(&source_item));

        source_item.stats_mut().attack = 999.0;
        source_item.enchantments[0]
            .bonus_stats
            .insert("attack".to_string(), 50.0);
        source_item.update_durability(-10.0);

        assert!((copy.stats().attack - 10.0).abs() < f64::EPSILON);
        assert_eq!(copy.enchantments()[0].bonus_stats["attack"], 1.0);
        assert!((copy.durability().current() - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_construct_registers_set() {
        let def = sword_def().with_set("item_test_construct_set");
        let item = ItemInstance::new(&def);
        assert!(set_registry::contains("item_test_construct_set", item.key()));
        assert_eq!(set_registry::member_count("item_test_construct_set"), 1);
    }

    #[test]
    fn test_clone_registers_under_same_set() {
        let def = sword_def().with_set("item_test_clone_set");
        let source_item = ItemInstance::new(&def);
        let copy = source_item.clone();

        assert_eq!(copy.set_name(), Some("item_test_clone_set"));
        assert!(set_registry::contains("item_test_clone_set", copy.key()));
        assert!(set_registry::contains("item_test_clone_set", source_item.key()));
        assert_eq!(set_registry::member_count("item_test_clone_set"), 2);
    }

    #[test]
    fn test_drop_unregisters() {
        let def = sword_def().with_set("item_test_drop_set");
        let item = ItemInstance::new(&def);
        let key = item.key();
        assert!(set_registry::contains("item_test_drop_set", key));

        drop(item);
        assert!(!set_registry::contains("item_test_drop_set", key));
        assert_eq!(set_registry::member_count("item_test_drop_set"), 0);
    }

    #[test]
    fn test_rename_set_moves_membership() {
        let def = sword_def().with_set("item_test_rename_old");
        let mut item = ItemInstance::new(&def);

        item.set_set_name(Some("item_test_rename_new".to_string()));
        assert!(!set_registry::contains("item_test_rename_old", item.key()));
        assert!(set_registry::contains("item_test_rename_new", item.key()));

        item.set_set_name(Some(String::new()));
        assert_eq!(item.set_name(), None);
        assert!(!set_registry::contains("item_test_rename_new", item.key()));
    }

    #[test]
    fn test_no_set_never_registers() {
        let set = "item_test_unset_clone";
        let member = ItemInstance::new(&sword_def().with_set(set));
        assert_eq!(set_registry::member_count(set), 1);

        let mut item = ItemInstance::new(&sword_def());
        assert_eq!(item.set_name(), None);
        let copy = item.clone();
        assert_eq!(copy.set_name(), None);
        assert_eq!(set_registry::member_count(set), 1);

        item.set_set_name(Some(set.to_string()));
        assert_eq!(set_registry::member_count(set), 2);
        assert!(!set_registry::contains(set, copy.key()));
        drop(member);
    }

    #[test]
    fn test_authored_stats_clamped() {
        let def = sword_def().with_stats(
            EquipmentStats::new()
                .with(StatKind::CritRate, 150.0)
                .with(StatKind::Defense, -4.0),
        );
        let item = ItemInstance::new(&def);
        assert!((item.stats().crit_rate - 100.0).abs() < f64::EPSILON);
        assert!(item.stats().defense.abs() < f64::EPSILON);
        assert!((item.total_stats().crit_rate - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_total_stats_clamps_enchantments() {
        let mut item = ItemInstance::new(&sword_def());
        item.add_enchantment(
            Enchantment::new("Keen", "")
                .with_bonus("crit_rate", 200.0)
                .with_bonus("attack", -30.0),
        )
        .unwrap();

        let total = item.total_stats();
        assert!((total.crit_rate - 100.0).abs() < f64::EPSILON);
        assert!(total.attack.abs() < f64::EPSILON);
        assert!((item.stats().crit_rate - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_display_description() {
        let mut item = ItemInstance::new(&sword_def().with_tag("starter"));
        item.add_enchantment(Enchantment::new("Fire", "Burns foes"))
            .unwrap();
        let text = item.to_string();

        assert!(text.contains("Required level: 1"));
        assert!(text.contains("Attack: +10"));
        assert!(text.contains("Crit Rate: +5%"));
        assert!(text.contains("Durability: 100/100"));
        assert!(text.contains("Fire Lv.1"));
        assert!(text.contains("Price: 120 gold"));
        assert!(text.contains("Tag: starter"));
        assert!(!text.contains("Enhancement"));
    }
}

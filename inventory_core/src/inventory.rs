use crate::config::InventoryConfig;
use crate::events::{InventoryEvent, Listeners, SubscriberId};
use crate::persistence::{InventoryData, SaveStore, DEFAULT_SAVE_KEY, EMPTY_SLOT_ID};
use crate::slot::Slot;
use crate::{InventoryError, PersistError, SlotError};
use item_core::{ItemCatalog, ItemId, ItemInstance, ItemType, Rarity, UseHandler, UseOutcome};

/// Fixed-size ordered collection of slots
///
/// Every item placed into the inventory is a private clone of the caller's
/// instance. Mutating calls notify subscribers synchronously once the slots
/// have settled (see [`crate::events`]).
#[derive(Debug)]
pub struct Inventory {
    slots: Vec<Slot>,
    listeners: Listeners,
    save_key: String,
}

impl Inventory {
    /// Create an inventory with `capacity` empty slots
    pub fn new(capacity: usize) -> Self {
        Inventory {
            slots: (0..capacity).map(|_| Slot::new()).collect(),
            listeners: Listeners::new(),
            save_key: DEFAULT_SAVE_KEY.to_string(),
        }
    }

    /// Create an inventory sized and keyed by `config`
    pub fn from_config(config: &InventoryConfig) -> Self {
        Inventory {
            save_key: config.save_key.clone(),
            ..Self::new(config.capacity)
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn used_slots(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_empty()).count()
    }

    pub fn free_slots(&self) -> usize {
        self.capacity() - self.used_slots()
    }

    pub fn is_full(&self) -> bool {
        self.used_slots() >= self.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.used_slots() == 0
    }

    /// Key used by [`save_default`](Self::save_default) and
    /// [`load_default`](Self::load_default)
    pub fn save_key(&self) -> &str {
        &self.save_key
    }

    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    /// Direct slot access; changes made here do not notify subscribers
    pub fn slot_mut(&mut self, index: usize) -> Option<&mut Slot> {
        self.slots.get_mut(index)
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Non-empty slots with their indices
    pub fn items(&self) -> impl Iterator<Item = (usize, &Slot)> {
        self.slots.iter().enumerate().filter(|(_, s)| !s.is_empty())
    }

    /// First slot holding the given identity
    pub fn find_item(&self, id: ItemId) -> Option<usize> {
        self.slots.iter().position(|s| s.holds(id))
    }

    /// Total units of an identity across all slots
    pub fn count_item(&self, id: ItemId) -> u32 {
        self.slots
            .iter()
            .filter(|s| s.holds(id))
            .map(|s| s.amount())
            .sum()
    }

    /// Non-empty slots whose item has the given type, in slot order
    pub fn items_by_type(&self, item_type: ItemType) -> Vec<(usize, &Slot)> {
        self.items()
            .filter(|(_, s)| s.item().is_some_and(|i| i.item_type() == item_type))
            .collect()
    }

    /// Non-empty slots whose item has the given rarity, in slot order
    pub fn items_by_rarity(&self, rarity: Rarity) -> Vec<(usize, &Slot)> {
        self.items()
            .filter(|(_, s)| s.item().is_some_and(|i| i.rarity() == rarity))
            .collect()
    }

    /// Advisory capacity estimate for `amount` units of `item`
    ///
    /// Counts headroom on matching stacks and whole empty slots. This is not
    /// a reservation: [`add_item`](Self::add_item) places a call's units in a
    /// single slot and can still fail when this returns true.
    pub fn has_space(&self, item: &ItemInstance, amount: u32) -> bool {
        if amount == 0 {
            return false;
        }
        let stack = i64::from(item.max_stack_size());
        let mut remaining = i64::from(amount);

        for slot in self.slots.iter().filter(|s| s.holds(item.id())) {
            remaining -= stack - i64::from(slot.amount());
        }
        if remaining > 0 {
            let empty = self.slots.iter().filter(|s| s.is_empty()).count() as i64;
            remaining -= empty * stack;
        }
        remaining <= 0
    }

    // ------------------------------------------------------------------
    // Adding and removing
    // ------------------------------------------------------------------

    /// Add `amount` units of `item` to a single slot
    ///
    /// Tops up the first matching stack that can take the whole amount,
    /// otherwise stores a clone in the first free unlocked slot. The amount is
    /// never spread over several slots. Returns the slot used.
    pub fn add_item(&mut self, item: &ItemInstance, amount: u32) -> Result<usize, InventoryError> {
        if amount == 0 {
            return Err(InventoryError::InvalidAmount);
        }

        let stack = self
            .slots
            .iter()
            .position(|s| s.holds(item.id()) && s.can_add_item(item, amount));
        if let Some(index) = stack {
            self.slots[index].grow(amount);
            log::debug!("Stacked {} x {} into slot {}", amount, item.name(), index);
            self.listeners.emit(InventoryEvent::ItemAdded { slot: index });
            return Ok(index);
        }

        if amount <= item.max_stack_size() {
            let empty = self
                .slots
                .iter()
                .position(|s| s.is_empty() && !s.is_locked());
            if let Some(index) = empty {
                self.slots[index].put(item.clone(), amount);
                log::debug!("Placed {} x {} in slot {}", amount, item.name(), index);
                self.listeners.emit(InventoryEvent::ItemAdded { slot: index });
                return Ok(index);
            }
        }

        Err(InventoryError::NoSpace {
            id: item.id(),
            amount,
        })
    }

    /// Remove `amount` units from one slot
    pub fn remove_item(&mut self, index: usize, amount: u32) -> Result<(), InventoryError> {
        self.check_index(index)?;
        if amount == 0 {
            return Err(InventoryError::InvalidAmount);
        }
        let slot = &mut self.slots[index];
        if slot.is_empty() {
            return Err(InventoryError::EmptySlot(index));
        }
        if slot.amount() < amount {
            return Err(InventoryError::InsufficientAmount {
                slot: index,
                requested: amount,
                available: slot.amount(),
            });
        }

        slot.take(amount);
        self.listeners.emit(InventoryEvent::ItemRemoved { slot: index });
        Ok(())
    }

    /// Remove `amount` units of an identity, draining slots in order
    ///
    /// If fewer units are held, everything available is removed and
    /// [`InventoryError::Insufficient`] reports how much was taken. That is
    /// the one error returned after the inventory has changed. A request for
    /// zero units succeeds without touching any slot.
    pub fn remove_item_by_id(&mut self, id: ItemId, amount: u32) -> Result<(), InventoryError> {
        let mut remaining = amount;
        for index in 0..self.slots.len() {
            if remaining == 0 {
                break;
            }
            if !self.slots[index].holds(id) {
                continue;
            }
            remaining -= self.slots[index].take(remaining);
            self.listeners.emit(InventoryEvent::ItemRemoved { slot: index });
        }

        if remaining > 0 {
            return Err(InventoryError::Insufficient {
                id,
                requested: amount,
                removed: amount - remaining,
            });
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Moving between slots
    // ------------------------------------------------------------------

    /// Move units from one slot to another with stacking rules
    ///
    /// `None` moves the whole stack. Returns the number of units moved.
    pub fn transfer(&mut self, from: usize, to: usize, amount: Option<u32>) -> Result<u32, InventoryError> {
        self.check_pair(from, to)?;
        let (source, target) = self.pair_mut(from, to);
        let moved = source
            .transfer_to(target, amount)
            .map_err(|e| InventoryError::Slot { slot: from, source: e })?;

        self.listeners.emit(InventoryEvent::ItemRemoved { slot: from });
        self.listeners.emit(InventoryEvent::ItemAdded { slot: to });
        Ok(moved)
    }

    /// Split `amount` units off a stack into an empty slot
    pub fn split_stack(&mut self, from: usize, amount: u32, to: usize) -> Result<(), InventoryError> {
        self.check_pair(from, to)?;
        let (source, target) = self.pair_mut(from, to);
        if target.is_locked() {
            return Err(InventoryError::Slot {
                slot: to,
                source: SlotError::Locked,
            });
        }
        if !target.is_empty() {
            return Err(InventoryError::Slot {
                slot: to,
                source: SlotError::NoRoom,
            });
        }

        let mut detached = source
            .split(amount)
            .map_err(|e| InventoryError::Slot { slot: from, source: e })?;
        if let Some((item, split)) = detached.take_all() {
            target.put(item, split);
        }

        self.listeners.emit(InventoryEvent::ItemRemoved { slot: from });
        self.listeners.emit(InventoryEvent::ItemAdded { slot: to });
        Ok(())
    }

    /// Exchange the contents of two slots; lock flags stay with the slots
    pub fn swap_slots(&mut self, a: usize, b: usize) -> Result<(), InventoryError> {
        self.check_index(a)?;
        self.check_index(b)?;
        if a == b {
            return Ok(());
        }
        for index in [a, b] {
            if self.slots[index].is_locked() {
                return Err(InventoryError::Slot {
                    slot: index,
                    source: SlotError::Locked,
                });
            }
        }

        let (first, second) = self.pair_mut(a, b);
        if first.is_empty() && second.is_empty() {
            return Ok(());
        }
        first.swap_contents(second);

        for index in [a, b] {
            let event = if self.slots[index].is_empty() {
                InventoryEvent::ItemRemoved { slot: index }
            } else {
                InventoryEvent::ItemAdded { slot: index }
            };
            self.listeners.emit(event);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Using items
    // ------------------------------------------------------------------

    /// Run the use hook on a slot's item
    ///
    /// A [`UseOutcome::Consumed`] result removes one unit. `ItemUsed` is
    /// emitted whenever the handler ran.
    pub fn use_item(
        &mut self,
        index: usize,
        handler: &mut dyn UseHandler,
    ) -> Result<UseOutcome, InventoryError> {
        self.check_index(index)?;
        let slot = &mut self.slots[index];
        let Some(item) = slot.item() else {
            return Err(InventoryError::EmptySlot(index));
        };

        let outcome = handler.on_use(item);
        log::info!("Used {} from slot {} ({:?})", item.name(), index, outcome);
        if outcome == UseOutcome::Consumed {
            slot.take(1);
        }

        self.listeners.emit(InventoryEvent::ItemUsed { slot: index });
        if outcome == UseOutcome::Consumed {
            self.listeners.emit(InventoryEvent::ItemRemoved { slot: index });
        }
        Ok(outcome)
    }

    // ------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------

    /// Register a listener for change notifications
    pub fn subscribe(&mut self, listener: impl FnMut(&InventoryEvent) + 'static) -> SubscriberId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.listeners.unsubscribe(id)
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Per-slot `(identity, amount)` record; empty slots use `-1, 0`
    pub fn export(&self) -> InventoryData {
        let mut data = InventoryData::default();
        for slot in &self.slots {
            match slot.item() {
                Some(item) => {
                    data.item_ids.push(i64::from(item.id()));
                    data.amounts.push(slot.amount());
                }
                None => {
                    data.item_ids.push(EMPTY_SLOT_ID);
                    data.amounts.push(0);
                }
            }
        }
        data
    }

    /// Rebuild the slots from a saved record
    ///
    /// Every slot is overwritten, including locked ones. Identities missing
    /// from `catalog` leave their slot empty. Slots past the end of the record
    /// are cleared and extra entries are ignored.
    pub fn import(&mut self, catalog: &ItemCatalog, data: &InventoryData) -> Result<(), PersistError> {
        data.validate()?;
        if data.len() != self.capacity() {
            log::warn!(
                "Saved inventory has {} slots, inventory has {}",
                data.len(),
                self.capacity()
            );
        }

        let mut entries = data.entries();
        for index in 0..self.slots.len() {
            let restored = match entries.next() {
                Some((Some(id), amount)) if amount > 0 => restore_entry(catalog, index, id, amount),
                _ => None,
            };

            let slot = &mut self.slots[index];
            let had_item = !slot.is_empty();
            slot.take_all();
            if let Some((item, amount)) = restored {
                slot.put(item, amount);
                self.listeners.emit(InventoryEvent::ItemAdded { slot: index });
            } else if had_item {
                self.listeners.emit(InventoryEvent::ItemRemoved { slot: index });
            }
        }
        Ok(())
    }

    /// Serialize to JSON and write it under `key`
    pub fn save(&self, store: &mut dyn SaveStore, key: &str) -> Result<(), PersistError> {
        let json = self.export().to_json()?;
        store.write(key, &json)?;
        log::info!("Saved inventory ({} slots) under '{}'", self.capacity(), key);
        Ok(())
    }

    /// Read the record under `key` and import it
    ///
    /// Returns `Ok(false)` if nothing was saved under `key`.
    pub fn load(
        &mut self,
        catalog: &ItemCatalog,
        store: &dyn SaveStore,
        key: &str,
    ) -> Result<bool, PersistError> {
        let Some(json) = store.read(key)? else {
            return Ok(false);
        };
        let data = InventoryData::from_json(&json)?;
        self.import(catalog, &data)?;
        log::info!("Loaded inventory from '{}'", key);
        Ok(true)
    }

    /// [`save`](Self::save) under the configured key
    pub fn save_default(&self, store: &mut dyn SaveStore) -> Result<(), PersistError> {
        self.save(store, &self.save_key)
    }

    /// [`load`](Self::load) from the configured key
    pub fn load_default(
        &mut self,
        catalog: &ItemCatalog,
        store: &dyn SaveStore,
    ) -> Result<bool, PersistError> {
        let key = self.save_key.clone();
        self.load(catalog, store, &key)
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn check_index(&self, index: usize) -> Result<(), InventoryError> {
        if index >= self.slots.len() {
            return Err(InventoryError::SlotOutOfRange {
                index,
                capacity: self.slots.len(),
            });
        }
        Ok(())
    }

    fn check_pair(&self, a: usize, b: usize) -> Result<(), InventoryError> {
        self.check_index(a)?;
        self.check_index(b)?;
        if a == b {
            return Err(InventoryError::SameSlot(a));
        }
        Ok(())
    }

    /// Two distinct, in-range slots
    fn pair_mut(&mut self, a: usize, b: usize) -> (&mut Slot, &mut Slot) {
        if a < b {
            let (left, right) = self.slots.split_at_mut(b);
            (&mut left[a], &mut right[0])
        } else {
            let (left, right) = self.slots.split_at_mut(a);
            (&mut right[0], &mut left[b])
        }
    }
}

/// Resolve one saved entry against the catalog
fn restore_entry(
    catalog: &ItemCatalog,
    index: usize,
    id: i64,
    amount: u32,
) -> Option<(ItemInstance, u32)> {
    let Some(item) = ItemId::try_from(id).ok().and_then(|id| catalog.instantiate(id)) else {
        log::warn!("Skipping unknown item id {} in slot {}", id, index);
        return None;
    };
    let max = item.max_stack_size();
    if amount > max {
        log::warn!(
            "Clamping {} x {} in slot {} to stack size {}",
            amount,
            item.name(),
            index,
            max
        );
    }
    Some((item, amount.min(max)))
}

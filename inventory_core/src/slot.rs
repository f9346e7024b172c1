use crate::SlotError;
use item_core::ItemInstance;

/// A single storage cell holding at most one stack
///
/// A slot is either empty (`amount == 0`, no item) or holds a privately owned
/// item with `1 <= amount <= item.max_stack_size()`. Locked slots refuse to
/// give or receive items through the stacking primitives.
#[derive(Debug, Clone, Default)]
pub struct Slot {
    item: Option<ItemInstance>,
    amount: u32,
    locked: bool,
    highlighted: bool,
}

impl Slot {
    /// Create an empty, unlocked slot
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot holding `amount` units of `item`
    ///
    /// The amount is clamped to the item's stack limit; 0 yields an empty slot.
    pub fn with_item(item: ItemInstance, amount: u32) -> Self {
        let mut slot = Self::new();
        slot.put(item, amount);
        slot
    }

    pub fn is_empty(&self) -> bool {
        self.item.is_none()
    }

    pub fn item(&self) -> Option<&ItemInstance> {
        self.item.as_ref()
    }

    /// Mutable access to the held item's runtime state
    pub fn item_mut(&mut self) -> Option<&mut ItemInstance> {
        self.item.as_mut()
    }

    pub fn amount(&self) -> u32 {
        self.amount
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    pub fn set_highlighted(&mut self, highlighted: bool) {
        self.highlighted = highlighted;
    }

    /// Units that still fit on the held stack (0 when empty)
    pub fn headroom(&self) -> u32 {
        self.item
            .as_ref()
            .map_or(0, |item| item.max_stack_size().saturating_sub(self.amount))
    }

    /// Whether the held item has the given identity
    pub fn holds(&self, id: item_core::ItemId) -> bool {
        self.item.as_ref().is_some_and(|item| item.id() == id)
    }

    /// Whether `quantity` units of `item` could be stacked here
    pub fn can_add_item(&self, item: &ItemInstance, quantity: u32) -> bool {
        if self.locked {
            return false;
        }
        match &self.item {
            None => true,
            Some(held) => {
                held.id() == item.id()
                    && self.amount.saturating_add(quantity) <= held.max_stack_size()
            }
        }
    }

    /// Empty the slot; does nothing when locked
    ///
    /// Returns the removed stack, if any.
    pub fn clear(&mut self) -> Option<(ItemInstance, u32)> {
        if self.locked {
            return None;
        }
        self.take_all()
    }

    /// Move units into `target`
    ///
    /// `None` moves the whole stack. An empty target receives a clone of the
    /// held item; a target holding the same identity receives as many units
    /// as fit. Returns the number of units moved. Nothing changes on error.
    pub fn transfer_to(&mut self, target: &mut Slot, amount: Option<u32>) -> Result<u32, SlotError> {
        let Some(item) = &self.item else {
            return Err(SlotError::Empty);
        };
        if self.locked {
            return Err(SlotError::Locked);
        }
        if target.locked {
            return Err(SlotError::TargetLocked);
        }

        let requested = amount.unwrap_or(self.amount);
        if requested == 0 {
            return Err(SlotError::InvalidAmount);
        }
        if requested > self.amount {
            return Err(SlotError::InsufficientAmount {
                requested,
                available: self.amount,
            });
        }

        let moved = match &target.item {
            None => {
                target.put(item.clone(), requested);
                requested
            }
            Some(held) if held.id() == item.id() => {
                let moved = requested.min(target.headroom());
                if moved == 0 {
                    return Err(SlotError::NoRoom);
                }
                target.amount += moved;
                moved
            }
            Some(_) => return Err(SlotError::IdentityMismatch),
        };

        self.take(moved);
        Ok(moved)
    }

    /// Detach `amount` units into a new slot
    ///
    /// `amount` must be strictly less than the held amount; splitting off a
    /// whole stack is refused. The detached slot holds a copy of the held
    /// item with identical state.
    pub fn split(&mut self, amount: u32) -> Result<Slot, SlotError> {
        let Some(item) = &self.item else {
            return Err(SlotError::Empty);
        };
        if self.locked {
            return Err(SlotError::Locked);
        }
        if amount == 0 {
            return Err(SlotError::InvalidAmount);
        }
        if amount >= self.amount {
            return Err(SlotError::InsufficientAmount {
                requested: amount,
                available: self.amount,
            });
        }

        let detached = Slot {
            item: Some(item.clone()),
            amount,
            locked: false,
            highlighted: false,
        };
        self.take(amount);
        Ok(detached)
    }

    /// Store a stack, replacing whatever was here
    pub(crate) fn put(&mut self, item: ItemInstance, amount: u32) {
        let amount = amount.min(item.max_stack_size());
        if amount == 0 {
            self.item = None;
            self.amount = 0;
            return;
        }
        self.item = Some(item);
        self.amount = amount;
    }

    /// Add units to the held stack; callers check headroom first
    pub(crate) fn grow(&mut self, quantity: u32) {
        debug_assert!(quantity <= self.headroom());
        self.amount += quantity;
    }

    /// Remove up to `quantity` units, emptying the slot at 0
    pub(crate) fn take(&mut self, quantity: u32) -> u32 {
        let taken = quantity.min(self.amount);
        self.amount -= taken;
        if self.amount == 0 {
            self.item = None;
        }
        taken
    }

    /// Empty the slot regardless of the lock
    pub(crate) fn take_all(&mut self) -> Option<(ItemInstance, u32)> {
        let amount = std::mem::take(&mut self.amount);
        self.item.take().map(|item| (item, amount))
    }

    /// Exchange contents with another slot, keeping each slot's flags
    pub(crate) fn swap_contents(&mut self, other: &mut Slot) {
        std::mem::swap(&mut self.item, &mut other.item);
        std::mem::swap(&mut self.amount, &mut other.amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use item_core::{ItemDefinition, ItemType};

    fn potion() -> ItemInstance {
        ItemInstance::new(
            &ItemDefinition::new(1, "Potion")
                .with_icon("potion")
                .with_type(ItemType::Consumable)
                .with_max_stack(10),
        )
    }

    fn ore() -> ItemInstance {
        ItemInstance::new(&ItemDefinition::new(2, "Ore").with_icon("ore").with_max_stack(10))
    }

    #[test]
    fn test_new_slot_is_empty() {
        let slot = Slot::new();
        assert!(slot.is_empty());
        assert_eq!(slot.amount(), 0);
        assert!(!slot.is_locked());
        assert!(!slot.is_highlighted());
    }

    #[test]
    fn test_with_item_clamps() {
        let slot = Slot::with_item(potion(), 25);
        assert_eq!(slot.amount(), 10);
        assert!(Slot::with_item(potion(), 0).is_empty());
    }

    #[test]
    fn test_can_add_item() {
        let mut slot = Slot::new();
        assert!(slot.can_add_item(&potion(), 100));

        slot.put(potion(), 6);
        assert!(slot.can_add_item(&potion(), 4));
        assert!(!slot.can_add_item(&potion(), 5));
        assert!(!slot.can_add_item(&ore(), 1));

        slot.set_locked(true);
        assert!(!slot.can_add_item(&potion(), 1));
    }

    #[test]
    fn test_clear_respects_lock() {
        let mut slot = Slot::with_item(potion(), 3);
        slot.set_locked(true);
        assert!(slot.clear().is_none());
        assert_eq!(slot.amount(), 3);

        slot.set_locked(false);
        let (item, amount) = slot.clear().unwrap();
        assert_eq!(item.id(), 1);
        assert_eq!(amount, 3);
        assert!(slot.is_empty());
    }

    #[test]
    fn test_transfer_all_to_empty() {
        let mut source = Slot::with_item(potion(), 4);
        let mut target = Slot::new();

        assert_eq!(source.transfer_to(&mut target, None), Ok(4));
        assert!(source.is_empty());
        assert_eq!(target.amount(), 4);
        assert_eq!(target.item().map(|i| i.id()), Some(1));
    }

    #[test]
    fn test_transfer_partial_to_empty_clones() {
        let mut source = Slot::with_item(potion(), 4);
        let mut target = Slot::new();

        assert_eq!(source.transfer_to(&mut target, Some(1)), Ok(1));
        assert_eq!(source.amount(), 3);
        assert_eq!(target.amount(), 1);

        let source_key = source.item().map(|i| i.key());
        let target_key = target.item().map(|i| i.key());
        assert_ne!(source_key, target_key);
    }

    #[test]
    fn test_transfer_truncates_to_headroom() {
        let mut source = Slot::with_item(potion(), 5);
        let mut target = Slot::with_item(potion(), 8);

        assert_eq!(source.transfer_to(&mut target, None), Ok(2));
        assert_eq!(source.amount(), 3);
        assert_eq!(target.amount(), 10);

        assert_eq!(source.transfer_to(&mut target, None), Err(SlotError::NoRoom));
        assert_eq!(source.amount(), 3);
    }

    #[test]
    fn test_transfer_failures_do_not_mutate() {
        let mut source = Slot::with_item(potion(), 5);
        let mut other = Slot::with_item(ore(), 1);
        assert_eq!(
            source.transfer_to(&mut other, None),
            Err(SlotError::IdentityMismatch)
        );
        assert_eq!(
            source.transfer_to(&mut Slot::new(), Some(6)),
            Err(SlotError::InsufficientAmount {
                requested: 6,
                available: 5
            })
        );
        assert_eq!(
            source.transfer_to(&mut Slot::new(), Some(0)),
            Err(SlotError::InvalidAmount)
        );

        let mut locked_target = Slot::new();
        locked_target.set_locked(true);
        assert_eq!(
            source.transfer_to(&mut locked_target, None),
            Err(SlotError::TargetLocked)
        );

        source.set_locked(true);
        assert_eq!(source.transfer_to(&mut Slot::new(), None), Err(SlotError::Locked));
        assert_eq!(
            Slot::new().transfer_to(&mut Slot::new(), None),
            Err(SlotError::Empty)
        );

        assert_eq!(source.amount(), 5);
        assert_eq!(other.amount(), 1);
    }

    #[test]
    fn test_split_strictly_less() {
        let mut slot = Slot::with_item(potion(), 5);
        assert!(matches!(
            slot.split(5),
            Err(SlotError::InsufficientAmount { .. })
        ));
        assert_eq!(slot.amount(), 5);

        let detached = slot.split(2).unwrap();
        assert_eq!(detached.amount(), 2);
        assert_eq!(slot.amount(), 3);
        assert_eq!(detached.amount() + slot.amount(), 5);
        assert!(detached.item().unwrap().is_same_kind(slot.item().unwrap()));
    }

    #[test]
    fn test_split_rejects_empty_locked_zero() {
        assert_eq!(Slot::new().split(1).unwrap_err(), SlotError::Empty);

        let mut slot = Slot::with_item(potion(), 5);
        assert_eq!(slot.split(0).unwrap_err(), SlotError::InvalidAmount);
        slot.set_locked(true);
        assert_eq!(slot.split(1).unwrap_err(), SlotError::Locked);
    }

    #[test]
    fn test_split_keeps_item_state() {
        let mut item = potion();
        item.update_durability(-40.0);
        let mut slot = Slot::with_item(item, 5);

        let detached = slot.split(1).unwrap();
        let state = detached.item().unwrap().durability().current();
        assert!((state - 60.0).abs() < f64::EPSILON);
    }
}

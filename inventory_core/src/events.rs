//! Synchronous change notifications
//!
//! Listeners run inside the mutating call, after the inventory state has
//! settled and before the call returns. They receive only the event, never
//! the inventory, so a listener cannot mutate the inventory that notified it;
//! subscribers re-query the inventory after the call returns.

use std::fmt;

/// What changed, identified by slot index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InventoryEvent {
    ItemAdded { slot: usize },
    ItemRemoved { slot: usize },
    ItemUsed { slot: usize },
}

impl InventoryEvent {
    /// Slot the event refers to
    pub fn slot(&self) -> usize {
        match self {
            InventoryEvent::ItemAdded { slot }
            | InventoryEvent::ItemRemoved { slot }
            | InventoryEvent::ItemUsed { slot } => *slot,
        }
    }
}

impl fmt::Display for InventoryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InventoryEvent::ItemAdded { slot } => write!(f, "item added at slot {}", slot),
            InventoryEvent::ItemRemoved { slot } => write!(f, "item removed from slot {}", slot),
            InventoryEvent::ItemUsed { slot } => write!(f, "item used from slot {}", slot),
        }
    }
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

type Listener = Box<dyn FnMut(&InventoryEvent)>;

/// Ordered list of listeners; notified in subscription order
#[derive(Default)]
pub struct Listeners {
    next_id: u64,
    listeners: Vec<(SubscriberId, Listener)>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&InventoryEvent) + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the id was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn emit(&mut self, event: InventoryEvent) {
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.listeners.len())
            .finish()
    }
}

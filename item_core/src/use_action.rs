//! Hook point for using an item
//!
//! The library defines no gameplay for using items. Callers plug behaviour in
//! through [`UseHandler`], either as a closure or per item type with
//! [`UseHandlers`].

use crate::item::ItemInstance;
use crate::types::ItemType;
use std::collections::HashMap;

/// What happened to the used unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UseOutcome {
    /// One unit is spent and should be removed
    Consumed,
    /// The item stays where it is
    #[default]
    Kept,
}

/// Behaviour run when an item is used
pub trait UseHandler {
    fn on_use(&mut self, item: &ItemInstance) -> UseOutcome;
}

impl<F> UseHandler for F
where
    F: FnMut(&ItemInstance) -> UseOutcome,
{
    fn on_use(&mut self, item: &ItemInstance) -> UseOutcome {
        self(item)
    }
}

/// Default handler: logs the use and keeps the item
#[derive(Debug, Clone, Copy, Default)]
pub struct LogUseHandler;

impl UseHandler for LogUseHandler {
    fn on_use(&mut self, item: &ItemInstance) -> UseOutcome {
        log::info!("Used {} ({})", item.name(), item.id());
        UseOutcome::Kept
    }
}

/// Dispatches to a handler registered for the item's type
///
/// Types without a handler fall back to [`LogUseHandler`].
#[derive(Default)]
pub struct UseHandlers {
    by_type: HashMap<ItemType, Box<dyn UseHandler>>,
}

impl UseHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for an item type, replacing any previous one
    pub fn register(&mut self, item_type: ItemType, handler: impl UseHandler + 'static) {
        self.by_type.insert(item_type, Box::new(handler));
    }

    /// Builder form of [`register`](Self::register)
    pub fn with(mut self, item_type: ItemType, handler: impl UseHandler + 'static) -> Self {
        self.register(item_type, handler);
        self
    }

    pub fn has_handler(&self, item_type: ItemType) -> bool {
        self.by_type.contains_key(&item_type)
    }
}

impl UseHandler for UseHandlers {
    fn on_use(&mut self, item: &ItemInstance) -> UseOutcome {
        match self.by_type.get_mut(&item.item_type()) {
            Some(handler) => handler.on_use(item),
            None => LogUseHandler.on_use(item),
        }
    }
}

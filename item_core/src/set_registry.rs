//! Process-wide index of live item instances by equipment set name
//!
//! The registry never owns items. Every [`ItemInstance`](crate::ItemInstance)
//! carries an [`InstanceKey`] and the registry stores only those keys, so a
//! bucket is a back-reference index maintained at the exact points where an
//! instance gains, changes or loses its set name (construction, clone,
//! `set_set_name`, drop).

use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

/// Global set registry instance
static SET_REGISTRY: OnceLock<Mutex<SetRegistry>> = OnceLock::new();

/// Source of instance keys; 0 is never handed out
static NEXT_INSTANCE_KEY: AtomicU64 = AtomicU64::new(1);

/// Process-unique handle of one live item instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceKey(u64);

impl InstanceKey {
    /// Mint a key that no other instance in this process has
    pub(crate) fn next() -> Self {
        InstanceKey(NEXT_INSTANCE_KEY.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw key value
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Mapping from set name to the keys of instances claiming that set
#[derive(Debug, Default)]
pub struct SetRegistry {
    sets: HashMap<String, HashSet<InstanceKey>>,
}

impl SetRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member, creating the bucket on first insertion
    ///
    /// Returns false if the key was already present.
    pub fn insert(&mut self, set_name: &str, key: InstanceKey) -> bool {
        let bucket = self.sets.entry(set_name.to_string()).or_insert_with(|| {
            log::debug!("Creating set bucket '{}'", set_name);
            HashSet::new()
        });
        bucket.insert(key)
    }

    /// Remove a member; an emptied bucket is pruned
    ///
    /// Returns false if the key was not a member.
    pub fn remove(&mut self, set_name: &str, key: InstanceKey) -> bool {
        let Some(bucket) = self.sets.get_mut(set_name) else {
            return false;
        };
        let removed = bucket.remove(&key);
        if bucket.is_empty() {
            log::debug!("Pruning empty set bucket '{}'", set_name);
            self.sets.remove(set_name);
        }
        removed
    }

    /// Check whether a key is a member of a set
    pub fn contains(&self, set_name: &str, key: InstanceKey) -> bool {
        self.sets
            .get(set_name)
            .is_some_and(|bucket| bucket.contains(&key))
    }

    /// Keys of all members of a set, sorted
    pub fn members(&self, set_name: &str) -> Vec<InstanceKey> {
        let mut keys: Vec<InstanceKey> = self
            .sets
            .get(set_name)
            .map(|bucket| bucket.iter().copied().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    /// Number of live members of a set
    pub fn len(&self, set_name: &str) -> usize {
        self.sets.get(set_name).map_or(0, |bucket| bucket.len())
    }

    /// Names of all non-empty sets, sorted
    pub fn set_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sets.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if no set has any member
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

fn global() -> &'static Mutex<SetRegistry> {
    SET_REGISTRY.get_or_init(|| Mutex::new(SetRegistry::new()))
}

pub(crate) fn register(set_name: &str, key: InstanceKey) {
    global().lock().insert(set_name, key);
}

pub(crate) fn unregister(set_name: &str, key: InstanceKey) {
    global().lock().remove(set_name, key);
}

/// Check whether an instance is indexed under a set in the global registry
pub fn contains(set_name: &str, key: InstanceKey) -> bool {
    global().lock().contains(set_name, key)
}

/// Keys of the live instances claiming a set
pub fn members(set_name: &str) -> Vec<InstanceKey> {
    global().lock().members(set_name)
}

/// Number of live instances claiming a set
pub fn member_count(set_name: &str) -> usize {
    global().lock().len(set_name)
}

/// Names of every set with at least one live member
pub fn set_names() -> Vec<String> {
    global().lock().set_names()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_creates_bucket() {
        let mut registry = SetRegistry::new();
        let key = InstanceKey::next();

        assert!(registry.is_empty());
        assert!(registry.insert("Dragon", key));
        assert!(!registry.insert("Dragon", key));
        assert!(registry.contains("Dragon", key));
        assert_eq!(registry.len("Dragon"), 1);
        assert_eq!(registry.set_names(), vec!["Dragon".to_string()]);
    }

    #[test]
    fn test_remove_prunes_empty_bucket() {
        let mut registry = SetRegistry::new();
        let a = InstanceKey::next();
        let b = InstanceKey::next();
        registry.insert("Knight", a);
        registry.insert("Knight", b);

        assert!(registry.remove("Knight", a));
        assert_eq!(registry.members("Knight"), vec![b]);
        assert!(registry.remove("Knight", b));
        assert!(registry.is_empty());
        assert!(!registry.remove("Knight", b));
    }

    #[test]
    fn test_keys_are_unique() {
        let a = InstanceKey::next();
        let b = InstanceKey::next();
        assert_ne!(a, b);
        assert!(a.get() > 0);
    }

    #[test]
    fn test_members_sorted() {
        let mut registry = SetRegistry::new();
        let keys: Vec<InstanceKey> = (0..5).map(|_| InstanceKey::next()).collect();
        for key in keys.iter().rev() {
            registry.insert("Shadow", *key);
        }
        assert_eq!(registry.members("Shadow"), keys);
        assert!(registry.members("Missing").is_empty());
    }
}

//! Shared collection abstractions used throughout canto-core.
//!
//! The registry and definition child sets are read-mostly after load;
//! `dashmap::DashMap` gives them lock-free concurrent reads.

use dashmap::DashMap;
use std::hash::Hash;

pub struct ConcurrentMap<K, V> {
    inner: DashMap<K, V>,
}

impl<K, V> Default for ConcurrentMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> ConcurrentMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            inner: DashMap::new(),
        }
    }

    pub fn insert(&self, key: K, value: V) {
        self.inner.insert(key, value);
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.contains_key(key)
    }

    pub fn get_cloned(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.get(key).map(|entry| entry.value().clone())
    }

    /// Mutate the entry for `key` in place, inserting a default first if absent.
    pub fn update<F>(&self, key: K, f: F)
    where
        V: Default,
        F: FnOnce(&mut V),
    {
        let mut entry = self.inner.entry(key).or_default();
        f(entry.value_mut());
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_inserts_default_then_mutates() {
        let map: ConcurrentMap<String, Vec<i32>> = ConcurrentMap::new();
        assert!(map.is_empty());
        map.update("xs".to_string(), |v| v.push(1));
        map.update("xs".to_string(), |v| v.push(2));
        assert_eq!(map.get_cloned(&"xs".to_string()), Some(vec![1, 2]));
        assert_eq!(map.len(), 1);
    }
}

//! Bounded cache of scan results.
//!
//! Access points are keyed by their `(bssid, ssid)` pair. A repeat sighting
//! merges into the existing entry instead of inserting a second one. When
//! the cache is full the least recently touched entry is dropped.

use log::debug;
use std::collections::{HashMap, VecDeque};

use crate::api::models::NetworkDescriptor;

/// Identity of an access point.
///
/// Kept as a pair so that `("AA", "BBCC")` and `("AABB", "CC")` stay distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct ApKey {
    bssid: String,
    ssid: String,
}

impl ApKey {
    pub(crate) fn of(descriptor: &NetworkDescriptor) -> Self {
        Self {
            bssid: descriptor.bssid().to_string(),
            ssid: descriptor.ssid().to_string(),
        }
    }
}

/// LRU-bounded map from [`ApKey`] to [`NetworkDescriptor`].
#[derive(Debug)]
pub(crate) struct ScanCache {
    capacity: usize,
    entries: HashMap<ApKey, NetworkDescriptor>,
    /// Least recently touched first.
    order: VecDeque<ApKey>,
}

impl ScanCache {
    /// Creates an empty cache. A capacity of zero is raised to one.
    pub(crate) fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    /// Inserts a new access point or merges a repeat sighting into the
    /// existing entry. Either way the entry becomes the most recently used.
    pub(crate) fn upsert(&mut self, descriptor: NetworkDescriptor) {
        let key = ApKey::of(&descriptor);

        if let Some(existing) = self.entries.get_mut(&key) {
            existing.merge_sighting(descriptor);
            self.touch(&key);
            return;
        }

        self.entries.insert(key.clone(), descriptor);
        self.order.push_back(key);

        while self.entries.len() > self.capacity {
            self.evict_lru();
        }
    }

    /// Returns all entries, or `None` while the cache is empty.
    pub(crate) fn snapshot(&self) -> Option<Vec<NetworkDescriptor>> {
        if self.entries.is_empty() {
            return None;
        }

        Some(
            self.order
                .iter()
                .filter_map(|key| self.entries.get(key).cloned())
                .collect(),
        )
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    fn touch(&mut self, key: &ApKey) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
        self.order.push_back(key.clone());
    }

    fn evict_lru(&mut self) {
        if let Some(key) = self.order.pop_front() {
            self.entries.remove(&key);
            debug!("Evicted {} ({}) from scan cache", key.ssid, key.bssid);
        }
    }
}

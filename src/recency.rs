//! Recency-ordered map.
//!
//! A hash index from key to arena slot plus an index-linked list threaded
//! through the arena. Head is the least recently used entry, tail the most
//! recently used. Touch, insert, remove and pop-LRU are all O(1).
//! Freed slots are recycled through a free list, so the arena never grows
//! past the peak number of live entries.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone)]
struct Slot<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Map whose iteration order is least to most recently used.
#[derive(Debug, Clone)]
pub struct RecencyMap<K, V> {
    index: HashMap<K, usize>,
    slots: Vec<Slot<K, V>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl<K, V> Default for RecencyMap<K, V>
where
    K: Copy + Eq + Hash,
    V: Copy,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> RecencyMap<K, V>
where
    K: Copy + Eq + Hash,
    V: Copy,
{
    /// Create an empty map
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty map with room for `capacity` entries
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            index: HashMap::with_capacity(capacity),
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
        }
    }

    /// Number of live entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True when no entries are live
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Check membership without touching recency
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Read a value without touching recency
    #[must_use]
    pub fn peek(&self, key: &K) -> Option<V> {
        self.index.get(key).map(|&idx| self.slots[idx].value)
    }

    /// Read a value and mark it most recently used
    pub fn get(&mut self, key: &K) -> Option<V> {
        let idx = *self.index.get(key)?;
        self.move_to_back(idx);
        Some(self.slots[idx].value)
    }

    /// Mark an entry most recently used. Returns false if absent.
    pub fn touch(&mut self, key: &K) -> bool {
        match self.index.get(key) {
            Some(&idx) => {
                self.move_to_back(idx);
                true
            }
            None => false,
        }
    }

    /// Insert or overwrite at the most recently used position.
    ///
    /// Returns the previous value if the key was present.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&idx) = self.index.get(&key) {
            let old = self.slots[idx].value;
            self.slots[idx].value = value;
            self.move_to_back(idx);
            return Some(old);
        }

        let slot = Slot {
            key,
            value,
            prev: None,
            next: None,
        };
        let idx = if let Some(idx) = self.free.pop() {
            self.slots[idx] = slot;
            idx
        } else {
            self.slots.push(slot);
            self.slots.len() - 1
        };
        self.index.insert(key, idx);
        self.push_back(idx);
        None
    }

    /// Remove an entry, returning its value
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.index.remove(key)?;
        self.unlink(idx);
        self.free.push(idx);
        Some(self.slots[idx].value)
    }

    /// Least recently used entry, without removing it
    #[must_use]
    pub fn peek_lru(&self) -> Option<(K, V)> {
        self.head.map(|idx| (self.slots[idx].key, self.slots[idx].value))
    }

    /// Remove and return the least recently used entry
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        let (key, _) = self.peek_lru()?;
        self.remove(&key).map(|value| (key, value))
    }

    /// Iterate from least to most recently used
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            map: self,
            cursor: self.head,
            remaining: self.len(),
        }
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.index.clear();
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.slots[idx].prev, self.slots[idx].next);
        match prev {
            Some(p) => self.slots[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.slots[n].prev = prev,
            None => self.tail = prev,
        }
        self.slots[idx].prev = None;
        self.slots[idx].next = None;
    }

    fn push_back(&mut self, idx: usize) {
        self.slots[idx].prev = self.tail;
        self.slots[idx].next = None;
        match self.tail {
            Some(t) => self.slots[t].next = Some(idx),
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
    }

    fn move_to_back(&mut self, idx: usize) {
        if self.tail == Some(idx) {
            return;
        }
        self.unlink(idx);
        self.push_back(idx);
    }
}

/// Iterator over a [`RecencyMap`], least recently used first.
#[derive(Debug)]
pub struct Iter<'a, K, V> {
    map: &'a RecencyMap<K, V>,
    cursor: Option<usize>,
    remaining: usize,
}

impl<K: Copy, V: Copy> Iterator for Iter<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        let slot = &self.map.slots[idx];
        self.cursor = slot.next;
        self.remaining -= 1;
        Some((slot.key, slot.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K: Copy, V: Copy> ExactSizeIterator for Iter<'_, K, V> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(map: &RecencyMap<u64, usize>) -> Vec<u64> {
        map.iter().map(|(k, _)| k).collect()
    }

    #[test]
    fn test_insert_orders_by_recency() {
        let mut map = RecencyMap::new();
        map.insert(1, 10);
        map.insert(2, 20);
        map.insert(3, 30);

        assert_eq!(keys(&map), vec![1, 2, 3]);
        assert_eq!(map.peek_lru(), Some((1, 10)));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_get_moves_to_mru() {
        let mut map = RecencyMap::new();
        map.insert(1, 10);
        map.insert(2, 20);
        map.insert(3, 30);

        assert_eq!(map.get(&1), Some(10));
        assert_eq!(keys(&map), vec![2, 3, 1]);

        // Touching the tail is a no-op
        assert_eq!(map.get(&1), Some(10));
        assert_eq!(keys(&map), vec![2, 3, 1]);
    }

    #[test]
    fn test_peek_does_not_move() {
        let mut map = RecencyMap::new();
        map.insert(1, 10);
        map.insert(2, 20);

        assert_eq!(map.peek(&1), Some(10));
        assert_eq!(keys(&map), vec![1, 2]);
        assert_eq!(map.peek(&9), None);
    }

    #[test]
    fn test_insert_existing_overwrites_and_refreshes() {
        let mut map = RecencyMap::new();
        map.insert(1, 10);
        map.insert(2, 20);

        assert_eq!(map.insert(1, 11), Some(10));
        assert_eq!(keys(&map), vec![2, 1]);
        assert_eq!(map.peek(&1), Some(11));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_pop_lru() {
        let mut map = RecencyMap::new();
        map.insert(1, 10);
        map.insert(2, 20);
        map.touch(&1);

        assert_eq!(map.pop_lru(), Some((2, 20)));
        assert_eq!(map.pop_lru(), Some((1, 10)));
        assert_eq!(map.pop_lru(), None);
        assert!(map.is_empty());
    }

    #[test]
    fn test_remove_middle_relinks() {
        let mut map = RecencyMap::new();
        map.insert(1, 10);
        map.insert(2, 20);
        map.insert(3, 30);

        assert_eq!(map.remove(&2), Some(20));
        assert_eq!(keys(&map), vec![1, 3]);
        assert_eq!(map.remove(&2), None);
        assert!(!map.contains(&2));
    }

    #[test]
    fn test_slots_are_recycled() {
        let mut map = RecencyMap::with_capacity(2);
        for key in 0..100u64 {
            map.insert(key, key as usize);
            if map.len() > 2 {
                map.pop_lru();
            }
        }
        assert_eq!(map.len(), 2);
        assert!(map.slots.len() <= 3);
        assert_eq!(keys(&map), vec![98, 99]);
    }

    #[test]
    fn test_touch_missing_returns_false() {
        let mut map: RecencyMap<u64, usize> = RecencyMap::new();
        assert!(!map.touch(&5));
    }

    #[test]
    fn test_clear() {
        let mut map = RecencyMap::new();
        map.insert(1, 10);
        map.insert(2, 20);
        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.peek_lru(), None);
        assert_eq!(map.iter().len(), 0);
    }
}

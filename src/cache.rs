use std::{hash::Hash, num::NonZeroUsize};

use indexmap::IndexMap;

use crate::{entry::PeekMut, RandomState};

/// Capacity used by [`ResourceCache::default`] and
/// [`CacheRegistry`](crate::CacheRegistry) groups registered without an
/// explicit capacity.
pub const DEFAULT_CAPACITY: usize = 20;

/// A cached value plus its position in the recency list.
///
/// The list is threaded through the map by index: `newer` points one step
/// toward the most-recently-used end, `older` one step toward the
/// least-recently-used end.
#[derive(Clone)]
pub(crate) struct Slot<V> {
    pub(crate) value: V,
    newer: Option<usize>,
    older: Option<usize>,
}

impl<V> Slot<V> {
    fn new(value: V) -> Self {
        Self {
            value,
            newer: None,
            older: None,
        }
    }
}

/// Indices of both ends of the recency list.
#[derive(Debug, Clone, Copy, Default)]
struct Order {
    mru: usize,
    lru: usize,
}

/// A bounded cache that memoizes a load operation, evicting the
/// least-recently-used entry when full.
///
/// The cache holds at most `capacity` entries. Every promoting access
/// (`get`, `get_mut`, a `get_or_load` hit, or an `insert` of an existing
/// key) moves the entry to the most-recently-used position; when an
/// insertion would exceed capacity, the entry whose last use is oldest is
/// dropped. Reads through [`peek`](Self::peek),
/// [`contains_key`](Self::contains_key), and [`oldest`](Self::oldest) do
/// not count as uses.
///
/// All operations run in O(1) amortized time. The recency list is stored
/// as `prev`/`next` indices inside the map's slots, so a promotion or an
/// eviction is a handful of pointer swaps, never a scan.
///
/// The cache performs no internal synchronization and is meant to be owned
/// by one logical context (a render thread, a request handler). Wrap it in
/// a lock if it must be shared.
///
/// # Examples
///
/// ```
/// use rescache::ResourceCache;
///
/// let mut cache = ResourceCache::new(2);
/// cache.get_or_load("a", |_| Some(1));
/// cache.get_or_load("b", |_| Some(2));
///
/// // Touch "a", then admit a third entry: "b" is now the oldest and gets
/// // evicted.
/// cache.get_or_load("a", |_| None);
/// cache.get_or_load("c", |_| Some(3));
///
/// assert!(cache.contains_key(&"a"));
/// assert!(!cache.contains_key(&"b"));
/// assert!(cache.contains_key(&"c"));
/// ```
#[derive(Clone)]
pub struct ResourceCache<K, V> {
    pub(crate) slots: IndexMap<K, Slot<V>, RandomState>,
    capacity: NonZeroUsize,
    order: Order,
}

impl<K, V> ResourceCache<K, V> {
    /// Returns the number of entries currently held, always within
    /// `0..=capacity`.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns the maximum number of entries the cache can hold.
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Removes all entries and resets the recency order.
    ///
    /// The capacity is unchanged. This cannot fail and is the intended
    /// lifecycle-reset hook: call it at whatever restart boundary the host
    /// application defines.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.order = Order::default();
    }

    /// Returns the entry that would be evicted next, without touching it.
    ///
    /// # Examples
    ///
    /// ```
    /// use rescache::ResourceCache;
    ///
    /// let mut cache = ResourceCache::new(3);
    /// cache.insert("a", 1);
    /// cache.insert("b", 2);
    /// assert_eq!(cache.oldest(), Some((&"a", &1)));
    ///
    /// cache.get(&"a");
    /// assert_eq!(cache.oldest(), Some((&"b", &2)));
    /// ```
    pub fn oldest(&self) -> Option<(&K, &V)> {
        self.slots
            .get_index(self.order.lru)
            .map(|(key, slot)| (key, &slot.value))
    }

    /// Removes and returns the least-recently-used entry.
    pub fn pop(&mut self) -> Option<(K, V)> {
        self.detach(self.order.lru)
            .map(|(key, slot)| (key, slot.value))
    }

    /// Returns an iterator over entries from least to most recently used.
    ///
    /// The first item is the next eviction candidate, the same entry
    /// [`oldest`](Self::oldest) reports. Iterating does not affect the
    /// recency order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: &self.slots,
            index: Some(self.order.lru),
        }
    }

    /// Moves the entry at `index` to the most-recently-used position,
    /// first evicting the least-recently-used entry if `make_room` is set.
    /// Returns the entry's index after any reordering.
    pub(crate) fn touch(&mut self, mut index: usize, make_room: bool) -> usize {
        if index >= self.slots.len() {
            return index;
        }

        if make_room {
            debug_assert_ne!(self.order.lru, index);
            // The newly admitted entry sits at the end of the map; after
            // the swap-remove below it occupies the evicted entry's index.
            if index == self.slots.len() - 1 {
                index = self.order.lru;
            }
            self.detach(self.order.lru);
        }

        let old_mru = self.order.mru;
        if old_mru == index {
            return index;
        }

        self.order.mru = index;
        let old_older = self.slots[index].older;
        let old_newer = self.slots[index].newer;
        self.slots[index].newer = None;
        self.slots[index].older = Some(old_mru);

        if self.order.lru == index {
            self.order.lru = old_newer.unwrap_or_default();
        }

        self.slots[old_mru].newer = Some(index);

        if let Some(older) = old_older {
            self.slots[older].newer = old_newer;
        }

        if let Some(newer) = old_newer {
            self.slots[newer].older = old_older;
        }
        index
    }

    /// Removes the entry at `index` via swap-remove and repairs the links
    /// of whichever entry was moved into its place.
    ///
    /// The moved entry is the one that was last in the map, so every link
    /// or end-pointer that referenced the old last index must be redirected
    /// to `index`.
    pub(crate) fn detach(&mut self, index: usize) -> Option<(K, Slot<V>)> {
        if index >= self.slots.len() {
            return None;
        }

        if self.slots.len() == 1 {
            let removed = self.slots.swap_remove_index(index);
            self.order = Order::default();
            return removed;
        }

        let (key, slot) = self.slots.swap_remove_index(index)?;
        if self.slots.len() == 1 {
            self.order = Order::default();
            self.slots[0].older = None;
            self.slots[0].newer = None;
            return Some((key, slot));
        }

        let moved = self.slots.len();

        if index == self.order.mru {
            self.order.mru = slot.older.unwrap_or_default();
        }
        if self.order.mru == moved {
            self.order.mru = index;
        }

        if index == self.order.lru {
            self.order.lru = slot.newer.unwrap_or_default();
        }
        if self.order.lru == moved {
            self.order.lru = index;
        }

        if let Some(older) = slot.older {
            // The removed entry's older neighbor must now point past it.
            // Either endpoint of that link may have been the moved entry.
            let newer_link = if older == moved {
                &mut self.slots[index].newer
            } else {
                &mut self.slots[older].newer
            };
            *newer_link = if slot.newer == Some(moved) {
                Some(index)
            } else {
                slot.newer
            };
        }
        if let Some(newer) = slot.newer {
            let older_link = if newer == moved {
                &mut self.slots[index].older
            } else {
                &mut self.slots[newer].older
            };
            *older_link = if slot.older == Some(moved) {
                Some(index)
            } else {
                slot.older
            };
        }

        // Removed the last index: nothing was moved, links are consistent.
        if index == self.slots.len() {
            return Some((key, slot));
        }

        if let Some(newer) = self.slots[index].newer {
            self.slots[newer].older = Some(index);
        }
        if let Some(older) = self.slots[index].older {
            self.slots[older].newer = Some(index);
        }

        Some((key, slot))
    }
}

impl<K: Hash + Eq, V> ResourceCache<K, V> {
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// A capacity below 1 is clamped to 1 rather than rejected; the cache
    /// is always constructible.
    ///
    /// # Examples
    ///
    /// ```
    /// use rescache::ResourceCache;
    ///
    /// let cache: ResourceCache<String, Vec<u8>> = ResourceCache::new(16);
    /// assert_eq!(cache.capacity(), 16);
    /// assert!(cache.is_empty());
    ///
    /// let tiny: ResourceCache<String, Vec<u8>> = ResourceCache::new(0);
    /// assert_eq!(tiny.capacity(), 1);
    /// ```
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            slots: IndexMap::with_capacity_and_hasher(capacity.get(), RandomState::default()),
            capacity,
            order: Order::default(),
        }
    }

    /// Returns `true` if the cache holds an entry for `key`.
    ///
    /// A presence check is not a use: it never changes the recency order.
    pub fn contains_key(&self, key: &K) -> bool {
        self.slots.contains_key(key)
    }

    /// Returns the value for `key` without touching its recency position.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.slots.get(key).map(|slot| &slot.value)
    }

    /// Returns a handle to the value for `key` that promotes the entry only
    /// if the value is actually modified through it.
    ///
    /// See [`PeekMut`] for the tracking rules.
    pub fn peek_mut(&mut self, key: &K) -> Option<PeekMut<'_, K, V>> {
        self.slots
            .get_index_of(key)
            .map(|index| PeekMut::new(index, self))
    }

    /// Returns the value for `key`, promoting the entry to
    /// most-recently-used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.get_mut(key).map(|value| &*value)
    }

    /// Returns a mutable reference to the value for `key`, promoting the
    /// entry to most-recently-used.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let index = self.slots.get_index_of(key)?;
        let index = self.touch(index, false);
        Some(&mut self.slots[index].value)
    }

    /// Returns the cached value for `key`, or loads and admits it on a
    /// miss.
    ///
    /// On a hit the entry is promoted to most-recently-used and `load` is
    /// not called. On a miss, `load(&key)` runs synchronously:
    ///
    /// - `Some(value)` admits the entry as most-recently-used, evicting
    ///   the least-recently-used entry if the cache was full, and returns
    ///   the value.
    /// - `None` leaves the cache untouched and returns `None`. Absence is
    ///   never cached: the next miss for the same key calls the loader
    ///   again.
    ///
    /// # Examples
    ///
    /// ```
    /// use rescache::ResourceCache;
    ///
    /// let mut cache = ResourceCache::new(4);
    /// let mut loads = 0;
    ///
    /// let value = cache.get_or_load("mesh/rock", |_| {
    ///     loads += 1;
    ///     Some(vec![0u8; 64])
    /// });
    /// assert!(value.is_some());
    ///
    /// let value = cache.get_or_load("mesh/rock", |_| {
    ///     loads += 1;
    ///     Some(vec![0u8; 64])
    /// });
    /// assert!(value.is_some());
    /// assert_eq!(loads, 1);
    /// ```
    pub fn get_or_load<F>(&mut self, key: K, load: F) -> Option<&V>
    where
        F: FnOnce(&K) -> Option<V>,
    {
        if let Some(index) = self.slots.get_index_of(&key) {
            let index = self.touch(index, false);
            return Some(&self.slots[index].value);
        }
        let value = load(&key)?;
        Some(self.admit(key, value))
    }

    /// Like [`get_or_load`](Self::get_or_load), for loaders whose failure
    /// carries an error.
    ///
    /// The error is returned untouched and the cache is left unchanged, the
    /// same as a plain absent result. `Ok(None)` from the loader likewise
    /// admits nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use rescache::ResourceCache;
    ///
    /// let mut cache = ResourceCache::new(4);
    ///
    /// let result: Result<_, std::io::Error> =
    ///     cache.try_get_or_load("data/table", |_| Ok(Some(vec![1u8, 2])));
    /// assert!(result.unwrap().is_some());
    /// ```
    pub fn try_get_or_load<F, E>(&mut self, key: K, load: F) -> Result<Option<&V>, E>
    where
        F: FnOnce(&K) -> Result<Option<V>, E>,
    {
        if let Some(index) = self.slots.get_index_of(&key) {
            let index = self.touch(index, false);
            return Ok(Some(&self.slots[index].value));
        }
        match load(&key)? {
            Some(value) => Ok(Some(self.admit(key, value))),
            None => Ok(None),
        }
    }

    /// Inserts a key-value pair, promoting it to most-recently-used.
    ///
    /// An existing entry for `key` has its value replaced. A fresh
    /// insertion into a full cache evicts the least-recently-used entry.
    pub fn insert(&mut self, key: K, value: V) -> &V {
        match self.slots.get_index_of(&key) {
            Some(index) => {
                self.slots[index].value = value;
                let index = self.touch(index, false);
                &self.slots[index].value
            }
            None => self.admit(key, value),
        }
    }

    /// Removes the entry for `key`, returning its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let index = self.slots.get_index_of(key)?;
        self.detach(index).map(|(_, slot)| slot.value)
    }

    /// Admits a key known to be absent as the most-recently-used entry,
    /// evicting the least-recently-used entry if the cache is full.
    fn admit(&mut self, key: K, value: V) -> &V {
        let len = self.slots.len();
        let (index, _) = self.slots.insert_full(key, Slot::new(value));
        let index = self.touch(index, len == self.capacity.get());
        &self.slots[index].value
    }
}

impl<K: Hash + Eq, V> Default for ResourceCache<K, V> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl<K: std::fmt::Debug, V: std::fmt::Debug> std::fmt::Debug for ResourceCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Borrowing iterator over cache entries from least to most recently used.
pub struct Iter<'a, K, V> {
    slots: &'a IndexMap<K, Slot<V>, RandomState>,
    index: Option<usize>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let (key, slot) = self.slots.get_index(self.index?)?;
        self.index = slot.newer;
        Some((key, &slot.value))
    }
}

/// Owning iterator over cache entries from least to most recently used.
pub struct IntoIter<K, V> {
    slots: Vec<Option<(K, Slot<V>)>>,
    index: Option<usize>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let (key, slot) = self.slots.get_mut(self.index?)?.take()?;
        self.index = slot.newer;
        Some((key, slot.value))
    }
}

impl<K, V> IntoIterator for ResourceCache<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter {
            slots: self.slots.into_iter().map(Some).collect(),
            index: Some(self.order.lru),
        }
    }
}

impl<'a, K, V> IntoIterator for &'a ResourceCache<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

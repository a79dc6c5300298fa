use std::ops::{Deref, DerefMut};

use crate::ResourceCache;

/// A handle to a cached value that promotes the entry only if the value is
/// modified while borrowed.
///
/// Returned by [`ResourceCache::peek_mut`]. The handle dereferences to the
/// value; any mutable access (`DerefMut`, [`AsMut`], or
/// [`value_mut`](Self::value_mut)) marks it dirty, and a dirty handle
/// promotes its entry to most-recently-used when dropped. Read-only access
/// leaves the recency order exactly as [`peek`](ResourceCache::peek)
/// would.
///
/// # Examples
///
/// ```
/// use rescache::ResourceCache;
///
/// let mut cache = ResourceCache::new(3);
/// cache.insert("a", vec![1, 2]);
/// cache.insert("b", vec![3, 4]);
///
/// // Reading through the handle does not promote "a".
/// if let Some(slot) = cache.peek_mut(&"a") {
///     assert_eq!(slot.len(), 2);
/// }
/// assert_eq!(cache.oldest().map(|(k, _)| *k), Some("a"));
///
/// // Writing does.
/// if let Some(mut slot) = cache.peek_mut(&"a") {
///     slot.push(5);
/// }
/// assert_eq!(cache.oldest().map(|(k, _)| *k), Some("b"));
/// ```
pub struct PeekMut<'c, K, V> {
    index: usize,
    dirty: bool,
    cache: &'c mut ResourceCache<K, V>,
}

impl<'c, K, V> PeekMut<'c, K, V> {
    pub(crate) fn new(index: usize, cache: &'c mut ResourceCache<K, V>) -> Self {
        Self {
            index,
            dirty: false,
            cache,
        }
    }

    /// Returns the key of the borrowed entry. Does not mark the handle
    /// dirty.
    pub fn key(&self) -> &K {
        self.cache
            .slots
            .get_index(self.index)
            .expect("slot index out of bounds")
            .0
    }

    /// Returns the value. Does not mark the handle dirty.
    pub fn value(&self) -> &V {
        &self.cache.slots[self.index].value
    }

    /// Returns the value mutably, marking the handle dirty so the entry is
    /// promoted on drop, even if the reference is never written through.
    pub fn value_mut(&mut self) -> &mut V {
        self.dirty = true;
        &mut self.cache.slots[self.index].value
    }
}

impl<K, V> Drop for PeekMut<'_, K, V> {
    fn drop(&mut self) {
        if self.dirty {
            self.cache.touch(self.index, false);
        }
    }
}

impl<K, V> Deref for PeekMut<'_, K, V> {
    type Target = V;

    fn deref(&self) -> &V {
        self.value()
    }
}

impl<K, V> DerefMut for PeekMut<'_, K, V> {
    fn deref_mut(&mut self) -> &mut V {
        self.value_mut()
    }
}

impl<K, V> AsRef<V> for PeekMut<'_, K, V> {
    fn as_ref(&self) -> &V {
        self.value()
    }
}

impl<K, V> AsMut<V> for PeekMut<'_, K, V> {
    fn as_mut(&mut self) -> &mut V {
        self.value_mut()
    }
}

use std::fmt;
use std::hash::Hash;

use crate::ResourceCache;

/// A capability that produces the value for a key, or reports absence.
///
/// The cache calls a loader only on a miss. A loader must tolerate being
/// called repeatedly for the same still-absent key: failed loads are never
/// cached, so every subsequent miss retries it.
///
/// Any `FnMut(&K) -> Option<V>` is a loader, which covers most uses.
/// Implement the trait directly when the loader carries state of its own,
/// such as a handle to the backend it reads from.
pub trait Loader<K, V> {
    /// Produces the value for `key`, or `None` if the resource cannot be
    /// produced.
    fn load(&mut self, key: &K) -> Option<V>;
}

impl<K, V, F> Loader<K, V> for F
where
    F: FnMut(&K) -> Option<V>,
{
    fn load(&mut self, key: &K) -> Option<V> {
        self(key)
    }
}

/// A [`ResourceCache`] with its loader bound at construction.
///
/// Where [`ResourceCache::get_or_load`] takes the loader per call, a
/// `LoadingCache` owns one [`Loader`] and routes every [`load`](Self::load)
/// through it. A load failure emits a warning through the `log` facade and
/// returns `None`; nothing is cached for the key.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
///
/// use rescache::LoadingCache;
///
/// let disk: HashMap<&str, &str> = [("greeting", "hello")].into();
/// let mut cache = LoadingCache::new(8, move |key: &&str| disk.get(key).copied());
///
/// assert_eq!(cache.load("greeting"), Some(&"hello"));
/// assert_eq!(cache.load("missing"), None);
/// assert_eq!(cache.len(), 1);
/// ```
pub struct LoadingCache<K, V, L> {
    cache: ResourceCache<K, V>,
    loader: L,
}

impl<K, V, L> LoadingCache<K, V, L>
where
    K: Hash + Eq + fmt::Debug,
    L: Loader<K, V>,
{
    /// Creates a cache holding at most `capacity` entries (clamped to at
    /// least 1), loading misses through `loader`.
    pub fn new(capacity: usize, loader: L) -> Self {
        Self {
            cache: ResourceCache::new(capacity),
            loader,
        }
    }

    /// Returns the cached value for `key`, loading it on a miss.
    ///
    /// A hit promotes the entry without calling the loader. On a miss the
    /// bound loader runs; absence is logged as a warning and returned as
    /// `None`, leaving the cache unchanged.
    pub fn load(&mut self, key: K) -> Option<&V> {
        let loader = &mut self.loader;
        self.cache.get_or_load(key, |key| {
            let value = loader.load(key);
            if value.is_none() {
                log::warn!("failed to load resource: {key:?}");
            }
            value
        })
    }

    /// Returns `true` if the cache holds an entry for `key`, without
    /// touching its recency position.
    pub fn contains_key(&self, key: &K) -> bool {
        self.cache.contains_key(key)
    }

    /// Returns the number of entries currently held.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Returns the maximum number of entries the cache can hold.
    pub fn capacity(&self) -> usize {
        self.cache.capacity()
    }

    /// Removes all entries. The bound loader is unaffected.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Borrows the underlying cache.
    pub fn cache(&self) -> &ResourceCache<K, V> {
        &self.cache
    }

    /// Mutably borrows the underlying cache, e.g. to pre-seed entries with
    /// [`ResourceCache::insert`].
    pub fn cache_mut(&mut self) -> &mut ResourceCache<K, V> {
        &mut self.cache
    }

    /// Consumes the wrapper, returning the cache and the loader.
    pub fn into_parts(self) -> (ResourceCache<K, V>, L) {
        (self.cache, self.loader)
    }
}

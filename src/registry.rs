use indexmap::IndexMap;

use crate::{cache::DEFAULT_CAPACITY, RandomState, ResourceCache};

/// A named set of caches sharing one value type and one lifecycle.
///
/// Applications that cache several kinds of resources (icons, prefabs,
/// audio clips) typically want one bounded cache per kind, sized for that
/// kind's workload, all dropped together at a well-defined reset boundary
/// (a scene change, a session restart, a hot reload). A `CacheRegistry`
/// owns those caches as named groups, so the set travels through the
/// program as an explicit value instead of hidden module-level state.
///
/// Groups are keyed by name and hold `ResourceCache<String, V>` instances.
/// [`get_or_load`](Self::get_or_load) creates a group on first use with the
/// registry's default capacity; [`register`](Self::register) sets an
/// explicit capacity up front.
///
/// # Examples
///
/// ```
/// use rescache::CacheRegistry;
///
/// let mut sounds = CacheRegistry::new();
/// sounds.register("ui", 10);
/// sounds.register("ambient", 20);
///
/// let click = sounds.get_or_load("ui", "click", |_| Some(vec![0u8; 128]));
/// assert!(click.is_some());
/// assert_eq!(sounds.group("ui").unwrap().len(), 1);
///
/// // Reset boundary: every group is emptied, registrations survive.
/// sounds.reset();
/// assert_eq!(sounds.group("ui").unwrap().len(), 0);
/// assert_eq!(sounds.group("ui").unwrap().capacity(), 10);
/// ```
pub struct CacheRegistry<V> {
    groups: IndexMap<String, ResourceCache<String, V>, RandomState>,
    default_capacity: usize,
}

impl<V> CacheRegistry<V> {
    /// Creates an empty registry whose auto-created groups hold
    /// [`DEFAULT_CAPACITY`](crate::DEFAULT_CAPACITY) entries.
    pub fn new() -> Self {
        Self::with_default_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty registry with the given capacity for auto-created
    /// groups (clamped to at least 1 when a group is built).
    pub fn with_default_capacity(default_capacity: usize) -> Self {
        Self {
            groups: IndexMap::default(),
            default_capacity,
        }
    }

    /// Registers a group with an explicit capacity, returning its cache.
    ///
    /// Re-registering an existing name replaces the group with a fresh,
    /// empty cache at the new capacity.
    pub fn register(&mut self, name: impl Into<String>, capacity: usize) -> &mut ResourceCache<String, V> {
        let (index, _) = self
            .groups
            .insert_full(name.into(), ResourceCache::new(capacity));
        &mut self.groups[index]
    }

    /// Borrows a group's cache, if registered.
    pub fn group(&self, name: &str) -> Option<&ResourceCache<String, V>> {
        self.groups.get(name)
    }

    /// Mutably borrows a group's cache, if registered.
    pub fn group_mut(&mut self, name: &str) -> Option<&mut ResourceCache<String, V>> {
        self.groups.get_mut(name)
    }

    /// Returns the cached value for `key` in `group`, loading it on a
    /// miss.
    ///
    /// The group is created with the registry's default capacity if it was
    /// never registered. Load semantics match
    /// [`ResourceCache::get_or_load`]; a failed load additionally emits a
    /// warning naming the group and key.
    pub fn get_or_load<F>(&mut self, group: &str, key: &str, load: F) -> Option<&V>
    where
        F: FnOnce(&str) -> Option<V>,
    {
        let default_capacity = self.default_capacity;
        let cache = match self.groups.get_index_of(group) {
            Some(index) => &mut self.groups[index],
            None => self.register(group, default_capacity),
        };
        cache.get_or_load(key.to_owned(), |key| {
            let value = load(key);
            if value.is_none() {
                log::warn!("failed to load resource: {group}/{key}");
            }
            value
        })
    }

    /// Clears every group's entries. Group registrations and capacities
    /// are kept.
    ///
    /// This is the lifecycle-reset hook: call it at the application's
    /// restart boundary instead of recreating the registry.
    pub fn reset(&mut self) {
        for cache in self.groups.values_mut() {
            cache.clear();
        }
    }

    /// Returns the names of all registered groups, in registration order.
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Returns the number of registered groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` if no groups are registered.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl<V> Default for CacheRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::CacheRegistry;

    #[test]
    fn register_and_lookup() {
        let mut registry = CacheRegistry::<i32>::new();
        registry.register("icons", 10);
        registry.register("clips", 20);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.group("icons").unwrap().capacity(), 10);
        assert_eq!(registry.group("clips").unwrap().capacity(), 20);
        assert!(registry.group("meshes").is_none());
        assert_eq!(
            registry.group_names().collect::<Vec<_>>(),
            ["icons", "clips"]
        );
    }

    #[test]
    fn get_or_load_auto_registers() {
        let mut registry = CacheRegistry::with_default_capacity(5);

        let value = registry.get_or_load("icons", "save", |_| Some(1));
        assert_eq!(value, Some(&1));
        assert_eq!(registry.group("icons").unwrap().capacity(), 5);
    }

    #[test]
    fn groups_evict_independently() {
        let mut registry = CacheRegistry::new();
        registry.register("small", 1);
        registry.register("large", 3);

        registry.get_or_load("small", "a", |_| Some(1));
        registry.get_or_load("small", "b", |_| Some(2));
        registry.get_or_load("large", "a", |_| Some(3));
        registry.get_or_load("large", "b", |_| Some(4));

        let small = registry.group("small").unwrap();
        assert!(!small.contains_key(&"a".to_string()));
        assert!(small.contains_key(&"b".to_string()));

        let large = registry.group("large").unwrap();
        assert!(large.contains_key(&"a".to_string()));
        assert!(large.contains_key(&"b".to_string()));
    }

    #[test]
    fn failed_load_caches_nothing() {
        let mut registry = CacheRegistry::<i32>::new();

        assert_eq!(registry.get_or_load("icons", "save", |_| None), None);
        assert_eq!(registry.group("icons").unwrap().len(), 0);

        // The group exists now, but the key is still loadable later.
        assert_eq!(registry.get_or_load("icons", "save", |_| Some(2)), Some(&2));
    }

    #[test]
    fn reset_clears_all_groups() {
        let mut registry = CacheRegistry::new();
        registry.register("icons", 4);
        registry.register("clips", 4);
        registry.get_or_load("icons", "a", |_| Some(1));
        registry.get_or_load("clips", "b", |_| Some(2));

        registry.reset();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.group("icons").unwrap().len(), 0);
        assert_eq!(registry.group("clips").unwrap().len(), 0);
        assert_eq!(registry.group("icons").unwrap().capacity(), 4);
    }

    #[test]
    fn reregistering_replaces_group() {
        let mut registry = CacheRegistry::new();
        registry.register("icons", 2);
        registry.get_or_load("icons", "a", |_| Some(1));

        registry.register("icons", 8);

        let icons = registry.group("icons").unwrap();
        assert_eq!(icons.len(), 0);
        assert_eq!(icons.capacity(), 8);
        assert_eq!(registry.len(), 1);
    }
}

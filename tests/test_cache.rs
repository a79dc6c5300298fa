use rescache::ResourceCache;

#[test]
fn new_cache_is_empty() {
    let cache = ResourceCache::<i32, String>::new(3);
    assert_eq!(cache.len(), 0);
    assert!(cache.is_empty());
    assert_eq!(cache.capacity(), 3);
    assert_eq!(cache.into_iter().collect::<Vec<_>>(), vec![]);
}

#[test]
fn zero_capacity_is_clamped() {
    let mut cache = ResourceCache::new(0);
    assert_eq!(cache.capacity(), 1);

    cache.insert("a", 1);
    cache.insert("b", 2);
    assert_eq!(cache.len(), 1);
    assert!(cache.contains_key(&"b"));
}

#[test]
fn count_stays_within_capacity() {
    let mut cache = ResourceCache::new(3);

    for i in 0..20 {
        cache.get_or_load(i, |&key| Some(key * 10));
        assert!(cache.len() <= cache.capacity());
        cache.get(&(i / 2));
        assert!(cache.len() <= cache.capacity());
    }
}

#[test]
fn overfill_evicts_first_inserted() {
    let mut cache = ResourceCache::new(4);

    for i in 1..=5 {
        cache.insert(i, i.to_string());
    }

    assert!(!cache.contains_key(&1));
    for i in 2..=5 {
        assert!(cache.contains_key(&i));
    }
    assert_eq!(cache.len(), 4);
}

#[test]
fn hit_refreshes_against_eviction() {
    let mut cache = ResourceCache::new(2);

    cache.get_or_load("a", |_| Some(1));
    cache.get_or_load("b", |_| Some(2));

    // The hit makes "a" most recently used, so "b" is the one to go.
    assert_eq!(cache.get_or_load("a", |_| None), Some(&1));
    cache.get_or_load("c", |_| Some(3));

    assert!(cache.contains_key(&"a"));
    assert!(!cache.contains_key(&"b"));
    assert!(cache.contains_key(&"c"));
}

#[test]
fn presence_checks_never_reorder() {
    let mut cache = ResourceCache::new(2);
    cache.insert("a", 1);
    cache.insert("b", 2);

    for _ in 0..50 {
        assert!(cache.contains_key(&"a"));
        assert!(cache.contains_key(&"b"));
        assert_eq!(cache.len(), 2);
    }

    // "a" is still the eviction candidate.
    cache.insert("c", 3);
    assert!(!cache.contains_key(&"a"));
}

#[test]
fn failed_load_leaves_no_residue() {
    let mut cache = ResourceCache::<&str, i32>::new(2);

    assert_eq!(cache.get_or_load("a", |_| None), None);
    assert_eq!(cache.len(), 0);
    assert!(!cache.contains_key(&"a"));

    // A later loader that succeeds admits the key normally.
    assert_eq!(cache.get_or_load("a", |_| Some(42)), Some(&42));
    assert_eq!(cache.len(), 1);
}

#[test]
fn clear_removes_every_key() {
    let mut cache = ResourceCache::new(3);
    let keys = ["a", "b", "c"];
    for key in keys {
        cache.insert(key, key.len());
    }

    cache.clear();

    assert_eq!(cache.len(), 0);
    for key in keys {
        assert!(!cache.contains_key(&key));
    }
}

#[test]
fn eviction_scenario_with_mixed_hits() {
    let mut cache = ResourceCache::new(3);

    for key in ["a", "b", "c"] {
        assert!(cache.get_or_load(key, |_| Some(1)).is_some());
    }
    assert_eq!(cache.len(), 3);
    assert!(cache.contains_key(&"a"));
    assert!(cache.contains_key(&"b"));
    assert!(cache.contains_key(&"c"));

    cache.get_or_load("d", |_| Some(1));
    assert!(!cache.contains_key(&"a"));
    assert_eq!(cache.len(), 3);

    // Touch "b", admit "e": among b (touched), d, e the oldest is "c".
    cache.get_or_load("b", |_| None);
    cache.get_or_load("e", |_| Some(1));

    assert!(!cache.contains_key(&"c"));
    assert!(cache.contains_key(&"b"));
    assert!(cache.contains_key(&"d"));
    assert!(cache.contains_key(&"e"));
}

#[test]
fn loader_runs_once_per_admission() {
    let mut cache = ResourceCache::new(8);
    let mut calls = 0;

    for _ in 0..5 {
        cache.get_or_load("asset", |_| {
            calls += 1;
            Some(1)
        });
    }

    assert_eq!(calls, 1);
}

#[test]
fn loader_reruns_after_eviction() {
    let mut cache = ResourceCache::new(1);
    let mut calls = 0;

    cache.get_or_load("a", |_| {
        calls += 1;
        Some(1)
    });
    // Evicts "a".
    cache.get_or_load("b", |_| Some(2));
    cache.get_or_load("a", |_| {
        calls += 1;
        Some(1)
    });

    assert_eq!(calls, 2);
}

#[test]
fn try_get_or_load_error_then_success() {
    let mut cache = ResourceCache::<&str, Vec<u8>>::new(2);

    let first: Result<_, String> = cache.try_get_or_load("a", |key| Err(format!("io: {key}")));
    assert_eq!(first, Err("io: a".to_string()));
    assert!(cache.is_empty());

    let second: Result<_, String> = cache.try_get_or_load("a", |_| Ok(Some(vec![1])));
    assert_eq!(second, Ok(Some(&vec![1u8])));
    assert_eq!(cache.len(), 1);
}

#[test]
fn iteration_is_eviction_order() {
    let mut cache = ResourceCache::new(4);
    cache.insert(1, "one");
    cache.insert(2, "two");
    cache.insert(3, "three");
    cache.insert(4, "four");

    cache.get(&2);
    cache.get(&4);
    cache.get(&1);

    assert_eq!(
        cache.into_iter().collect::<Vec<_>>(),
        [(3, "three"), (2, "two"), (4, "four"), (1, "one")]
    );
}

#[test]
fn borrow_iteration_matches_owned() {
    let mut cache = ResourceCache::new(3);
    cache.insert("x", 1);
    cache.insert("y", 2);
    cache.get(&"x");

    let borrowed: Vec<_> = (&cache).into_iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(borrowed, [("y", 2), ("x", 1)]);
    assert_eq!(cache.into_iter().collect::<Vec<_>>(), borrowed);
}

#[test]
fn pop_and_oldest_agree() {
    let mut cache = ResourceCache::new(3);
    cache.insert("a", 1);
    cache.insert("b", 2);
    cache.insert("c", 3);
    cache.get(&"a");

    let expected = cache.oldest().map(|(k, v)| (*k, *v));
    assert_eq!(cache.pop(), expected);
    assert_eq!(cache.oldest().map(|(k, _)| *k), Some("c"));
}

#[test]
fn values_survive_heavy_reuse() {
    let mut cache = ResourceCache::new(10);

    for i in 0..20 {
        cache.insert(i, i * 10);
    }
    assert_eq!(cache.len(), 10);

    for i in 10..20 {
        assert_eq!(cache.get(&i), Some(&(i * 10)));
        if i % 2 == 0 {
            cache.remove(&(i - 10));
        }
    }

    assert!(cache.len() <= 10);
    for i in 15..20 {
        assert!(cache.contains_key(&i));
    }
}

#[test]
fn owned_value_types() {
    let mut cache: ResourceCache<String, Vec<u8>> = ResourceCache::new(2);

    cache.get_or_load("blob/1".to_string(), |_| Some(vec![0u8; 32]));
    cache.get_or_load("blob/2".to_string(), |_| Some(vec![1u8; 32]));

    assert_eq!(cache.peek(&"blob/1".to_string()).map(Vec::len), Some(32));

    cache.get_or_load("blob/3".to_string(), |_| Some(vec![2u8; 32]));
    assert!(!cache.contains_key(&"blob/1".to_string()));
}

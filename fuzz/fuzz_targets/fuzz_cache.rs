#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rescache::ResourceCache;

#[derive(Debug, Arbitrary)]
enum Op {
    Insert(u8, u16),
    Get(u8),
    Peek(u8),
    Contains(u8),
    GetOrLoad(u8, Option<u16>),
    Remove(u8),
    Pop,
    Clear,
}

/// Naive recency model: entries ordered least to most recently used.
struct Model {
    entries: Vec<(u8, u16)>,
    capacity: usize,
}

impl Model {
    fn position(&self, key: u8) -> Option<usize> {
        self.entries.iter().position(|&(k, _)| k == key)
    }

    fn touch(&mut self, key: u8) -> Option<u16> {
        let index = self.position(key)?;
        let entry = self.entries.remove(index);
        self.entries.push(entry);
        Some(entry.1)
    }

    fn admit(&mut self, key: u8, value: u16) {
        self.entries.push((key, value));
        if self.entries.len() > self.capacity {
            self.entries.remove(0);
        }
    }

    fn insert(&mut self, key: u8, value: u16) {
        if let Some(index) = self.position(key) {
            self.entries[index].1 = value;
            self.touch(key);
        } else {
            self.admit(key, value);
        }
    }

    fn remove(&mut self, key: u8) -> Option<u16> {
        let index = self.position(key)?;
        Some(self.entries.remove(index).1)
    }
}

fuzz_target!(|data: (u8, Vec<Op>)| {
    let (capacity_raw, ops) = data;

    let capacity = ((capacity_raw % 5) as usize).max(1);
    let mut cache = ResourceCache::new(capacity);
    let mut model = Model {
        entries: Vec::new(),
        capacity,
    };

    for op in ops {
        match op {
            Op::Insert(key, value) => {
                cache.insert(key, value);
                model.insert(key, value);
                assert_eq!(cache.peek(&key), Some(&value));
            }
            Op::Get(key) => {
                let got = cache.get(&key).copied();
                assert_eq!(got, model.touch(key));
            }
            Op::Peek(key) => {
                let peeked = cache.peek(&key).copied();
                assert_eq!(peeked, model.position(key).map(|i| model.entries[i].1));
            }
            Op::Contains(key) => {
                assert_eq!(cache.contains_key(&key), model.position(key).is_some());
            }
            Op::GetOrLoad(key, loaded) => {
                let expected = match model.touch(key) {
                    Some(value) => Some(value),
                    None => {
                        if let Some(value) = loaded {
                            model.admit(key, value);
                        }
                        loaded
                    }
                };
                let got = cache.get_or_load(key, |_| loaded).copied();
                assert_eq!(got, expected);
            }
            Op::Remove(key) => {
                assert_eq!(cache.remove(&key), model.remove(key));
            }
            Op::Pop => {
                let expected = if model.entries.is_empty() {
                    None
                } else {
                    Some(model.entries.remove(0))
                };
                assert_eq!(cache.pop(), expected);
            }
            Op::Clear => {
                cache.clear();
                model.entries.clear();
            }
        }

        assert!(cache.len() <= cache.capacity());
        assert_eq!(cache.capacity(), capacity);
        assert_eq!(cache.len(), model.entries.len());
        assert_eq!(cache.is_empty(), model.entries.is_empty());

        let order: Vec<(u8, u16)> = cache.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(order, model.entries);

        assert_eq!(
            cache.oldest().map(|(k, v)| (*k, *v)),
            model.entries.first().copied()
        );
    }
});

//! HandlerCache - request 型ごとの dispatch plan をメモ化
//!
//! # 学習ポイント
//! - `TypeId` キー + `Arc<dyn Any>` 値による異種型キャッシュ
//! - 読み取りは共有ロック、初回作成だけ排他ロック
//! - factory はロックの外で評価（同時初回アクセスでは複数回評価されうる）

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

type Entry = Arc<dyn Any + Send + Sync>;

/// (key type, value type). Two value types under one key never collide.
type CacheKey = (TypeId, TypeId);

/// HandlerCache is process-scoped dispatch state owned by the mediator.
///
/// - Entries are created once per (key type, value type) and never evicted.
/// - Concurrent first access may evaluate the factory more than once, but
///   only the first inserted value is kept and every caller gets that one.
#[derive(Default)]
pub struct HandlerCache {
    entries: RwLock<HashMap<CacheKey, Entry>>,
}

impl HandlerCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Get the `V` cached for key type `K`, creating it with `factory` on
    /// first use.
    pub fn get_or_create<K, V, F>(&self, factory: F) -> Arc<V>
    where
        K: ?Sized + 'static,
        V: Send + Sync + 'static,
        F: FnOnce() -> V,
    {
        let key = (TypeId::of::<K>(), TypeId::of::<V>());

        let hit = self.entries.read().get(&key).cloned();
        if let Some(hit) = hit.and_then(|entry| entry.downcast::<V>().ok()) {
            return hit;
        }

        let created = Arc::new(factory());
        let mut entries = self.entries.write();
        let stored = Arc::clone(
            entries
                .entry(key)
                .or_insert_with(|| Arc::clone(&created) as Entry),
        );
        drop(entries);
        // the entry under this key always holds a `V`
        stored.downcast::<V>().unwrap_or(created)
    }

    /// True when anything is cached under key type `K`.
    pub fn contains<K: ?Sized + 'static>(&self) -> bool {
        let key = TypeId::of::<K>();
        self.entries.read().keys().any(|(k, _)| *k == key)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    struct A;
    struct B;

    #[test]
    fn repeated_lookups_return_the_same_value() {
        let cache = HandlerCache::new();
        let calls = AtomicUsize::new(0);

        let first = cache.get_or_create::<A, _, _>(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            String::from("plan-a")
        });
        let second = cache.get_or_create::<A, _, _>(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            String::from("other")
        });

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*second, "plan-a");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn keys_are_independent() {
        let cache = HandlerCache::new();
        let a = cache.get_or_create::<A, _, _>(|| 1u32);
        let b = cache.get_or_create::<B, _, _>(|| 2u32);

        assert_eq!((*a, *b), (1, 2));
        assert_eq!(cache.len(), 2);
        assert!(cache.contains::<A>());
        assert!(!cache.contains::<String>());
    }

    #[test]
    fn value_types_under_one_key_stay_independent() {
        let cache = HandlerCache::new();
        let text = cache.get_or_create::<A, _, _>(|| String::from("caller data"));
        let number = cache.get_or_create::<A, _, _>(|| 7u32);

        assert_eq!(*text, "caller data");
        assert_eq!(*number, 7);
        assert_eq!(cache.len(), 2);
        assert!(Arc::ptr_eq(&number, &cache.get_or_create::<A, _, _>(|| 0u32)));
    }

    #[test]
    fn concurrent_first_access_agrees_on_one_value() {
        const THREADS: usize = 16;
        let cache = Arc::new(HandlerCache::new());
        let barrier = Arc::new(Barrier::new(THREADS));
        let built = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..THREADS)
            .map(|i| {
                let cache = Arc::clone(&cache);
                let barrier = Arc::clone(&barrier);
                let built = Arc::clone(&built);
                thread::spawn(move || {
                    barrier.wait();
                    cache.get_or_create::<A, _, _>(|| {
                        built.fetch_add(1, Ordering::SeqCst);
                        i
                    })
                })
            })
            .collect();

        let results: Vec<Arc<usize>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert!(built.load(Ordering::SeqCst) >= 1);
        assert!(results.iter().all(|r| Arc::ptr_eq(r, &results[0])));
        assert_eq!(cache.len(), 1);
    }
}

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::RwLock;

/// Entity classes that receive allocator-issued identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityClass {
    Plane,
    Flight,
    Customer,
    Reservation,
}

/// Issues unique, strictly increasing integer ids per entity class.
///
/// Each class gets its own atomic counter, so `next` is a single
/// `fetch_add` — never a read of the current maximum followed by a write,
/// which races under concurrent callers.
pub struct SequenceAllocator {
    counters: RwLock<HashMap<EntityClass, AtomicI64>>,
}

impl SequenceAllocator {
    pub fn new() -> Self {
        Self {
            counters: RwLock::new(HashMap::new()),
        }
    }

    /// Next id for the given class, strictly greater than every id
    /// previously issued for that class.
    pub fn next(&self, class: EntityClass) -> i64 {
        {
            // A poisoned lock still holds valid counters.
            let counters = self.counters.read().unwrap_or_else(|e| e.into_inner());
            if let Some(counter) = counters.get(&class) {
                return counter.fetch_add(1, Ordering::SeqCst) + 1;
            }
        }

        let mut counters = self.counters.write().unwrap_or_else(|e| e.into_inner());
        let counter = counters.entry(class).or_insert_with(|| AtomicI64::new(0));
        counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Highest id issued so far for the class, 0 if none.
    pub fn current(&self, class: EntityClass) -> i64 {
        let counters = self.counters.read().unwrap_or_else(|e| e.into_inner());
        counters
            .get(&class)
            .map(|counter| counter.load(Ordering::SeqCst))
            .unwrap_or(0)
    }
}

impl Default for SequenceAllocator {
    fn default() -> Self {
        Self::new()
    }
}

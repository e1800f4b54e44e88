//! Memoization of derivation steps.

use crate::{derivation::CkdFunction, error::Result};
use log::trace;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::{
    collections::HashMap,
    hash::{Hash, Hasher},
    ptr,
    sync::Arc,
};

/// A parent instance and a child index. Parents are compared by identity, so
/// two equal nodes held in different `Arc`s are cached separately. Holding the
/// `Arc` keeps the address from being reused while the entry exists.
struct CacheKey<N> {
    parent: Arc<N>,
    index: u32,
}

impl<N> PartialEq for CacheKey<N> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.parent, &other.parent) && self.index == other.index
    }
}

impl<N> Eq for CacheKey<N> {}

impl<N> Hash for CacheKey<N> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        ptr::hash(Arc::as_ptr(&self.parent), state);
        self.index.hash(state);
    }
}

type Slot<N> = Arc<OnceCell<Arc<N>>>;

/// Wraps a [`CkdFunction`] and returns the same child instance for repeated
/// `(parent, index)` requests.
///
/// Each pair is computed at most once, even when several threads ask for it
/// at the same time: the map lock is only held to find the pair's slot, and
/// the slot itself blocks latecomers until the first computation finishes.
/// Failed derivations are not cached. Entries are never evicted.
pub struct DerivationCache<N, F> {
    inner: F,
    slots: Mutex<HashMap<CacheKey<N>, Slot<N>>>,
}

impl<N, F> DerivationCache<N, F> {
    pub fn new(inner: F) -> Self {
        DerivationCache {
            inner,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }

    /// Number of `(parent, index)` pairs seen so far.
    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, parent: &Arc<N>, index: u32) -> Slot<N> {
        let key = CacheKey {
            parent: Arc::clone(parent),
            index,
        };
        Arc::clone(self.slots.lock().entry(key).or_default())
    }
}

impl<N, F: Default> Default for DerivationCache<N, F> {
    fn default() -> Self {
        DerivationCache::new(F::default())
    }
}

impl<N, F: CkdFunction<N>> CkdFunction<N> for DerivationCache<N, F> {
    fn derive_child(&self, parent: &Arc<N>, index: u32) -> Result<Arc<N>> {
        let slot = self.slot(parent, index);
        if let Some(child) = slot.get() {
            trace!("cache hit for child {index:#x}");
            return Ok(Arc::clone(child));
        }
        slot.get_or_try_init(|| {
            trace!("cache miss for child {index:#x}");
            self.inner.derive_child(parent, index)
        })
        .map(Arc::clone)
    }
}

//! Deduplicate concurrent fetches for the same key.
//!
//! Expensive `get` operations (network calls, disk reads, decodes) are easy
//! to issue twice: two callers ask for the same key while the first fetch is
//! still in flight. [`Pool`] keeps a map of in-flight futures per key, so
//! every caller that arrives during the window is handed the exact same
//! future, and the wrapped level sees a single fetch whose one outcome fans
//! out to all of them.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use strata_core::{CacheLevel, SharedFuture};
use tracing::trace;

mod layer;

pub use self::layer::PoolLayer;

type InFlight<L> =
    Arc<Mutex<HashMap<<L as CacheLevel>::Key, SharedFuture<<L as CacheLevel>::Value>>>>;

/// A [`CacheLevel`] decorator that pools concurrent `get` calls per key.
///
/// While a fetch for a key is outstanding, every `get` for that key returns
/// the in-flight [`SharedFuture`] instead of starting a new fetch. Once the
/// future reaches any terminal state (success, failure or cancellation),
/// the slot is released and the next `get` fetches afresh.
///
/// The in-flight map is the pool's only shared mutable state and is guarded
/// by a single mutex per pool instance; lookup, insertion and removal all
/// serialize through it. `set`, `clear` and `memory_warning` pass straight
/// through to the wrapped level, and `clear` does not disturb in-flight
/// entries.
///
/// Clones of a `Pool` share the same in-flight map, so a cloned handle still
/// deduplicates against its siblings.
pub struct Pool<L: CacheLevel> {
    inner: L,
    in_flight: InFlight<L>,
}

// ===== impl Pool =====

impl<L: CacheLevel> Pool<L> {
    /// Wraps `inner`, pooling its concurrent same-key fetches.
    pub fn new(inner: L) -> Self {
        Pool {
            inner,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Gets a reference to the wrapped level.
    pub fn get_ref(&self) -> &L {
        &self.inner
    }

    /// Consumes `self`, returning the wrapped level.
    pub fn into_inner(self) -> L {
        self.inner
    }
}

impl<L: CacheLevel> CacheLevel for Pool<L> {
    type Key = L::Key;
    type Value = L::Value;

    fn get(&self, key: Self::Key) -> SharedFuture<Self::Value> {
        let future = {
            let mut in_flight = self.in_flight.lock().unwrap();
            if let Some(future) = in_flight.get(&key) {
                trace!("fetch already in flight, joining it");
                return future.clone();
            }

            // Fetch and insert under the same lock, so a caller racing this
            // one either sees the entry or is the one to create it.
            let future = self.inner.get(key.clone());
            in_flight.insert(key.clone(), future.clone());
            trace!("fetch started, pool slot taken");
            future
        };

        // Release the slot on any terminal state, cancellation included,
        // so the next caller fetches afresh. If the fetch resolved while
        // the map lock was still held above, this fires right here.
        let slots = Arc::clone(&self.in_flight);
        future.on_completion(move |_| {
            slots.lock().unwrap().remove(&key);
            trace!("fetch finished, pool slot released");
        })
    }

    fn set(&self, value: Self::Value, key: Self::Key) {
        self.inner.set(value, key)
    }

    fn clear(&self) {
        self.inner.clear()
    }

    fn memory_warning(&self) {
        self.inner.memory_warning()
    }
}

impl<L: CacheLevel + Clone> Clone for Pool<L> {
    fn clone(&self) -> Self {
        Pool {
            inner: self.inner.clone(),
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

impl<L: CacheLevel + fmt::Debug> fmt::Debug for Pool<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool").field("inner", &self.inner).finish()
    }
}

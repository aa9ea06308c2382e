//! Definition of the core `CacheLevel` trait.

use std::hash::Hash;
use std::sync::Arc;

use crate::future::SharedFuture;

/// An asynchronous key-value cache capability.
///
/// A `CacheLevel` is the unit of composition for a cache stack: a concrete
/// backend (memory, disk, network) implements it directly, and decorators
/// implement it by wrapping another level. A composed stack is itself a
/// `CacheLevel`, so callers never care how many layers sit between them and
/// the data.
///
/// # Contract
///
/// * [`get`] returns immediately with a [`SharedFuture`] that later resolves
///   with the value for the key or fails with a backend error. Absence of a
///   key is a failure, never a null value.
/// * [`set`] is a best-effort, fire-and-forget write; failures are a
///   backend concern and are not surfaced to the caller.
/// * [`clear`] purges stored values. Futures already handed out by `get`
///   are unaffected.
/// * [`memory_warning`] signals memory pressure. Decorators forward it
///   unconditionally to the wrapped level, which may evict in-memory state.
///
/// All methods take `&self`: a level must tolerate concurrent calls, using
/// whatever internal synchronization it needs.
///
/// [`get`]: CacheLevel::get
/// [`set`]: CacheLevel::set
/// [`clear`]: CacheLevel::clear
/// [`memory_warning`]: CacheLevel::memory_warning
pub trait CacheLevel {
    /// Keys this level is addressed by.
    type Key: Eq + Hash + Clone + Send + 'static;

    /// Values this level produces and stores.
    ///
    /// Values are cloned into every observer of a fetch; wrap expensive
    /// payloads in [`Arc`].
    type Value: Clone + Send + 'static;

    /// Asynchronously fetches the value associated with `key`.
    fn get(&self, key: Self::Key) -> SharedFuture<Self::Value>;

    /// Stores `value` under `key`, best effort.
    fn set(&self, value: Self::Value, key: Self::Key);

    /// Purges all stored values.
    fn clear(&self);

    /// Notifies the level that the system is under memory pressure.
    fn memory_warning(&self);
}

impl<'a, L: CacheLevel + ?Sized> CacheLevel for &'a L {
    type Key = L::Key;
    type Value = L::Value;

    fn get(&self, key: Self::Key) -> SharedFuture<Self::Value> {
        (**self).get(key)
    }

    fn set(&self, value: Self::Value, key: Self::Key) {
        (**self).set(value, key)
    }

    fn clear(&self) {
        (**self).clear()
    }

    fn memory_warning(&self) {
        (**self).memory_warning()
    }
}

impl<L: CacheLevel + ?Sized> CacheLevel for Box<L> {
    type Key = L::Key;
    type Value = L::Value;

    fn get(&self, key: Self::Key) -> SharedFuture<Self::Value> {
        (**self).get(key)
    }

    fn set(&self, value: Self::Value, key: Self::Key) {
        (**self).set(value, key)
    }

    fn clear(&self) {
        (**self).clear()
    }

    fn memory_warning(&self) {
        (**self).memory_warning()
    }
}

impl<L: CacheLevel + ?Sized> CacheLevel for Arc<L> {
    type Key = L::Key;
    type Value = L::Value;

    fn get(&self, key: Self::Key) -> SharedFuture<Self::Value> {
        (**self).get(key)
    }

    fn set(&self, value: Self::Value, key: Self::Key) {
        (**self).set(value, key)
    }

    fn clear(&self) {
        (**self).clear()
    }

    fn memory_warning(&self) {
        (**self).memory_warning()
    }
}

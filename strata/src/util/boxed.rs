use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use strata_core::{CacheLevel, SharedFuture};

/// A type-erased, shareable [`CacheLevel`].
///
/// Composed stacks grow a type parameter per decorator; `BoxCacheLevel`
/// erases the stack down to its key and value types, so differently
/// composed stacks can live in the same field or collection. Cloning the
/// handle shares the underlying stack.
pub struct BoxCacheLevel<K, V> {
    inner: Arc<dyn CacheLevel<Key = K, Value = V> + Send + Sync>,
}

impl<K, V> BoxCacheLevel<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    /// Erases the concrete type of the given level.
    pub fn new<L>(level: L) -> Self
    where
        L: CacheLevel<Key = K, Value = V> + Send + Sync + 'static,
    {
        BoxCacheLevel {
            inner: Arc::new(level),
        }
    }
}

impl<K, V> CacheLevel for BoxCacheLevel<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    type Key = K;
    type Value = V;

    fn get(&self, key: K) -> SharedFuture<V> {
        self.inner.get(key)
    }

    fn set(&self, value: V, key: K) {
        self.inner.set(value, key)
    }

    fn clear(&self) {
        self.inner.clear()
    }

    fn memory_warning(&self) {
        self.inner.memory_warning()
    }
}

impl<K, V> Clone for BoxCacheLevel<K, V> {
    fn clone(&self) -> Self {
        BoxCacheLevel {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> fmt::Debug for BoxCacheLevel<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxCacheLevel").finish()
    }
}

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use strata_core::{CacheLevel, SharedFuture};

/// Returns a new [`LevelFn`] with the given fetch closure.
///
/// The resulting level answers `get` by calling the closure; `set`, `clear`
/// and `memory_warning` are no-ops. This is how a raw fetch function (a
/// network call, a decode) enters a cache stack and picks up decorators
/// like pooling or conditioning.
///
/// # Examples
///
/// ```
/// use strata::{level_fn, CacheLevel, SharedFuture};
///
/// let length = level_fn(|key: String| SharedFuture::succeeded(key.len()));
///
/// length.get("hello".to_string()).on_success(|len| assert_eq!(len, 5));
/// ```
pub fn level_fn<F, K, V>(f: F) -> LevelFn<F, K, V>
where
    F: Fn(K) -> SharedFuture<V>,
{
    LevelFn {
        f,
        _marker: PhantomData,
    }
}

/// A [`CacheLevel`] implemented by a fetch closure.
///
/// See [`level_fn`] for more details.
#[derive(Copy, Clone)]
pub struct LevelFn<F, K, V> {
    f: F,
    _marker: PhantomData<fn(K) -> V>,
}

impl<F, K, V> CacheLevel for LevelFn<F, K, V>
where
    F: Fn(K) -> SharedFuture<V>,
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    type Key = K;
    type Value = V;

    fn get(&self, key: K) -> SharedFuture<V> {
        (self.f)(key)
    }

    fn set(&self, _value: V, _key: K) {}

    fn clear(&self) {}

    fn memory_warning(&self) {}
}

impl<F, K, V> fmt::Debug for LevelFn<F, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LevelFn")
            .field("f", &format_args!("<{}>", std::any::type_name::<F>()))
            .finish()
    }
}

use super::Pool;
use std::fmt;
use strata_core::CacheLevel;
use strata_layer::Layer;

/// Pools concurrent same-key fetches to the wrapped level.
///
/// See the module documentation for more details.
#[derive(Clone, Default)]
pub struct PoolLayer {
    _p: (),
}

impl PoolLayer {
    /// Creates a new [`PoolLayer`].
    pub fn new() -> Self {
        PoolLayer { _p: () }
    }
}

impl<L: CacheLevel> Layer<L> for PoolLayer {
    type Level = Pool<L>;

    fn layer(&self, inner: L) -> Self::Level {
        Pool::new(inner)
    }
}

impl fmt::Debug for PoolLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolLayer").finish()
    }
}

//! Builder types to compose layers and cache levels

use crate::conditioned::ConditionedLayer;
use crate::pool::PoolLayer;

use strata_layer::{Identity, Layer, Stack};

use std::fmt;

/// Declaratively construct cache stacks.
///
/// `CacheBuilder` provides a builder-like interface for composing layers to
/// be applied to a backend level.
///
/// # Order
///
/// The order in which layers are added impacts how `get` calls are
/// handled. Layers that are added first see the `get` first; the argument
/// to [`level`] is last to see it.
///
/// ```
/// # use strata::{level_fn, CacheBuilder, SharedFuture};
/// # let backend = level_fn(|key: String| SharedFuture::succeeded(key));
/// CacheBuilder::new()
///     .pooled()
///     .conditioned(|key: &String| SharedFuture::succeeded(!key.is_empty()))
///     .level(backend)
/// # ;
/// ```
///
/// In the example above callers are deduplicated first, and only a pool
/// miss consults the condition. Reversing the two lines gates every
/// caller individually before any pooling happens.
///
/// [`level`]: CacheBuilder::level
#[derive(Clone)]
pub struct CacheBuilder<L> {
    layer: L,
}

impl CacheBuilder<Identity> {
    /// Create a new `CacheBuilder`.
    pub fn new() -> Self {
        CacheBuilder {
            layer: Identity::new(),
        }
    }
}

impl<L> CacheBuilder<L> {
    /// Add a new layer `T` into the `CacheBuilder`.
    pub fn layer<T>(self, layer: T) -> CacheBuilder<Stack<T, L>> {
        CacheBuilder {
            layer: Stack::new(layer, self.layer),
        }
    }

    /// Deduplicate concurrent same-key fetches to the next layer.
    ///
    /// See [`crate::pool`] for more details.
    pub fn pooled(self) -> CacheBuilder<Stack<PoolLayer, L>> {
        self.layer(PoolLayer::new())
    }

    /// Gate fetches to the next layer behind an asynchronous condition.
    ///
    /// See [`crate::conditioned`] for more details.
    pub fn conditioned<C>(self, condition: C) -> CacheBuilder<Stack<ConditionedLayer<C>, L>> {
        self.layer(ConditionedLayer::new(condition))
    }

    /// Wrap the given backend level with the composed layers, returning the
    /// finished stack.
    pub fn level<B>(self, backend: B) -> L::Level
    where
        L: Layer<B>,
    {
        self.layer.layer(backend)
    }
}

impl Default for CacheBuilder<Identity> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: fmt::Debug> fmt::Debug for CacheBuilder<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheBuilder")
            .field("layer", &self.layer)
            .finish()
    }
}

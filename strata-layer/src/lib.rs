#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]
#![forbid(unsafe_code)]

//! Layer traits and extensions.
//!
//! A layer decorates a cache level and provides additional functionality,
//! such as deduplicating in-flight fetches or gating reads behind a
//! condition. It allows that additional functionality to be composed with
//! any level implementation, and for whole stacks of decorators to be built
//! up declaratively.

mod identity;
mod layer_fn;
mod stack;

pub use self::identity::Identity;
pub use self::layer_fn::{layer_fn, LayerFn};
pub use self::stack::Stack;

/// Decorates a cache level, transforming either the keys it is given or the
/// values it produces.
///
/// Often, many of the pieces needed for caching data from a backend source
/// can be divided into distinct pieces of policy: deduplicating concurrent
/// fetches, gating reads behind a predicate, translating keys. The `Layer`
/// trait aims to keep these pieces decoupled from the level that ultimately
/// produces values, so each can be written and tested in isolation and
/// stacked in whatever order an application needs.
pub trait Layer<L> {
    /// The wrapped level.
    type Level;

    /// Wrap the given level with this layer's decorator.
    fn layer(&self, inner: L) -> Self::Level;
}

impl<'a, T, L> Layer<L> for &'a T
where
    T: ?Sized + Layer<L>,
{
    type Level = T::Level;

    fn layer(&self, inner: L) -> Self::Level {
        (**self).layer(inner)
    }
}

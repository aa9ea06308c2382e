//! Various utility types and functions that are generally used with
//! `strata`.

mod boxed;
mod level_fn;

pub use self::boxed::BoxCacheLevel;
pub use self::level_fn::{level_fn, LevelFn};

use crate::conditioned::{Condition, Conditioned};
use crate::pool::Pool;
use strata_core::CacheLevel;

/// An extension trait for `CacheLevel`s that provides a variety of
/// convenient adapters.
pub trait CacheLevelExt: CacheLevel {
    /// Pools concurrent same-key fetches into one underlying fetch.
    ///
    /// See [`Pool`] for more details.
    fn pooled(self) -> Pool<Self>
    where
        Self: Sized,
    {
        Pool::new(self)
    }

    /// Gates fetches behind an asynchronous condition.
    ///
    /// See [`Conditioned`] for more details.
    fn conditioned<C>(self, condition: C) -> Conditioned<Self, C>
    where
        Self: Sized,
        C: Condition<Self::Key>,
    {
        Conditioned::new(self, condition)
    }

    /// Erases this level's concrete type.
    ///
    /// See [`BoxCacheLevel`] for more details.
    fn boxed(self) -> BoxCacheLevel<Self::Key, Self::Value>
    where
        Self: Sized + Send + Sync + 'static,
    {
        BoxCacheLevel::new(self)
    }
}

impl<L: CacheLevel + ?Sized> CacheLevelExt for L {}

#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]
#![forbid(unsafe_code)]

//! `strata` is a library of modular and reusable components for building
//! composable, asynchronous cache stacks.
//!
//! A cache stack is assembled from [`CacheLevel`]s: a concrete backend at
//! the bottom and any number of decorators above it. Decorators only affect
//! [`get`]; `set`, `clear` and memory-pressure signals pass straight
//! through to the backend.
//!
//! The two decorators with real concurrency content are:
//!
//! * [`pool::Pool`] deduplicates concurrent `get` calls for the same key,
//!   so an expensive underlying fetch runs at most once per in-flight key
//!   and its single result fans out to every caller.
//! * [`conditioned::Conditioned`] gates `get` behind an asynchronous
//!   boolean predicate, failing rejected keys with a distinct error without
//!   ever touching the wrapped level.
//!
//! Results travel through [`SharedFuture`]/[`Promise`], a single-assignment
//! cell defined in [`strata_core`]: resolution happens exactly once, and
//! observers registered at any time each see the one terminal outcome.
//!
//! # Examples
//!
//! Composing a deduplicated, gated cache over a raw fetch function:
//!
//! ```
//! use strata::{level_fn, CacheBuilder, CacheLevel, SharedFuture};
//!
//! let backend = level_fn(|key: String| SharedFuture::succeeded(key.len()));
//!
//! let cache = CacheBuilder::new()
//!     .pooled()
//!     .conditioned(|key: &String| SharedFuture::succeeded(!key.is_empty()))
//!     .level(backend);
//!
//! cache.get("hello".to_string()).on_success(|len| assert_eq!(len, 5));
//! ```
//!
//! [`get`]: CacheLevel::get

pub mod builder;
pub mod conditioned;
pub mod pool;
pub mod transform;
pub mod util;

pub mod layer {
    //! A collection of [`Layer`] based utilities.
    //!
    //! [`Layer`]: crate::Layer
    pub use strata_layer::{layer_fn, Identity, Layer, LayerFn, Stack};
}

pub use crate::builder::CacheBuilder;
pub use crate::util::{level_fn, BoxCacheLevel, CacheLevelExt, LevelFn};
pub use strata_core::{BoxError, CacheLevel, Outcome, Promise, SharedError, SharedFuture};
pub use strata_layer::Layer;

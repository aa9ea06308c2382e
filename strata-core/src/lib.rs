#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]
#![forbid(unsafe_code)]

//! Definition of the core contracts for `strata`.
//!
//! These types provide the necessary abstractions for building composable,
//! asynchronous cache stacks. They are simple but powerful and are used as
//! the foundation for the rest of `strata`.
//!
//! * [`SharedFuture`] and [`Promise`] form a single-assignment asynchronous
//!   result cell. A `Promise` is the exclusive writer; any number of
//!   `SharedFuture` handles observe the one terminal outcome, either through
//!   registered callbacks or by being `.await`ed.
//! * [`CacheLevel`] is the capability trait every concrete or composed cache
//!   satisfies: an asynchronous `get`, a fire-and-forget `set`, `clear`, and
//!   a memory-pressure signal.

pub mod future;
pub mod level;

pub use crate::future::{Outcome, Promise, SharedError, SharedFuture};
pub use crate::level::CacheLevel;

/// Alias for a type-erased error type.
///
/// This is the ingestion type for [`Promise::fail`]; once a future has
/// failed, the error is shared between observers as a [`SharedError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

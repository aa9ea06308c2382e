//! Gate fetches behind an asynchronous predicate.
//!
//! [`Conditioned`] wraps a level and consults a [`Condition`] before every
//! `get`. Keys the condition approves are forwarded; keys it rejects fail
//! with [`error::NotSatisfied`] without the wrapped level ever seeing them,
//! so callers can tell "rejected by policy" apart from "rejected by the
//! data source". Writes and signals are not gated.

use std::fmt;
use std::sync::Arc;

use strata_core::{CacheLevel, Outcome, Promise, SharedFuture};

mod condition;
pub mod error;
mod layer;

pub use self::condition::Condition;
pub use self::layer::ConditionedLayer;

/// A [`CacheLevel`] decorator that conditions `get` on an asynchronous
/// boolean predicate.
///
/// For each `get(key)` the condition is checked first:
///
/// * condition succeeds with `true`: the call forwards to the wrapped
///   level and the caller's future mirrors its exact outcome;
/// * condition succeeds with `false`: the caller's future fails with
///   [`error::NotSatisfied`];
/// * condition fails: that error propagates to the caller unchanged.
///
/// `set`, `clear` and `memory_warning` pass straight through, ungated.
pub struct Conditioned<L, C> {
    inner: Arc<L>,
    condition: C,
}

// ===== impl Conditioned =====

impl<L, C> Conditioned<L, C> {
    /// Wraps `inner`, gating its fetches behind `condition`.
    pub fn new(inner: L, condition: C) -> Self {
        Conditioned {
            inner: Arc::new(inner),
            condition,
        }
    }

    /// Gets a reference to the wrapped level.
    pub fn get_ref(&self) -> &L {
        &self.inner
    }
}

impl<L, C> CacheLevel for Conditioned<L, C>
where
    L: CacheLevel + Send + Sync + 'static,
    C: Condition<L::Key>,
{
    type Key = L::Key;
    type Value = L::Value;

    fn get(&self, key: Self::Key) -> SharedFuture<Self::Value> {
        let inner = Arc::clone(&self.inner);
        gated(self.condition.check(&key), move || inner.get(key))
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

impl<L, C: Clone> Clone for Conditioned<L, C> {
    fn clone(&self) -> Self {
        Conditioned {
            inner: Arc::clone(&self.inner),
            condition: self.condition.clone(),
        }
    }
}

impl<L: fmt::Debug, C> fmt::Debug for Conditioned<L, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conditioned")
            .field("inner", &self.inner)
            .finish()
    }
}

/// The three-way gate at the heart of conditioning.
///
/// `forward` runs only when the check succeeds with `true`; its future's
/// outcome is mimicked into the returned one. A `false` check fails with
/// [`error::NotSatisfied`]; a failed or cancelled check propagates as is.
pub(crate) fn gated<V, F>(check: SharedFuture<bool>, forward: F) -> SharedFuture<V>
where
    V: Clone + Send + 'static,
    F: FnOnce() -> SharedFuture<V> + Send + 'static,
{
    let promise = Promise::new();
    let future = promise.future();
    check.on_completion(move |outcome| match outcome {
        Outcome::Succeeded(true) => promise.mimic(forward()),
        Outcome::Succeeded(false) => promise.fail(error::NotSatisfied::new()),
        Outcome::Failed(error) => promise.fail_shared(error),
        Outcome::Cancelled => promise.cancel(),
    });
    future
}

//! Asynchronous value transformers and their gated forms.
//!
//! Transformers sit at the edges of a cache stack, converting between the
//! representation a backend stores and the one an application consumes
//! (bytes to a decoded asset, say). A [`OneWayTransformer`] converts in one
//! direction; a [`TwoWayTransformer`] can also invert the conversion, which
//! a cache needs to write application values back through a storage-facing
//! level.
//!
//! Both directions can be gated behind a [`Condition`], with exactly the
//! same three-way semantics as [`Conditioned`] applies to `get`: approved
//! inputs are forwarded, rejected ones fail with
//! [`error::NotSatisfied`], and a failing condition propagates its own
//! error. A two-way transformer takes an independent condition per
//! direction, since the two directions consume different input types.
//!
//! [`Conditioned`]: crate::conditioned::Conditioned
//! [`error::NotSatisfied`]: crate::conditioned::error::NotSatisfied

use std::fmt;
use std::sync::Arc;

use strata_core::SharedFuture;

use crate::conditioned::{gated, Condition};

/// An asynchronous conversion from one representation to another.
pub trait OneWayTransformer {
    /// The representation consumed.
    type Input: Clone + Send + 'static;

    /// The representation produced.
    type Output: Clone + Send + 'static;

    /// Asynchronously converts `input` into the output representation.
    fn transform(&self, input: Self::Input) -> SharedFuture<Self::Output>;
}

/// An asynchronous conversion that can also be inverted.
pub trait TwoWayTransformer: OneWayTransformer {
    /// Asynchronously converts `output` back into the input representation.
    fn inverse_transform(&self, output: Self::Output) -> SharedFuture<Self::Input>;
}

/// A [`OneWayTransformer`] decorator that conditions the forward direction
/// on an asynchronous predicate over the input.
pub struct ConditionedTransformer<T, C> {
    inner: Arc<T>,
    condition: C,
}

// ===== impl ConditionedTransformer =====

impl<T, C> ConditionedTransformer<T, C> {
    /// Wraps `inner`, gating its forward direction behind `condition`.
    pub fn new(inner: T, condition: C) -> Self {
        ConditionedTransformer {
            inner: Arc::new(inner),
            condition,
        }
    }

    /// Gets a reference to the wrapped transformer.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }
}

impl<T, C> OneWayTransformer for ConditionedTransformer<T, C>
where
    T: OneWayTransformer + Send + Sync + 'static,
    C: Condition<T::Input>,
{
    type Input = T::Input;
    type Output = T::Output;

    fn transform(&self, input: Self::Input) -> SharedFuture<Self::Output> {
        let inner = Arc::clone(&self.inner);
        gated(self.condition.check(&input), move || inner.transform(input))
    }
}

impl<T: fmt::Debug, C> fmt::Debug for ConditionedTransformer<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionedTransformer")
            .field("inner", &self.inner)
            .finish()
    }
}

/// A [`TwoWayTransformer`] decorator that conditions each direction on its
/// own asynchronous predicate.
///
/// The forward condition checks values of the input type, the inverse
/// condition values of the output type; neither direction consults the
/// other's gate.
pub struct ConditionedTwoWayTransformer<T, C, D> {
    inner: Arc<T>,
    forward: C,
    inverse: D,
}

// ===== impl ConditionedTwoWayTransformer =====

impl<T, C, D> ConditionedTwoWayTransformer<T, C, D> {
    /// Wraps `inner`, gating the forward direction behind `forward` and the
    /// inverse direction behind `inverse`.
    pub fn new(inner: T, forward: C, inverse: D) -> Self {
        ConditionedTwoWayTransformer {
            inner: Arc::new(inner),
            forward,
            inverse,
        }
    }

    /// Gets a reference to the wrapped transformer.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }
}

impl<T, C, D> OneWayTransformer for ConditionedTwoWayTransformer<T, C, D>
where
    T: TwoWayTransformer + Send + Sync + 'static,
    C: Condition<T::Input>,
    D: Condition<T::Output>,
{
    type Input = T::Input;
    type Output = T::Output;

    fn transform(&self, input: Self::Input) -> SharedFuture<Self::Output> {
        let inner = Arc::clone(&self.inner);
        gated(self.forward.check(&input), move || inner.transform(input))
    }
}

impl<T, C, D> TwoWayTransformer for ConditionedTwoWayTransformer<T, C, D>
where
    T: TwoWayTransformer + Send + Sync + 'static,
    C: Condition<T::Input>,
    D: Condition<T::Output>,
{
    fn inverse_transform(&self, output: Self::Output) -> SharedFuture<Self::Input> {
        let inner = Arc::clone(&self.inner);
        gated(self.inverse.check(&output), move || {
            inner.inverse_transform(output)
        })
    }
}

impl<T: fmt::Debug, C, D> fmt::Debug for ConditionedTwoWayTransformer<T, C, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionedTwoWayTransformer")
            .field("inner", &self.inner)
            .finish()
    }
}

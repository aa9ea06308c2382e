use super::{Condition, Conditioned};
use std::fmt;
use strata_core::CacheLevel;
use strata_layer::Layer;

/// Conditions fetches to the wrapped level on an asynchronous predicate.
///
/// See the module documentation for more details.
#[derive(Clone)]
pub struct ConditionedLayer<C> {
    condition: C,
}

impl<C> ConditionedLayer<C> {
    /// Creates a new [`ConditionedLayer`] from the given condition.
    pub fn new(condition: C) -> Self {
        ConditionedLayer { condition }
    }
}

impl<L, C> Layer<L> for ConditionedLayer<C>
where
    L: CacheLevel,
    C: Condition<L::Key> + Clone,
{
    type Level = Conditioned<L, C>;

    fn layer(&self, inner: L) -> Self::Level {
        Conditioned::new(inner, self.condition.clone())
    }
}

impl<C> fmt::Debug for ConditionedLayer<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionedLayer")
            .field("condition", &format_args!("<{}>", std::any::type_name::<C>()))
            .finish()
    }
}

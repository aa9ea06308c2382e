use super::Layer;
use std::fmt;

/// Returns a new [`LayerFn`] that implements [`Layer`] by calling the given
/// function.
///
/// # Examples
///
/// ```rust
/// use strata_layer::{layer_fn, Layer};
///
/// let double = layer_fn(|inner: u32| inner * 2);
///
/// assert_eq!(double.layer(21), 42);
/// ```
pub fn layer_fn<T>(f: T) -> LayerFn<T> {
    LayerFn { f }
}

/// A [`Layer`] implemented by a closure. See the docs for [`layer_fn`] for
/// more details.
#[derive(Clone, Copy)]
pub struct LayerFn<F> {
    f: F,
}

impl<F, L, Out> Layer<L> for LayerFn<F>
where
    F: Fn(L) -> Out,
{
    type Level = Out;

    fn layer(&self, inner: L) -> Self::Level {
        (self.f)(inner)
    }
}

impl<F> fmt::Debug for LayerFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerFn")
            .field("f", &format_args!("<{}>", std::any::type_name::<F>()))
            .finish()
    }
}

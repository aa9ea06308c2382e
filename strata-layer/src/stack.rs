use super::Layer;
use core::fmt;

/// Two [`Layer`]s chained together.
///
/// # Examples
///
/// ```rust
/// use strata_layer::{layer_fn, Layer, Stack};
///
/// let inner = layer_fn(|level| level + 2);
/// let outer = layer_fn(|level| level * 2);
///
/// let inner_outer_stack = Stack::new(inner, outer);
///
/// // (4 + 2) * 2 = 12
/// assert_eq!(inner_outer_stack.layer(4), 12);
/// ```
#[derive(Clone)]
pub struct Stack<Inner, Outer> {
    inner: Inner,
    outer: Outer,
}

impl<Inner, Outer> Stack<Inner, Outer> {
    /// Creates a new [`Stack`].
    pub const fn new(inner: Inner, outer: Outer) -> Self {
        Stack { inner, outer }
    }
}

impl<L, Inner, Outer> Layer<L> for Stack<Inner, Outer>
where
    Inner: Layer<L>,
    Outer: Layer<Inner::Level>,
{
    type Level = Outer::Level;

    fn layer(&self, level: L) -> Self::Level {
        let inner = self.inner.layer(level);

        self.outer.layer(inner)
    }
}

impl<Inner, Outer> fmt::Debug for Stack<Inner, Outer>
where
    Inner: fmt::Debug,
    Outer: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The output of nested `Stack`s is very noisy once a builder has
        // accumulated a few layers. Print them as a flat list, outermost
        // first, which matches the order they were added in.
        if f.alternate() {
            // pretty
            write!(f, "{:#?},\n{:#?}", self.outer, self.inner)
        } else {
            write!(f, "{:?}, {:?}", self.outer, self.inner)
        }
    }
}

use super::Layer;
use core::fmt;

/// A no-op decorator.
///
/// When wrapping a cache level, the [`Identity`] layer returns the provided
/// level without modifying it.
///
/// # Examples
///
/// ```rust
/// use strata_layer::Identity;
/// use strata_layer::Layer;
///
/// let identity = Identity::new();
///
/// assert_eq!(identity.layer(42), 42);
/// ```
#[derive(Default, Clone)]
pub struct Identity {
    _p: (),
}

impl Identity {
    /// Creates a new [`Identity`].
    pub const fn new() -> Identity {
        Identity { _p: () }
    }
}

impl<L> Layer<L> for Identity {
    type Level = L;

    fn layer(&self, inner: L) -> Self::Level {
        inner
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity").finish()
    }
}

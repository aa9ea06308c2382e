use strata_core::SharedFuture;

/// Checks a key asynchronously.
///
/// A condition decides per key whether a gated operation may proceed. The
/// check may itself be asynchronous (consulting a policy service, a
/// feature flag, a quota), which is why it answers with a
/// `SharedFuture<bool>` rather than a plain `bool`.
///
/// If the returned future fails, that error is handed to the gated caller
/// in place of a plain rejection, so a condition can explain *why* it
/// turned a key away.
pub trait Condition<Key> {
    /// Check whether the operation for `key` should proceed.
    fn check(&self, key: &Key) -> SharedFuture<bool>;
}

impl<F, Key> Condition<Key> for F
where
    F: Fn(&Key) -> SharedFuture<bool>,
{
    fn check(&self, key: &Key) -> SharedFuture<bool> {
        self(key)
    }
}

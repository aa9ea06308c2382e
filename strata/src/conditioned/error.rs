//! Error types

use std::{error, fmt};

/// Error produced by `Conditioned` when the condition evaluates to `false`.
///
/// Distinct from any backend error, so callers can tell a key rejected by
/// policy apart from one the data source could not produce. Failures of the
/// condition itself are not wrapped in this type; they propagate verbatim.
#[derive(Debug)]
pub struct NotSatisfied {
    _p: (),
}

impl NotSatisfied {
    pub(crate) fn new() -> NotSatisfied {
        NotSatisfied { _p: () }
    }
}

impl fmt::Display for NotSatisfied {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_str("condition not satisfied")
    }
}

impl error::Error for NotSatisfied {}

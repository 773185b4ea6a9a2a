use core::fmt;

/// Errors reported by cursors and tiered collections.
///
/// Every failure is immediate: the collection involved is left exactly as it
/// was before the failing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// `remove` was called on a cursor that has no current element, either
    /// because nothing was returned yet or because the current element was
    /// already removed.
    NoCurrentElement,
    /// `advance` was called on a cursor with no remaining elements.
    Exhausted,
    /// An in-place mutation was attempted on an empty, singleton or
    /// read-only tiered collection.
    Unsupported,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NoCurrentElement => f.write_str("cursor has no current element to remove"),
            Error::Exhausted => f.write_str("cursor has no remaining elements"),
            Error::Unsupported => f.write_str("collection tier does not support in-place mutation"),
        }
    }
}

impl core::error::Error for Error {}

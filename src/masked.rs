//! Null masking.
//!
//! Table slots use `None` for "empty", so a caller's null element (`None` at
//! the public API) cannot be stored as-is. It is stored as [`Masked::Null`]
//! instead and turned back into `None` on the way out.

use crate::strategy::Equivalence;

/// An element as it sits in a table slot.
#[derive(Clone, Debug)]
pub(crate) enum Masked<T> {
    /// The caller's null element.
    Null,
    Value(T),
}

impl<T> Masked<T> {
    #[inline(always)]
    pub(crate) fn mask(value: Option<T>) -> Self {
        match value {
            Some(value) => Masked::Value(value),
            None => Masked::Null,
        }
    }

    #[inline(always)]
    pub(crate) fn unmask(self) -> Option<T> {
        match self {
            Masked::Value(value) => Some(value),
            Masked::Null => None,
        }
    }

    #[inline(always)]
    pub(crate) fn get(&self) -> Option<&T> {
        match self {
            Masked::Value(value) => Some(value),
            Masked::Null => None,
        }
    }
}

/// Equality of two possibly-null elements: null matches only null.
#[inline(always)]
pub(crate) fn nullable_equals<T, S>(a: Option<&T>, b: Option<&T>) -> bool
where
    S: Equivalence<T>,
{
    match (a, b) {
        (Some(a), Some(b)) => S::equals(a, b),
        (None, None) => true,
        _ => false,
    }
}

/// Hash code of a possibly-null element: null hashes to zero.
#[inline(always)]
pub(crate) fn nullable_hash<T, S>(value: Option<&T>) -> i32
where
    S: Equivalence<T>,
{
    match value {
        Some(value) => S::hash(value),
        None => 0,
    }
}

/// Hash code of a stored element, as the table's rehash callback.
#[inline(always)]
pub(crate) fn masked_hash<T, S>(value: &Masked<T>) -> i32
where
    S: Equivalence<T>,
{
    nullable_hash::<T, S>(value.get())
}

/// Formats a possibly-null element, printing the null element as `null`.
pub(crate) struct NullableDebug<'a, T>(pub(crate) Option<&'a T>);

impl<T: core::fmt::Debug> core::fmt::Debug for NullableDebug<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.0 {
            Some(value) => value.fmt(f),
            None => f.write_str("null"),
        }
    }
}

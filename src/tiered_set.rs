//! Size-tiered sets.
//!
//! A [`TieredSet`] holds nothing for zero elements, the element itself for
//! one, and a full [`HashSet`] only from two elements on. The by-value
//! transforms ([`add`](TieredSet::add), [`remove`](TieredSet::remove),
//! [`normalize`](TieredSet::normalize), ...) consume the set and return the
//! representation its new contents call for, so a table is allocated only
//! when the element count crosses a tier boundary.
//!
//! ```rust
//! use lean_hash::{Tier, TieredSet};
//!
//! let set = TieredSet::<u32>::new();
//! assert_eq!(set.tier(), Tier::Empty);
//!
//! let set = set.add(1);
//! assert_eq!(set.tier(), Tier::Singleton);
//!
//! let set = set.add(2);
//! assert_eq!(set.tier(), Tier::Table);
//!
//! let set = set.remove(&1);
//! assert_eq!(set.tier(), Tier::Singleton);
//! assert!(set.contains(&2));
//! ```

use core::fmt::Debug;

use crate::error::Error;
use crate::hash_set;
use crate::hash_set::HashSet;
use crate::masked::NullableDebug;
use crate::masked::nullable_equals;
use crate::masked::nullable_hash;
use crate::strategy::Equivalence;
use crate::strategy::Identity;
use crate::strategy::Value;

/// The representation a tiered collection currently uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// No elements and no allocation.
    Empty,
    /// Exactly one element, stored inline.
    Singleton,
    /// A full hash table, writable or read-only.
    Table,
}

/// A set that picks the cheapest representation for its size.
pub struct TieredSet<T, S = Value> {
    repr: Repr<T, S>,
}

/// A tiered set comparing elements by identity.
pub type IdentityTieredSet<T> = TieredSet<T, Identity>;

enum Repr<T, S> {
    Empty,
    Singleton(Option<T>),
    Table(HashSet<T, S>),
    ReadOnly(HashSet<T, S>),
}

impl<T: Clone, S> Clone for TieredSet<T, S> {
    fn clone(&self) -> Self {
        let repr = match &self.repr {
            Repr::Empty => Repr::Empty,
            Repr::Singleton(value) => Repr::Singleton(value.clone()),
            Repr::Table(set) => Repr::Table(set.clone()),
            Repr::ReadOnly(set) => Repr::ReadOnly(set.clone()),
        };
        Self { repr }
    }
}

impl<T, S> TieredSet<T, S> {
    /// Returns the empty set. Never allocates.
    pub const fn new() -> Self {
        Self { repr: Repr::Empty }
    }

    /// Returns a singleton set holding `value`.
    pub fn of(value: T) -> Self {
        Self::of_nullable(Some(value))
    }

    /// Returns a singleton set holding a possibly-null element.
    pub fn of_nullable(value: Option<T>) -> Self {
        Self {
            repr: Repr::Singleton(value),
        }
    }

    /// Reports the current representation.
    pub fn tier(&self) -> Tier {
        match self.repr {
            Repr::Empty => Tier::Empty,
            Repr::Singleton(_) => Tier::Singleton,
            Repr::Table(_) | Repr::ReadOnly(_) => Tier::Table,
        }
    }

    /// Returns `true` for a table produced by
    /// [`normalize_unmodifiable`](Self::normalize_unmodifiable).
    pub fn is_read_only(&self) -> bool {
        matches!(self.repr, Repr::ReadOnly(_))
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        match &self.repr {
            Repr::Empty => 0,
            Repr::Singleton(_) => 1,
            Repr::Table(set) | Repr::ReadOnly(set) => set.len(),
        }
    }

    /// Returns `true` if the set has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an iterator over the elements, `None` standing for the null
    /// element.
    pub fn iter(&self) -> Iter<'_, T> {
        let inner = match &self.repr {
            Repr::Empty => IterInner::Inline(None.into_iter()),
            Repr::Singleton(value) => IterInner::Inline(Some(value.as_ref()).into_iter()),
            Repr::Table(set) | Repr::ReadOnly(set) => IterInner::Table(set.iter()),
        };
        Iter { inner }
    }

    /// Returns the backing table for in-place mutation.
    ///
    /// # Errors
    ///
    /// [`Error::Unsupported`] unless the set is a writable table.
    pub fn table_mut(&mut self) -> Result<&mut HashSet<T, S>, Error> {
        match &mut self.repr {
            Repr::Table(set) => Ok(set),
            _ => Err(Error::Unsupported),
        }
    }
}

impl<T, S> TieredSet<T, S>
where
    S: Equivalence<T>,
{
    /// Returns the tiered form of `set`: empty, singleton or the table itself.
    pub fn from_table(set: HashSet<T, S>) -> Self {
        Self {
            repr: Repr::Table(set),
        }
        .normalize()
    }

    fn into_table(self) -> HashSet<T, S> {
        match self.repr {
            Repr::Table(set) | Repr::ReadOnly(set) => set,
            Repr::Empty => HashSet::new(),
            Repr::Singleton(value) => {
                let mut set = HashSet::new();
                set.insert_nullable(value);
                set
            }
        }
    }

    /// Returns `true` if the set contains `value`.
    pub fn contains(&self, value: &T) -> bool {
        self.contains_nullable(Some(value))
    }

    /// Returns `true` if the set contains the possibly-null `value`.
    pub fn contains_nullable(&self, value: Option<&T>) -> bool {
        match &self.repr {
            Repr::Empty => false,
            Repr::Singleton(stored) => nullable_equals::<T, S>(stored.as_ref(), value),
            Repr::Table(set) | Repr::ReadOnly(set) => set.contains_nullable(value),
        }
    }

    /// Returns the stored element equal to `value`.
    pub fn get(&self, value: &T) -> Option<&T> {
        match &self.repr {
            Repr::Empty => None,
            Repr::Singleton(stored) => stored.as_ref().filter(|s| S::equals(s, value)),
            Repr::Table(set) | Repr::ReadOnly(set) => set.get(value),
        }
    }

    /// Returns the set with `value` added.
    pub fn add(self, value: T) -> Self {
        self.add_nullable(Some(value))
    }

    /// Returns the set with a possibly-null element added.
    ///
    /// Empty becomes a singleton, a singleton becomes a table when the new
    /// element differs, and a read-only table becomes writable again.
    pub fn add_nullable(self, value: Option<T>) -> Self {
        match self.repr {
            Repr::Empty => Self::of_nullable(value),
            Repr::Singleton(stored) => {
                if nullable_equals::<T, S>(stored.as_ref(), value.as_ref()) {
                    return Self::of_nullable(stored);
                }
                let mut set = HashSet::new();
                set.insert_nullable(stored);
                set.insert_nullable(value);
                Self {
                    repr: Repr::Table(set),
                }
            }
            Repr::Table(mut set) | Repr::ReadOnly(mut set) => {
                set.insert_nullable(value);
                Self {
                    repr: Repr::Table(set),
                }
            }
        }
    }

    /// Returns the set with every element of `iter` added.
    pub fn add_all(self, iter: impl IntoIterator<Item = T>) -> Self {
        let mut iter = iter.into_iter().peekable();
        if iter.peek().is_none() {
            return self;
        }
        let mut set = self.into_table();
        set.extend(iter);
        Self {
            repr: Repr::Table(set),
        }
        .normalize()
    }

    /// Returns the set with `value` removed.
    pub fn remove(self, value: &T) -> Self {
        self.remove_nullable(Some(value))
    }

    /// Returns the set with a possibly-null element removed, dropping to
    /// the tier its new size calls for.
    pub fn remove_nullable(self, value: Option<&T>) -> Self {
        match self.repr {
            Repr::Empty => Self::new(),
            Repr::Singleton(stored) => {
                if nullable_equals::<T, S>(stored.as_ref(), value) {
                    Self::new()
                } else {
                    Self::of_nullable(stored)
                }
            }
            Repr::Table(mut set) | Repr::ReadOnly(mut set) => {
                set.remove_nullable(value);
                Self {
                    repr: Repr::Table(set),
                }
                .normalize()
            }
        }
    }

    /// Returns the representation the current size calls for: empty for
    /// zero elements, singleton for one, a writable table otherwise.
    pub fn normalize(self) -> Self {
        match self.repr {
            Repr::Table(set) | Repr::ReadOnly(set) => match set.len() {
                0 => Self::new(),
                1 => match set.into_iter().next() {
                    Some(value) => Self::of_nullable(value),
                    None => Self::new(),
                },
                _ => Self {
                    repr: Repr::Table(set),
                },
            },
            repr => Self { repr },
        }
    }

    /// Like [`normalize`](Self::normalize), but a table comes back
    /// read-only: in-place mutation is refused until a by-value transform
    /// copies it out.
    pub fn normalize_unmodifiable(self) -> Self {
        match self.normalize().repr {
            Repr::Table(set) => Self {
                repr: Repr::ReadOnly(set),
            },
            repr => Self { repr },
        }
    }

    /// Inserts into a writable table in place. Returns `true` if the element
    /// was new.
    ///
    /// # Errors
    ///
    /// [`Error::Unsupported`] on the empty, singleton and read-only tiers.
    pub fn try_insert(&mut self, value: T) -> Result<bool, Error> {
        Ok(self.table_mut()?.insert(value))
    }

    /// Removes from a writable table in place, without changing tier.
    /// Returns `true` if the element was present.
    ///
    /// # Errors
    ///
    /// [`Error::Unsupported`] on the empty, singleton and read-only tiers.
    pub fn try_remove(&mut self, value: &T) -> Result<bool, Error> {
        Ok(self.table_mut()?.remove(value))
    }

    /// Sum of the element hash codes; agrees with the equal [`HashSet`].
    pub fn content_hash(&self) -> i32 {
        match &self.repr {
            Repr::Empty => 0,
            Repr::Singleton(value) => nullable_hash::<T, S>(value.as_ref()),
            Repr::Table(set) | Repr::ReadOnly(set) => set.content_hash(),
        }
    }
}

impl<T, S> Default for TieredSet<T, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S> PartialEq for TieredSet<T, S>
where
    S: Equivalence<T>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|v| other.contains_nullable(v))
    }
}

impl<T, S> Eq for TieredSet<T, S> where S: Equivalence<T> {}

impl<T: Debug, S> Debug for TieredSet<T, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set()
            .entries(self.iter().map(NullableDebug))
            .finish()
    }
}

impl<T, S> FromIterator<T> for TieredSet<T, S>
where
    S: Equivalence<T>,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new().add_all(iter)
    }
}

impl<T, S> From<HashSet<T, S>> for TieredSet<T, S>
where
    S: Equivalence<T>,
{
    fn from(set: HashSet<T, S>) -> Self {
        Self::from_table(set)
    }
}

/// An iterator over the elements of a [`TieredSet`].
pub struct Iter<'a, T> {
    inner: IterInner<'a, T>,
}

enum IterInner<'a, T> {
    Inline(core::option::IntoIter<Option<&'a T>>),
    Table(hash_set::Iter<'a, T>),
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = Option<&'a T>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            IterInner::Inline(inner) => inner.next(),
            IterInner::Table(inner) => inner.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            IterInner::Inline(inner) => inner.size_hint(),
            IterInner::Table(inner) => inner.size_hint(),
        }
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<'a, T, S> IntoIterator for &'a TieredSet<T, S> {
    type IntoIter = Iter<'a, T>;
    type Item = Option<&'a T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

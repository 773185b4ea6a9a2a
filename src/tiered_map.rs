//! Size-tiered maps.
//!
//! The map counterpart of [`TieredSet`](crate::TieredSet): no allocation for
//! zero entries, an inline pair for one, and a [`HashMap`] from two on.

use core::fmt::Debug;

use crate::error::Error;
use crate::hash_map;
use crate::hash_map::HashMap;
use crate::masked::NullableDebug;
use crate::masked::nullable_equals;
use crate::masked::nullable_hash;
use crate::strategy::Equivalence;
use crate::strategy::Identity;
use crate::strategy::Value;
use crate::tiered_set::Tier;

/// A map that picks the cheapest representation for its size.
///
/// Keys are compared with `S` and values with `VS`.
///
/// # Examples
///
/// ```rust
/// use lean_hash::{Tier, TieredMap};
///
/// let map = TieredMap::<&str, u32>::new().put("a", 1);
/// assert_eq!(map.tier(), Tier::Singleton);
///
/// let map = map.put("b", 2).put("a", 3);
/// assert_eq!(map.tier(), Tier::Table);
/// assert_eq!(map.get(&"a"), Some(&3));
///
/// let map = map.remove(&"b");
/// assert_eq!(map.tier(), Tier::Singleton);
/// ```
pub struct TieredMap<K, V, S = Value, VS = Value> {
    repr: Repr<K, V, S, VS>,
}

/// A tiered map comparing keys by identity.
pub type IdentityTieredMap<K, V, VS = Value> = TieredMap<K, V, Identity, VS>;

enum Repr<K, V, S, VS> {
    Empty,
    Singleton(Option<K>, V),
    Table(HashMap<K, V, S, VS>),
    ReadOnly(HashMap<K, V, S, VS>),
}

impl<K: Clone, V: Clone, S, VS> Clone for TieredMap<K, V, S, VS> {
    fn clone(&self) -> Self {
        let repr = match &self.repr {
            Repr::Empty => Repr::Empty,
            Repr::Singleton(k, v) => Repr::Singleton(k.clone(), v.clone()),
            Repr::Table(map) => Repr::Table(map.clone()),
            Repr::ReadOnly(map) => Repr::ReadOnly(map.clone()),
        };
        Self { repr }
    }
}

impl<K, V, S, VS> TieredMap<K, V, S, VS> {
    /// Returns the empty map. Never allocates.
    pub const fn new() -> Self {
        Self { repr: Repr::Empty }
    }

    /// Returns a map holding the single pair `key -> value`.
    pub fn of(key: K, value: V) -> Self {
        Self::of_nullable(Some(key), value)
    }

    /// Returns a map holding one pair whose key may be null.
    pub fn of_nullable(key: Option<K>, value: V) -> Self {
        Self {
            repr: Repr::Singleton(key, value),
        }
    }

    /// Reports the current representation.
    pub fn tier(&self) -> Tier {
        match self.repr {
            Repr::Empty => Tier::Empty,
            Repr::Singleton(..) => Tier::Singleton,
            Repr::Table(_) | Repr::ReadOnly(_) => Tier::Table,
        }
    }

    /// Returns `true` for a table produced by
    /// [`normalize_unmodifiable`](Self::normalize_unmodifiable).
    pub fn is_read_only(&self) -> bool {
        matches!(self.repr, Repr::ReadOnly(_))
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        match &self.repr {
            Repr::Empty => 0,
            Repr::Singleton(..) => 1,
            Repr::Table(map) | Repr::ReadOnly(map) => map.len(),
        }
    }

    /// Returns `true` if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an iterator over the entries, `None` standing for the null
    /// key.
    pub fn iter(&self) -> Iter<'_, K, V> {
        let inner = match &self.repr {
            Repr::Empty => IterInner::Inline(None.into_iter()),
            Repr::Singleton(k, v) => IterInner::Inline(Some((k.as_ref(), v)).into_iter()),
            Repr::Table(map) | Repr::ReadOnly(map) => IterInner::Table(map.iter()),
        };
        Iter { inner }
    }

    /// Returns the backing table for in-place mutation.
    ///
    /// # Errors
    ///
    /// [`Error::Unsupported`] unless the map is a writable table.
    pub fn table_mut(&mut self) -> Result<&mut HashMap<K, V, S, VS>, Error> {
        match &mut self.repr {
            Repr::Table(map) => Ok(map),
            _ => Err(Error::Unsupported),
        }
    }
}

impl<K, V, S, VS> TieredMap<K, V, S, VS>
where
    S: Equivalence<K>,
{
    /// Returns the tiered form of `map`.
    pub fn from_table(map: HashMap<K, V, S, VS>) -> Self {
        Self {
            repr: Repr::Table(map),
        }
        .normalize()
    }

    fn into_table(self) -> HashMap<K, V, S, VS> {
        match self.repr {
            Repr::Table(map) | Repr::ReadOnly(map) => map,
            Repr::Empty => HashMap::new(),
            Repr::Singleton(k, v) => {
                let mut map = HashMap::new();
                map.insert_nullable(k, v);
                map
            }
        }
    }

    /// Returns the value for `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_nullable(Some(key))
    }

    /// Returns the value for a key that may be null.
    pub fn get_nullable(&self, key: Option<&K>) -> Option<&V> {
        match &self.repr {
            Repr::Empty => None,
            Repr::Singleton(k, v) => nullable_equals::<K, S>(k.as_ref(), key).then_some(v),
            Repr::Table(map) | Repr::ReadOnly(map) => map.get_nullable(key),
        }
    }

    /// Returns `true` if the map contains `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Returns `true` if the map contains a key that may be null.
    pub fn contains_key_nullable(&self, key: Option<&K>) -> bool {
        self.get_nullable(key).is_some()
    }

    /// Returns the map with `key` bound to `value`.
    pub fn put(self, key: K, value: V) -> Self {
        self.put_nullable(Some(key), value)
    }

    /// Returns the map with a possibly-null key bound to `value`.
    ///
    /// Replacing the value of the only key keeps the singleton tier.
    pub fn put_nullable(self, key: Option<K>, value: V) -> Self {
        match self.repr {
            Repr::Empty => Self::of_nullable(key, value),
            Repr::Singleton(k, v) => {
                if nullable_equals::<K, S>(k.as_ref(), key.as_ref()) {
                    return Self::of_nullable(k, value);
                }
                let mut map = HashMap::new();
                map.insert_nullable(k, v);
                map.insert_nullable(key, value);
                Self {
                    repr: Repr::Table(map),
                }
            }
            Repr::Table(mut map) | Repr::ReadOnly(mut map) => {
                map.insert_nullable(key, value);
                Self {
                    repr: Repr::Table(map),
                }
            }
        }
    }

    /// Returns the map with every pair of `iter` put.
    pub fn put_all(self, iter: impl IntoIterator<Item = (K, V)>) -> Self {
        let mut iter = iter.into_iter().peekable();
        if iter.peek().is_none() {
            return self;
        }
        let mut map = self.into_table();
        map.extend(iter);
        Self {
            repr: Repr::Table(map),
        }
        .normalize()
    }

    /// Returns the map without `key`.
    pub fn remove(self, key: &K) -> Self {
        self.remove_nullable(Some(key))
    }

    /// Returns the map without a possibly-null key, dropping to the tier its
    /// new size calls for.
    pub fn remove_nullable(self, key: Option<&K>) -> Self {
        match self.repr {
            Repr::Empty => Self::new(),
            Repr::Singleton(k, v) => {
                if nullable_equals::<K, S>(k.as_ref(), key) {
                    Self::new()
                } else {
                    Self::of_nullable(k, v)
                }
            }
            Repr::Table(mut map) | Repr::ReadOnly(mut map) => {
                map.remove_nullable(key);
                Self {
                    repr: Repr::Table(map),
                }
                .normalize()
            }
        }
    }

    /// Returns the representation the current size calls for.
    pub fn normalize(self) -> Self {
        match self.repr {
            Repr::Table(map) | Repr::ReadOnly(map) => match map.len() {
                0 => Self::new(),
                1 => match map.into_iter().next() {
                    Some((k, v)) => Self::of_nullable(k, v),
                    None => Self::new(),
                },
                _ => Self {
                    repr: Repr::Table(map),
                },
            },
            repr => Self { repr },
        }
    }

    /// Like [`normalize`](Self::normalize), but a table comes back read-only.
    pub fn normalize_unmodifiable(self) -> Self {
        match self.normalize().repr {
            Repr::Table(map) => Self {
                repr: Repr::ReadOnly(map),
            },
            repr => Self { repr },
        }
    }

    /// Puts into a writable table in place, returning the previous value.
    ///
    /// # Errors
    ///
    /// [`Error::Unsupported`] on the empty, singleton and read-only tiers.
    pub fn try_put(&mut self, key: K, value: V) -> Result<Option<V>, Error> {
        Ok(self.table_mut()?.insert(key, value))
    }

    /// Removes from a writable table in place, returning the value.
    ///
    /// # Errors
    ///
    /// [`Error::Unsupported`] on the empty, singleton and read-only tiers.
    pub fn try_remove(&mut self, key: &K) -> Result<Option<V>, Error> {
        Ok(self.table_mut()?.remove(key))
    }
}

impl<K, V, S, VS> TieredMap<K, V, S, VS>
where
    S: Equivalence<K>,
    VS: Equivalence<V>,
{
    /// Sum over the entries of `hash(key) ^ hash(value)`; agrees with the
    /// equal [`HashMap`].
    pub fn content_hash(&self) -> i32 {
        match &self.repr {
            Repr::Empty => 0,
            Repr::Singleton(k, v) => nullable_hash::<K, S>(k.as_ref()) ^ VS::hash(v),
            Repr::Table(map) | Repr::ReadOnly(map) => map.content_hash(),
        }
    }
}

impl<K, V, S, VS> Default for TieredMap<K, V, S, VS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S, VS> PartialEq for TieredMap<K, V, S, VS>
where
    S: Equivalence<K>,
    VS: Equivalence<V>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.iter().all(|(k, v)| {
                other
                    .get_nullable(k)
                    .is_some_and(|other_v| VS::equals(v, other_v))
            })
    }
}

impl<K, V, S, VS> Eq for TieredMap<K, V, S, VS>
where
    S: Equivalence<K>,
    VS: Equivalence<V>,
{
}

impl<K: Debug, V: Debug, S, VS> Debug for TieredMap<K, V, S, VS> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in self.iter() {
            map.entry(&NullableDebug(k), v);
        }
        map.finish()
    }
}

impl<K, V, S, VS> FromIterator<(K, V)> for TieredMap<K, V, S, VS>
where
    S: Equivalence<K>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new().put_all(iter)
    }
}

impl<K, V, S, VS> From<HashMap<K, V, S, VS>> for TieredMap<K, V, S, VS>
where
    S: Equivalence<K>,
{
    fn from(map: HashMap<K, V, S, VS>) -> Self {
        Self::from_table(map)
    }
}

/// An iterator over the entries of a [`TieredMap`].
pub struct Iter<'a, K, V> {
    inner: IterInner<'a, K, V>,
}

enum IterInner<'a, K, V> {
    Inline(core::option::IntoIter<(Option<&'a K>, &'a V)>),
    Table(hash_map::Iter<'a, K, V>),
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (Option<&'a K>, &'a V);

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

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K, V, S, VS> IntoIterator for &'a TieredMap<K, V, S, VS> {
    type IntoIter = Iter<'a, K, V>;
    type Item = (Option<&'a K>, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

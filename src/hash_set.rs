use core::fmt::Debug;
use core::marker::PhantomData;

use crate::error::Error;
use crate::hash_table::HashTable;
use crate::masked::Masked;
use crate::masked::NullableDebug;
use crate::masked::masked_hash;
use crate::masked::nullable_equals;
use crate::masked::nullable_hash;
use crate::strategy::Equivalence;
use crate::strategy::Identity;
use crate::strategy::Value;

/// A hash set implemented using the linear-probing [`HashTable`] as the
/// underlying storage.
///
/// `HashSet<T, S>` decides element equality and hash codes through the
/// strategy `S`: [`Value`] (the default) uses `Eq` and `Hash`, [`Identity`]
/// compares pointer addresses. The set may hold one null element, which the
/// `*_nullable` methods address as `None`; iteration yields `None` for it.
///
/// # Performance Characteristics
///
/// - **Memory**: one `Option<T>`-sized slot per capacity unit, no stored
///   hashes, load factor kept at or below 3/4.
pub struct HashSet<T, S = Value> {
    table: HashTable<Masked<T>>,
    _strategy: PhantomData<S>,
}

/// A hash set comparing elements by identity.
pub type IdentityHashSet<T> = HashSet<T, Identity>;

impl<T: Clone, S> Clone for HashSet<T, S> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            _strategy: PhantomData,
        }
    }
}

impl<T, S> PartialEq for HashSet<T, S>
where
    S: Equivalence<T>,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|v| other.contains_nullable(v))
    }
}

impl<T, S> Eq for HashSet<T, S> where S: Equivalence<T> {}

impl<T, S> Debug for HashSet<T, S>
where
    T: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set()
            .entries(self.table.iter().map(|v| NullableDebug(v.get())))
            .finish()
    }
}

impl<T, S> HashSet<T, S> {
    /// Creates an empty set with the initial four slots.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty set that holds `capacity` elements without growing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lean_hash::HashSet;
    ///
    /// let set: HashSet<i32> = HashSet::with_capacity(100);
    /// assert!(set.capacity() * 3 >= 100 * 4);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_table(HashTable::with_capacity(capacity))
    }

    pub(crate) fn from_table(table: HashTable<Masked<T>>) -> Self {
        Self {
            table,
            _strategy: PhantomData,
        }
    }

    #[cfg(feature = "serde")]
    pub(crate) fn table(&self) -> &HashTable<Masked<T>> {
        &self.table
    }

    /// Returns the number of elements in the set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no elements.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots in the underlying table.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Removes all elements and returns to the initial four slots.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns an iterator over the elements in slot order. The null element,
    /// if present, is yielded as `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lean_hash::HashSet;
    ///
    /// let mut set = HashSet::<&str>::new();
    /// set.insert("a");
    /// set.insert_nullable(None);
    ///
    /// let mut items: Vec<_> = set.iter().collect();
    /// items.sort();
    /// assert_eq!(items, [None, Some(&"a")]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Removes and yields every element. The set is left empty at its
    /// initial capacity.
    pub fn drain(&mut self) -> IntoIter<T> {
        IntoIter {
            inner: self.table.drain(),
        }
    }
}

impl<T, S> HashSet<T, S>
where
    S: Equivalence<T>,
{
    /// Adds a value to the set. Returns `true` if it was not already present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lean_hash::HashSet;
    ///
    /// let mut set = HashSet::<i32>::new();
    /// assert!(set.insert(2));
    /// assert!(!set.insert(2));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        self.insert_nullable(Some(value))
    }

    /// Adds a possibly-null value to the set. Returns `true` if it was not
    /// already present.
    pub fn insert_nullable(&mut self, value: Option<T>) -> bool {
        let hash = nullable_hash::<T, S>(value.as_ref());
        let entry = self.table.entry(
            hash,
            |existing| nullable_equals::<T, S>(existing.get(), value.as_ref()),
            masked_hash::<T, S>,
        );
        match entry {
            crate::hash_table::Entry::Occupied(_) => false,
            crate::hash_table::Entry::Vacant(entry) => {
                entry.insert(Masked::mask(value));
                true
            }
        }
    }

    #[inline]
    fn find_index(&self, value: Option<&T>) -> Option<usize> {
        self.table.find_index(nullable_hash::<T, S>(value), |existing| {
            nullable_equals::<T, S>(existing.get(), value)
        })
    }

    /// Returns `true` if the set contains `value`.
    pub fn contains(&self, value: &T) -> bool {
        self.contains_nullable(Some(value))
    }

    /// Returns `true` if the set contains the possibly-null `value`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lean_hash::HashSet;
    ///
    /// let mut set = HashSet::<u8>::new();
    /// assert!(!set.contains_nullable(None));
    /// set.insert_nullable(None);
    /// assert!(set.contains_nullable(None));
    /// assert!(!set.contains(&0));
    /// ```
    pub fn contains_nullable(&self, value: Option<&T>) -> bool {
        self.find_index(value).is_some()
    }

    /// Returns the stored element equal to `value`.
    pub fn get(&self, value: &T) -> Option<&T> {
        let index = self.find_index(Some(value))?;
        self.table.get_slot(index).and_then(Masked::get)
    }

    /// Removes a value from the set. Returns `true` if it was present.
    pub fn remove(&mut self, value: &T) -> bool {
        self.remove_nullable(Some(value))
    }

    /// Removes a possibly-null value from the set. Returns `true` if it was
    /// present.
    pub fn remove_nullable(&mut self, value: Option<&T>) -> bool {
        match self.find_index(value) {
            Some(index) => self.table.remove_at(index, masked_hash::<T, S>).is_some(),
            None => false,
        }
    }

    /// Removes and returns the stored element equal to `value`.
    pub fn take(&mut self, value: &T) -> Option<T> {
        let index = self.find_index(Some(value))?;
        self.table
            .remove_at(index, masked_hash::<T, S>)
            .and_then(Masked::unmask)
    }

    /// Returns a cursor that walks the set and can remove the element it
    /// last returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lean_hash::HashSet;
    ///
    /// let mut set: HashSet<u32> = (0..10).collect();
    /// let mut cursor = set.cursor();
    /// while let Ok(value) = cursor.advance() {
    ///     if value.is_some_and(|v| v % 2 == 1) {
    ///         cursor.remove().unwrap();
    ///     }
    /// }
    /// assert_eq!(set.len(), 5);
    /// ```
    pub fn cursor(&mut self) -> Cursor<'_, T, S> {
        let hasher: fn(&Masked<T>) -> i32 = masked_hash::<T, S>;
        Cursor {
            inner: self.table.cursor(hasher),
            _strategy: PhantomData,
        }
    }

    /// Keeps only the elements for which `f` returns `true`.
    pub fn retain(&mut self, mut f: impl FnMut(Option<&T>) -> bool) {
        self.table
            .retain(|value| f(value.get()), masked_hash::<T, S>);
    }

    /// Grows ahead of joining a collection of `other_len` elements.
    ///
    /// See [`HashTable::reserve_for_join`].
    pub fn reserve_for_join(&mut self, other_len: usize) {
        self.table
            .reserve_for_join(other_len, masked_hash::<T, S>);
    }

    /// Adds every possibly-null element of `iter`.
    pub fn extend_nullable(&mut self, iter: impl IntoIterator<Item = Option<T>>) {
        let iter = iter.into_iter();
        self.reserve_for_join(iter.size_hint().0);
        for value in iter {
            self.insert_nullable(value);
        }
    }

    /// Adds every element of `other`, growing at most once up front.
    pub fn extend_from(&mut self, other: &HashSet<T, S>)
    where
        T: Clone,
    {
        self.reserve_for_join(other.len());
        for value in other.iter() {
            self.insert_nullable(value.cloned());
        }
    }

    /// Returns `true` if every element of `self` is in `other`.
    pub fn is_subset(&self, other: &HashSet<T, S>) -> bool {
        self.len() <= other.len() && self.iter().all(|v| other.contains_nullable(v))
    }

    /// Returns `true` if `self` and `other` share no element.
    pub fn is_disjoint(&self, other: &HashSet<T, S>) -> bool {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.iter().all(|v| !large.contains_nullable(v))
    }

    /// Sum of the element hash codes, the null element counting zero.
    ///
    /// Equal sets have equal content hashes whatever their capacity or
    /// insertion order.
    pub fn content_hash(&self) -> i32 {
        self.iter()
            .fold(0i32, |acc, v| acc.wrapping_add(nullable_hash::<T, S>(v)))
    }

    /// Builds a probe-distance histogram of the underlying table.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> crate::hash_table::ProbeHistogram {
        self.table.probe_histogram(masked_hash::<T, S>)
    }

    /// Collects occupancy and memory statistics of the underlying table.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> crate::hash_table::DebugStats {
        self.table.debug_stats(masked_hash::<T, S>)
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        self.table.assert_invariants(masked_hash::<T, S>, |a, b| {
            nullable_equals::<T, S>(a.get(), b.get())
        });
    }
}

impl<T, S> Default for HashSet<T, S> {
    fn default() -> Self {
        Self::new()
    }
}

/// An iterator over the elements of a `HashSet`.
pub struct Iter<'a, T> {
    inner: crate::hash_table::Iter<'a, Masked<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = Option<&'a T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Masked::get)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

/// An owning iterator over the elements of a `HashSet`.
pub struct IntoIter<T> {
    inner: crate::hash_table::IntoIter<Masked<T>>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = Option<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Masked::unmask)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

/// A forward cursor over a `HashSet` that can remove the element it last
/// returned.
pub struct Cursor<'a, T, S> {
    inner: crate::hash_table::Cursor<'a, Masked<T>, fn(&Masked<T>) -> i32>,
    _strategy: PhantomData<S>,
}

impl<T, S> Cursor<'_, T, S>
where
    S: Equivalence<T>,
{
    /// Returns `true` if another element remains.
    pub fn has_next(&mut self) -> bool {
        self.inner.has_next()
    }

    /// Moves to the next element and returns it, `None` standing for the
    /// null element.
    ///
    /// # Errors
    ///
    /// [`Error::Exhausted`] if no element remains.
    pub fn advance(&mut self) -> Result<Option<&T>, Error> {
        self.inner.advance().map(|value| value.get())
    }

    /// Removes the element last returned by [`advance`](Self::advance).
    ///
    /// # Errors
    ///
    /// [`Error::NoCurrentElement`] if nothing was returned since the last
    /// removal, or the cursor is exhausted.
    pub fn remove(&mut self) -> Result<Option<T>, Error> {
        self.inner.remove().map(Masked::unmask)
    }
}

impl<T, S> IntoIterator for HashSet<T, S> {
    type IntoIter = IntoIter<T>;
    type Item = Option<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, T, S> IntoIterator for &'a HashSet<T, S> {
    type IntoIter = Iter<'a, T>;
    type Item = Option<&'a T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, S> FromIterator<T> for HashSet<T, S>
where
    S: Equivalence<T>,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = HashSet::new();
        set.extend(iter);
        set
    }
}

impl<T, S> Extend<T> for HashSet<T, S>
where
    S: Equivalence<T>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve_for_join(iter.size_hint().0);
        for value in iter {
            self.insert(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::BTreeSet;
    use alloc::format;
    use alloc::rc::Rc;
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::hash::BuildHasherDefault;
    use core::hash::Hash;
    use core::hash::Hasher;

    use rand::Rng;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use siphasher::sip::SipHasher;

    use super::*;

    /// Every instance hashes identically, so all of them share a home slot.
    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Colliding(u32);

    impl Hash for Colliding {
        fn hash<H: Hasher>(&self, state: &mut H) {
            0u8.hash(state);
        }
    }

    #[test]
    fn test_new_and_with_capacity() {
        let set: HashSet<i32> = HashSet::new();
        assert!(set.is_empty());
        assert_eq!(set.capacity(), 4);

        let set: HashSet<i32> = HashSet::with_capacity(100);
        assert!(set.is_empty());
        assert_eq!(set.capacity(), 256);
    }

    #[test]
    fn test_insert_and_contains() {
        let mut set = HashSet::<i32>::new();
        assert!(set.insert(1));
        assert!(set.insert(2));
        assert!(!set.insert(1));
        assert_eq!(set.len(), 2);
        assert!(set.contains(&1));
        assert!(set.contains(&2));
        assert!(!set.contains(&3));
    }

    #[test]
    fn test_remove() {
        let mut set = HashSet::<i32>::new();
        set.insert(1);
        set.insert(2);
        assert!(set.remove(&1));
        assert!(!set.remove(&1));
        assert_eq!(set.len(), 1);
        assert!(!set.contains(&1));
        assert!(set.contains(&2));
    }

    #[test]
    fn test_take_and_get() {
        let mut set = HashSet::<String>::new();
        set.insert("hello".to_string());
        assert_eq!(set.get(&"hello".to_string()), Some(&"hello".to_string()));
        assert_eq!(set.take(&"hello".to_string()), Some("hello".to_string()));
        assert_eq!(set.take(&"hello".to_string()), None);
        assert!(set.is_empty());
    }

    #[test]
    fn test_null_element() {
        let mut set = HashSet::<i32>::new();
        assert!(!set.contains_nullable(None));
        assert!(set.insert_nullable(None));
        assert!(!set.insert_nullable(None));
        assert!(set.insert(0));
        assert_eq!(set.len(), 2);
        assert!(set.contains_nullable(None));
        assert!(set.contains(&0));

        let mut items: Vec<Option<i32>> = set.iter().map(|v| v.copied()).collect();
        items.sort();
        assert_eq!(items, vec![None, Some(0)]);

        assert!(set.remove_nullable(None));
        assert!(!set.contains_nullable(None));
        assert!(set.contains(&0));
        set.assert_invariants();
    }

    #[test]
    fn test_clear() {
        let mut set = HashSet::<i32>::new();
        for i in 0..20 {
            set.insert(i);
        }
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.capacity(), 4);
        assert!(!set.contains(&1));
    }

    #[test]
    fn test_iter_and_into_iter() {
        let set: HashSet<i32> = [1, 2, 3].into_iter().collect();
        let mut seen: Vec<i32> = set.iter().flatten().copied().collect();
        seen.sort();
        assert_eq!(seen, vec![1, 2, 3]);
        assert_eq!(set.iter().len(), 3);

        let mut owned: Vec<i32> = set.into_iter().flatten().collect();
        owned.sort();
        assert_eq!(owned, vec![1, 2, 3]);
    }

    #[test]
    fn test_drain() {
        let mut set: HashSet<i32> = (0..10).collect();
        let drained: Vec<Option<i32>> = set.drain().collect();
        assert_eq!(drained.len(), 10);
        assert!(set.is_empty());
        assert_eq!(set.capacity(), 4);
    }

    #[test]
    fn test_collision_handling() {
        let mut set = HashSet::<Colliding>::new();
        for i in 0..40 {
            assert!(set.insert(Colliding(i)));
        }
        set.assert_invariants();
        for i in (0..40).step_by(2) {
            assert!(set.remove(&Colliding(i)));
            set.assert_invariants();
        }
        for i in 0..40 {
            assert_eq!(set.contains(&Colliding(i)), i % 2 == 1);
        }
    }

    #[test]
    fn test_cursor_removal() {
        let mut set: HashSet<u32> = (0..100).collect();
        set.insert_nullable(None);
        let mut cursor = set.cursor();
        while let Ok(value) = cursor.advance() {
            if value.is_none_or(|v| v % 3 == 0) {
                cursor.remove().unwrap();
            }
        }
        assert_eq!(cursor.remove(), Err(Error::NoCurrentElement));
        assert_eq!(set.len(), 66);
        assert!(!set.contains_nullable(None));
        for i in 0..100 {
            assert_eq!(set.contains(&i), i % 3 != 0);
        }
        set.assert_invariants();
    }

    #[test]
    fn test_retain() {
        let mut set: HashSet<Colliding> = (0..30).map(Colliding).collect();
        set.retain(|v| v.is_some_and(|c| c.0 < 10));
        assert_eq!(set.len(), 10);
        set.assert_invariants();
    }

    #[test]
    fn test_equality_ignores_layout() {
        let a: HashSet<i32> = (0..10).collect();
        let mut b: HashSet<i32> = HashSet::with_capacity(200);
        for i in (0..10).rev() {
            b.insert(i);
        }
        assert_eq!(a, b);
        assert_eq!(a.content_hash(), b.content_hash());
        b.remove(&3);
        assert_ne!(a, b);
    }

    #[test]
    fn test_subset_and_disjoint() {
        let small: HashSet<i32> = [1, 2].into_iter().collect();
        let large: HashSet<i32> = [1, 2, 3].into_iter().collect();
        let other: HashSet<i32> = [7, 8].into_iter().collect();
        assert!(small.is_subset(&large));
        assert!(!large.is_subset(&small));
        assert!(small.is_disjoint(&other));
        assert!(!small.is_disjoint(&large));
    }

    #[test]
    fn test_extend_with_duplicates_does_not_grow() {
        let mut set: HashSet<i32> = [1, 2, 3].into_iter().collect();
        assert_eq!(set.capacity(), 4);
        set.extend([1, 2, 3]);
        assert_eq!(set.capacity(), 4);
        set.extend_nullable([None, Some(4)]);
        assert_eq!(set.len(), 5);
    }

    #[test]
    fn test_extend_from_joins_once() {
        let mut a: HashSet<i32> = (0..6).collect();
        let b: HashSet<i32> = (0..6).collect();
        let capacity = a.capacity();
        a.extend_from(&b);
        assert_eq!(a.capacity(), capacity);
        assert_eq!(a, b);

        let mut c: HashSet<i32> = HashSet::new();
        c.insert_nullable(None);
        c.extend_from(&b);
        assert_eq!(c.len(), 7);
        assert!(c.contains_nullable(None));
        c.assert_invariants();
    }

    #[test]
    fn test_identity_keeps_equal_values_apart() {
        let a = Rc::new("name".to_string());
        let b = Rc::new("name".to_string());

        let mut by_value = HashSet::<Rc<String>>::new();
        by_value.insert(Rc::clone(&a));
        by_value.insert(Rc::clone(&b));
        assert_eq!(by_value.len(), 1);

        let mut by_identity = IdentityHashSet::<Rc<String>>::new();
        assert!(by_identity.insert(Rc::clone(&a)));
        assert!(by_identity.insert(Rc::clone(&b)));
        assert!(!by_identity.insert(Rc::clone(&a)));
        assert_eq!(by_identity.len(), 2);
        assert!(by_identity.contains(&a));
        by_identity.assert_invariants();
    }

    #[test]
    fn test_identity_of_boxes() {
        let boxes: Vec<Box<u8>> = (0..8).map(|_| Box::new(1)).collect();
        let mut set = IdentityHashSet::<&Box<u8>>::new();
        for b in &boxes {
            set.insert(b);
        }
        assert_eq!(set.len(), 8);
        assert!(set.contains(&&boxes[3]));
    }

    #[test]
    fn test_custom_hasher() {
        let mut set = HashSet::<u64, Value<BuildHasherDefault<SipHasher>>>::new();
        for i in 0..64 {
            set.insert(i);
        }
        for i in 0..64 {
            assert!(set.contains(&i));
        }
        set.assert_invariants();
    }

    #[test]
    fn test_random_operations_match_model() {
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        let mut set = HashSet::<u16>::new();
        let mut model = BTreeSet::new();
        for _ in 0..5000 {
            let value = rng.random_range(0..200u16);
            if rng.random_bool(0.6) {
                assert_eq!(set.insert(value), model.insert(value));
            } else {
                assert_eq!(set.remove(&value), model.remove(&value));
            }
            assert_eq!(set.len(), model.len());
        }
        set.assert_invariants();
        for value in 0..200u16 {
            assert_eq!(set.contains(&value), model.contains(&value));
        }
    }

    #[test]
    fn test_debug() {
        let mut set = HashSet::<i32>::new();
        set.insert_nullable(None);
        assert_eq!(format!("{:?}", set), "{null}");
    }
}

use core::fmt::Debug;
use core::marker::PhantomData;

use crate::error::Error;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;
use crate::masked::Masked;
use crate::masked::NullableDebug;
use crate::masked::nullable_equals;
use crate::masked::nullable_hash;
use crate::strategy::Equivalence;
use crate::strategy::Identity;
use crate::strategy::Value;

/// What one table slot of a map holds.
pub(crate) type Slot<K, V> = (Masked<K>, V);

type SlotHasher<K, V> = fn(&Slot<K, V>) -> i32;

#[inline(always)]
pub(crate) fn slot_hash<K, V, S>(slot: &Slot<K, V>) -> i32
where
    S: Equivalence<K>,
{
    nullable_hash::<K, S>(slot.0.get())
}

/// A hash map implemented using the linear-probing [`HashTable`] as the
/// underlying storage.
///
/// `HashMap<K, V, S, VS>` compares keys with the strategy `S` and values with
/// the strategy `VS`; both default to [`Value`]. One entry may have the null
/// key, addressed by the `*_nullable` methods as `None`.
///
/// # Performance Characteristics
///
/// - **Memory**: one `Option<(K, V)>`-sized slot per capacity unit with no
///   stored hashes or control bytes.
pub struct HashMap<K, V, S = Value, VS = Value> {
    table: HashTable<Slot<K, V>>,
    _strategy: PhantomData<(S, VS)>,
}

/// A hash map comparing keys by identity and values with `VS`.
pub type IdentityHashMap<K, V, VS = Value> = HashMap<K, V, Identity, VS>;

impl<K: Clone, V: Clone, S, VS> Clone for HashMap<K, V, S, VS> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            _strategy: PhantomData,
        }
    }
}

impl<K, V, S, VS> Debug for HashMap<K, V, S, VS>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in self.iter() {
            map.entry(&NullableDebug(k), v);
        }
        map.finish()
    }
}

impl<K, V, S, VS> HashMap<K, V, S, VS> {
    /// Creates an empty map with the initial four slots.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty map that holds `capacity` entries without growing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lean_hash::HashMap;
    ///
    /// let map: HashMap<i32, String> = HashMap::with_capacity(10);
    /// assert_eq!(map.capacity(), 16);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_table(HashTable::with_capacity(capacity))
    }

    pub(crate) fn from_table(table: HashTable<Slot<K, V>>) -> Self {
        Self {
            table,
            _strategy: PhantomData,
        }
    }

    #[cfg(feature = "serde")]
    pub(crate) fn table(&self) -> &HashTable<Slot<K, V>> {
        &self.table
    }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots in the underlying table.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Removes all entries and returns to the initial four slots.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns an iterator over the entries in slot order. The null key is
    /// yielded as `None`.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the keys in slot order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values in slot order.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Returns an iterator over mutable references to the values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lean_hash::HashMap;
    ///
    /// let mut map: HashMap<&str, i32> = HashMap::new();
    /// map.insert("a", 1);
    /// map.insert("b", 2);
    /// for value in map.values_mut() {
    ///     *value *= 10;
    /// }
    /// assert_eq!(map.get(&"b"), Some(&20));
    /// ```
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.table.iter_mut(),
        }
    }

    /// Removes and yields every entry. The map is left empty at its initial
    /// capacity.
    pub fn drain(&mut self) -> IntoIter<K, V> {
        IntoIter {
            inner: self.table.drain(),
        }
    }
}

impl<K, V, S, VS> HashMap<K, V, S, VS>
where
    S: Equivalence<K>,
{
    #[inline]
    fn find_index(&self, key: Option<&K>) -> Option<usize> {
        self.table.find_index(nullable_hash::<K, S>(key), |(k, _)| {
            nullable_equals::<K, S>(k.get(), key)
        })
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the key was present its value is replaced and the old value is
    /// returned; the stored key is kept. The table grows only when the key
    /// is new.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lean_hash::HashMap;
    ///
    /// let mut map: HashMap<i32, &str> = HashMap::new();
    /// assert_eq!(map.insert(37, "a"), None);
    /// assert_eq!(map.insert(37, "b"), Some("a"));
    /// assert_eq!(map.get(&37), Some(&"b"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.insert_nullable(Some(key), value)
    }

    /// Inserts a pair whose key may be null.
    pub fn insert_nullable(&mut self, key: Option<K>, value: V) -> Option<V> {
        let hash = nullable_hash::<K, S>(key.as_ref());
        match self.table.entry(
            hash,
            |(k, _)| nullable_equals::<K, S>(k.get(), key.as_ref()),
            slot_hash::<K, V, S>,
        ) {
            TableEntry::Occupied(mut entry) => {
                let old_value = core::mem::replace(&mut entry.get_mut().1, value);
                Some(old_value)
            }
            TableEntry::Vacant(entry) => {
                entry.insert((Masked::mask(key), value));
                None
            }
        }
    }

    /// Returns a reference to the value for `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_nullable(Some(key))
    }

    /// Returns a reference to the value for a key that may be null.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lean_hash::HashMap;
    ///
    /// let mut map: HashMap<String, u32> = HashMap::new();
    /// map.insert_nullable(None, 7);
    /// assert_eq!(map.get_nullable(None), Some(&7));
    /// assert!(map.contains_key_nullable(None));
    /// ```
    pub fn get_nullable(&self, key: Option<&K>) -> Option<&V> {
        let index = self.find_index(key)?;
        self.table.get_slot(index).map(|(_, v)| v)
    }

    /// Returns a mutable reference to the value for `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.get_mut_nullable(Some(key))
    }

    /// Returns a mutable reference to the value for a key that may be null.
    pub fn get_mut_nullable(&mut self, key: Option<&K>) -> Option<&mut V> {
        let hash = nullable_hash::<K, S>(key);
        self.table
            .find_mut(hash, |(k, _)| nullable_equals::<K, S>(k.get(), key))
            .map(|(_, v)| v)
    }

    /// Returns `true` if the map contains `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.contains_key_nullable(Some(key))
    }

    /// Returns `true` if the map contains a key that may be null.
    pub fn contains_key_nullable(&self, key: Option<&K>) -> bool {
        self.find_index(key).is_some()
    }

    /// Removes `key` from the map, returning its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_nullable(Some(key))
    }

    /// Removes a key that may be null, returning its value.
    pub fn remove_nullable(&mut self, key: Option<&K>) -> Option<V> {
        self.remove_entry_nullable(key).map(|(_, v)| v)
    }

    /// Removes `key` from the map, returning the stored key and its value.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        match self.remove_entry_nullable(Some(key))? {
            (Some(k), v) => Some((k, v)),
            (None, _) => None,
        }
    }

    fn remove_entry_nullable(&mut self, key: Option<&K>) -> Option<(Option<K>, V)> {
        let index = self.find_index(key)?;
        self.table
            .remove_at(index, slot_hash::<K, V, S>)
            .map(|(k, v)| (k.unmask(), v))
    }

    /// Gets the entry for `key` for in-place manipulation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lean_hash::HashMap;
    ///
    /// let mut counts: HashMap<&str, u32> = HashMap::new();
    /// for word in ["a", "b", "a"] {
    ///     *counts.entry(word).or_insert(0) += 1;
    /// }
    /// assert_eq!(counts.get(&"a"), Some(&2));
    /// ```
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V> {
        self.entry_nullable(Some(key))
    }

    /// Gets the entry for a key that may be null.
    pub fn entry_nullable(&mut self, key: Option<K>) -> Entry<'_, K, V> {
        let hash = nullable_hash::<K, S>(key.as_ref());
        let hasher: SlotHasher<K, V> = slot_hash::<K, V, S>;
        match self.table.entry(
            hash,
            |(k, _)| nullable_equals::<K, S>(k.get(), key.as_ref()),
            hasher,
        ) {
            TableEntry::Occupied(entry) => Entry::Occupied(OccupiedEntry { entry }),
            TableEntry::Vacant(entry) => Entry::Vacant(VacantEntry { entry, key }),
        }
    }

    /// Returns a cursor that walks the map and can remove the entry it last
    /// returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lean_hash::HashMap;
    ///
    /// let mut map: HashMap<u32, u32> = (0..8).map(|i| (i, i * i)).collect();
    /// let mut cursor = map.cursor();
    /// while let Ok(mut entry) = cursor.advance() {
    ///     if *entry.value() > 10 {
    ///         entry.set_value(0);
    ///     }
    /// }
    /// assert_eq!(map.get(&7), Some(&0));
    /// assert_eq!(map.get(&3), Some(&9));
    /// ```
    pub fn cursor(&mut self) -> Cursor<'_, K, V> {
        let hasher: SlotHasher<K, V> = slot_hash::<K, V, S>;
        Cursor {
            inner: self.table.cursor(hasher),
        }
    }

    /// Keeps only the entries for which `f` returns `true`.
    pub fn retain(&mut self, mut f: impl FnMut(Option<&K>, &mut V) -> bool) {
        self.table
            .retain(|(k, v)| f(k.get(), v), slot_hash::<K, V, S>);
    }

    /// Grows ahead of joining a collection of `other_len` entries.
    ///
    /// See [`HashTable::reserve_for_join`].
    pub fn reserve_for_join(&mut self, other_len: usize) {
        self.table
            .reserve_for_join(other_len, slot_hash::<K, V, S>);
    }

    /// Inserts every pair of `iter`, whose keys may be null.
    pub fn extend_nullable(&mut self, iter: impl IntoIterator<Item = (Option<K>, V)>) {
        let iter = iter.into_iter();
        self.reserve_for_join(iter.size_hint().0);
        for (k, v) in iter {
            self.insert_nullable(k, v);
        }
    }

    /// Copies every entry of `other` into `self`, growing at most once up
    /// front. Values of keys already present are replaced.
    pub fn put_all(&mut self, other: &HashMap<K, V, S, VS>)
    where
        K: Clone,
        V: Clone,
    {
        self.reserve_for_join(other.len());
        for (k, v) in other.iter() {
            self.insert_nullable(k.cloned(), v.clone());
        }
    }

    /// Creates a map holding a copy of every entry of `other`.
    pub fn from_map(other: &HashMap<K, V, S, VS>) -> Self
    where
        K: Clone,
        V: Clone,
    {
        let mut map = Self::with_capacity(other.len());
        map.put_all(other);
        map
    }

    /// Builds a probe-distance histogram of the underlying table.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> crate::hash_table::ProbeHistogram {
        self.table.probe_histogram(slot_hash::<K, V, S>)
    }

    /// Collects occupancy and memory statistics of the underlying table.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> crate::hash_table::DebugStats {
        self.table.debug_stats(slot_hash::<K, V, S>)
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        self.table.assert_invariants(slot_hash::<K, V, S>, |a, b| {
            nullable_equals::<K, S>(a.0.get(), b.0.get())
        });
    }
}

impl<K, V, S, VS> HashMap<K, V, S, VS>
where
    S: Equivalence<K>,
    VS: Equivalence<V>,
{
    /// Returns `true` if some entry holds a value equal to `value`.
    ///
    /// This is a linear scan.
    pub fn contains_value(&self, value: &V) -> bool {
        self.values().any(|v| VS::equals(v, value))
    }

    /// Removes the first entry, in slot order, whose value equals `value`.
    /// Returns `true` if one was removed.
    pub fn remove_value(&mut self, value: &V) -> bool {
        let mut cursor = self.cursor();
        while let Ok(entry) = cursor.advance() {
            if VS::equals(entry.value(), value) {
                return cursor.remove().is_ok();
            }
        }
        false
    }

    /// Sum over the entries of `hash(key) ^ hash(value)`, the null key
    /// hashing to zero.
    pub fn content_hash(&self) -> i32 {
        self.iter().fold(0i32, |acc, (k, v)| {
            acc.wrapping_add(nullable_hash::<K, S>(k) ^ VS::hash(v))
        })
    }
}

impl<K, V, S, VS> PartialEq for HashMap<K, V, S, VS>
where
    S: Equivalence<K>,
    VS: Equivalence<V>,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|(k, v)| {
            other
                .get_nullable(k)
                .is_some_and(|other_v| VS::equals(v, other_v))
        })
    }
}

impl<K, V, S, VS> Eq for HashMap<K, V, S, VS>
where
    S: Equivalence<K>,
    VS: Equivalence<V>,
{
}

impl<K, V, S, VS> Default for HashMap<K, V, S, VS> {
    fn default() -> Self {
        Self::new()
    }
}

/// A view into a single entry in a map, which may either be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashMap`].
///
/// [`entry`]: HashMap::entry
pub enum Entry<'a, K, V> {
    /// A vacant entry - the key is not present in the map
    Vacant(VacantEntry<'a, K, V>),
    /// An occupied entry - the key is present in the map
    Occupied(OccupiedEntry<'a, K, V>),
}

impl<'a, K, V> Entry<'a, K, V> {
    /// Ensures a value is in the entry by inserting the default if empty, and
    /// returns a mutable reference to the value in the entry.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Ensures a value is in the entry by inserting the result of the default
    /// function if empty, and returns a mutable reference to the value in the
    /// entry.
    pub fn or_insert_with<F>(self, default: F) -> &'a mut V
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Provides in-place mutable access to an occupied entry before any
    /// potential inserts into the map.
    pub fn and_modify<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// Returns this entry's key, `None` for the null key.
    pub fn key(&self) -> Option<&K> {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }
}

impl<'a, K, V> Entry<'a, K, V>
where
    V: Default,
{
    /// Ensures a value is in the entry by inserting the default value if
    /// empty.
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(Default::default)
    }
}

/// A view into a vacant entry in a `HashMap`.
pub struct VacantEntry<'a, K, V> {
    entry: crate::hash_table::VacantEntry<'a, Slot<K, V>, SlotHasher<K, V>>,
    key: Option<K>,
}

impl<'a, K, V> VacantEntry<'a, K, V> {
    /// Gets a reference to the key that would be used when inserting.
    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    /// Takes ownership of the key.
    pub fn into_key(self) -> Option<K> {
        self.key
    }

    /// Sets the value of the entry with the vacant entry's key, and returns a
    /// mutable reference to it. Grows the map first if needed.
    pub fn insert(self, value: V) -> &'a mut V {
        &mut self.entry.insert((Masked::mask(self.key), value)).1
    }
}

/// A view into an occupied entry in a `HashMap`.
pub struct OccupiedEntry<'a, K, V> {
    entry: crate::hash_table::OccupiedEntry<'a, Slot<K, V>, SlotHasher<K, V>>,
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    /// Gets a reference to the stored key.
    pub fn key(&self) -> Option<&K> {
        self.entry.get().0.get()
    }

    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        &self.entry.get().1
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.entry.get_mut().1
    }

    /// Converts the entry into a mutable reference to the value with the
    /// map's lifetime.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.entry.into_mut().1
    }

    /// Sets the value of the entry and returns the old value.
    pub fn insert(&mut self, value: V) -> V {
        core::mem::replace(&mut self.entry.get_mut().1, value)
    }

    /// Removes the entry from the map and returns its value.
    pub fn remove(self) -> V {
        self.entry.remove().1
    }

    /// Removes the entry from the map and returns the key and value.
    pub fn remove_entry(self) -> (Option<K>, V) {
        let (k, v) = self.entry.remove();
        (k.unmask(), v)
    }
}

/// A forward cursor over a `HashMap` that can remove the entry it last
/// returned.
pub struct Cursor<'a, K, V> {
    inner: crate::hash_table::Cursor<'a, Slot<K, V>, SlotHasher<K, V>>,
}

impl<K, V> Cursor<'_, K, V> {
    /// Returns `true` if another entry remains.
    pub fn has_next(&mut self) -> bool {
        self.inner.has_next()
    }

    /// Moves to the next entry and returns a view of it.
    ///
    /// # Errors
    ///
    /// [`Error::Exhausted`] if no entry remains.
    pub fn advance(&mut self) -> Result<EntryView<'_, K, V>, Error> {
        self.inner.advance().map(|slot| EntryView { slot })
    }

    /// Removes the entry last returned by [`advance`](Self::advance) and
    /// returns it.
    ///
    /// # Errors
    ///
    /// [`Error::NoCurrentElement`] if nothing was returned since the last
    /// removal, or the cursor is exhausted.
    pub fn remove(&mut self) -> Result<(Option<K>, V), Error> {
        self.inner.remove().map(|(k, v)| (k.unmask(), v))
    }
}

/// A live view of the entry a [`Cursor`] stands on.
///
/// It borrows the cursor, so it must be dropped before the cursor moves or
/// removes.
pub struct EntryView<'a, K, V> {
    slot: &'a mut Slot<K, V>,
}

impl<K, V> EntryView<'_, K, V> {
    /// The entry's key, `None` for the null key.
    pub fn key(&self) -> Option<&K> {
        self.slot.0.get()
    }

    /// The entry's value.
    pub fn value(&self) -> &V {
        &self.slot.1
    }

    /// A mutable reference to the entry's value.
    pub fn value_mut(&mut self) -> &mut V {
        &mut self.slot.1
    }

    /// Replaces the entry's value, returning the previous one.
    pub fn set_value(&mut self, value: V) -> V {
        core::mem::replace(&mut self.slot.1, value)
    }
}

/// An iterator over the entries of a `HashMap`.
pub struct Iter<'a, K, V> {
    inner: crate::hash_table::Iter<'a, Slot<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (Option<&'a K>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k.get(), v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// An iterator over the keys of a `HashMap`.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = Option<&'a K>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// An iterator over the values of a `HashMap`.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// An iterator over mutable references to the values of a `HashMap`.
pub struct ValuesMut<'a, K, V> {
    inner: crate::hash_table::IterMut<'a, Slot<K, V>>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// An owning iterator over the entries of a `HashMap`.
pub struct IntoIter<K, V> {
    inner: crate::hash_table::IntoIter<Slot<K, V>>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (Option<K>, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k.unmask(), v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V, S, VS> IntoIterator for HashMap<K, V, S, VS> {
    type IntoIter = IntoIter<K, V>;
    type Item = (Option<K>, V);

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, K, V, S, VS> IntoIterator for &'a HashMap<K, V, S, VS> {
    type IntoIter = Iter<'a, K, V>;
    type Item = (Option<&'a K>, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, S, VS> FromIterator<(K, V)> for HashMap<K, V, S, VS>
where
    S: Equivalence<K>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = HashMap::new();
        map.extend(iter);
        map
    }
}

impl<K, V, S, VS> Extend<(K, V)> for HashMap<K, V, S, VS>
where
    S: Equivalence<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve_for_join(iter.size_hint().0);
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::format;
    use alloc::rc::Rc;
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::hash::BuildHasherDefault;
    use core::hash::Hash;
    use core::hash::Hasher;

    use pretty_assertions::assert_eq;
    use rand::Rng;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use siphasher::sip::SipHasher;

    use super::*;

    /// Every key hashes identically, so all of them share a home slot.
    #[derive(Debug, Clone, PartialEq, Eq)]
    struct CollidingKey(u32);

    impl Hash for CollidingKey {
        fn hash<H: Hasher>(&self, state: &mut H) {
            0u8.hash(state);
        }
    }

    #[test]
    fn test_new_and_with_capacity() {
        let map: HashMap<i32, String> = HashMap::new();
        assert!(map.is_empty());
        assert_eq!(map.capacity(), 4);

        let map: HashMap<i32, String> = HashMap::with_capacity(7);
        assert_eq!(map.capacity(), 16);
        let map: HashMap<i32, String> = HashMap::with_capacity(6);
        assert_eq!(map.capacity(), 8);
    }

    #[test]
    fn test_insert_and_get() {
        let mut map: HashMap<i32, String> = HashMap::new();
        assert_eq!(map.insert(1, "one".to_string()), None);
        assert_eq!(map.insert(2, "two".to_string()), None);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&1), Some(&"one".to_string()));
        assert_eq!(map.get(&3), None);

        assert_eq!(
            map.insert(1, "uno".to_string()),
            Some("one".to_string())
        );
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&1), Some(&"uno".to_string()));
        map.assert_invariants();
    }

    #[test]
    fn test_overwrite_does_not_grow() {
        let mut map: HashMap<i32, i32> = HashMap::new();
        for i in 0..3 {
            map.insert(i, i);
        }
        assert_eq!(map.capacity(), 4);
        for i in 0..3 {
            map.insert(i, i + 1);
        }
        assert_eq!(map.capacity(), 4);
    }

    #[test]
    fn test_get_mut() {
        let mut map: HashMap<i32, i32> = HashMap::new();
        map.insert(1, 10);
        if let Some(value) = map.get_mut(&1) {
            *value = 20;
        }
        assert_eq!(map.get(&1), Some(&20));
        assert_eq!(map.get_mut(&2), None);
    }

    #[test]
    fn test_remove() {
        let mut map: HashMap<i32, String> = HashMap::new();
        map.insert(1, "one".to_string());
        map.insert(2, "two".to_string());

        assert_eq!(map.remove(&1), Some("one".to_string()));
        assert_eq!(map.remove(&1), None);
        assert_eq!(map.len(), 1);
        assert!(!map.contains_key(&1));
        assert!(map.contains_key(&2));

        assert_eq!(map.remove_entry(&2), Some((2, "two".to_string())));
        assert!(map.is_empty());
    }

    #[test]
    fn test_null_key() {
        let mut map: HashMap<String, i32> = HashMap::new();
        assert!(!map.contains_key_nullable(None));
        assert_eq!(map.insert_nullable(None, 1), None);
        assert_eq!(map.insert_nullable(None, 2), Some(1));
        map.insert("".to_string(), 3);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get_nullable(None), Some(&2));
        assert_eq!(map.get(&"".to_string()), Some(&3));

        let keys: Vec<Option<&String>> = map.keys().filter(|k| k.is_none()).collect();
        assert_eq!(keys, vec![None]);

        assert_eq!(map.remove_nullable(None), Some(2));
        assert!(!map.contains_key_nullable(None));
        assert_eq!(map.remove_entry(&"".to_string()), Some(("".to_string(), 3)));
        map.assert_invariants();
    }

    #[test]
    fn test_entry_api() {
        let mut map: HashMap<i32, String> = HashMap::new();

        let value = map.entry(1).or_insert("one".to_string());
        assert_eq!(value, &"one".to_string());
        *value = "ONE".to_string();
        assert_eq!(map.get(&1), Some(&"ONE".to_string()));

        let value = map.entry(2).or_insert_with(|| "two".to_string());
        assert_eq!(value, &"two".to_string());

        map.entry(1).and_modify(|v| v.push('!'));
        assert_eq!(map.get(&1), Some(&"ONE!".to_string()));

        assert_eq!(map.entry(5).key(), Some(&5));
        assert_eq!(map.entry_nullable(None).key(), None);
    }

    #[test]
    fn test_entry_or_default() {
        let mut map: HashMap<&str, Vec<u8>> = HashMap::new();
        map.entry("a").or_default().push(1);
        map.entry("a").or_default().push(2);
        map.entry_nullable(None).or_default().push(3);
        assert_eq!(map.get(&"a"), Some(&vec![1, 2]));
        assert_eq!(map.get_nullable(None), Some(&vec![3]));
    }

    #[test]
    fn test_occupied_entry() {
        let mut map: HashMap<i32, String> = HashMap::new();
        map.insert(1, "one".to_string());

        match map.entry(1) {
            Entry::Occupied(mut entry) => {
                assert_eq!(entry.key(), Some(&1));
                assert_eq!(entry.get(), &"one".to_string());
                let old = entry.insert("uno".to_string());
                assert_eq!(old, "one".to_string());
                assert_eq!(entry.remove_entry(), (Some(1), "uno".to_string()));
            }
            Entry::Vacant(_) => panic!("Expected occupied entry"),
        }
        assert!(map.is_empty());
    }

    #[test]
    fn test_vacant_entry_grows_before_placing() {
        let mut map: HashMap<i32, i32> = HashMap::new();
        for i in 0..3 {
            map.insert(i, i);
        }
        match map.entry(3) {
            Entry::Vacant(entry) => {
                assert_eq!(entry.key(), Some(&3));
                *entry.insert(30) += 1;
            }
            Entry::Occupied(_) => panic!("Expected vacant entry"),
        }
        assert_eq!(map.capacity(), 8);
        assert_eq!(map.get(&3), Some(&31));
        map.assert_invariants();
    }

    #[test]
    fn test_iterators() {
        let map: HashMap<i32, i32> = [(1, 10), (2, 20), (3, 30)].into_iter().collect();

        let mut pairs: Vec<(i32, i32)> = map
            .iter()
            .map(|(k, v)| (*k.unwrap(), *v))
            .collect();
        pairs.sort();
        assert_eq!(pairs, vec![(1, 10), (2, 20), (3, 30)]);

        let mut keys: Vec<i32> = map.keys().flatten().copied().collect();
        keys.sort();
        assert_eq!(keys, vec![1, 2, 3]);

        let mut values: Vec<i32> = map.values().copied().collect();
        values.sort();
        assert_eq!(values, vec![10, 20, 30]);
        assert_eq!(map.iter().len(), 3);
    }

    #[test]
    fn test_drain() {
        let mut map: HashMap<i32, i32> = (0..10).map(|i| (i, i)).collect();
        let mut drained: Vec<(Option<i32>, i32)> = map.drain().collect();
        drained.sort();
        assert_eq!(drained.len(), 10);
        assert_eq!(drained[0], (Some(0), 0));
        assert!(map.is_empty());
        assert_eq!(map.capacity(), 4);
    }

    #[test]
    fn test_ten_keys_reach_sixteen_slots() {
        let mut map: HashMap<CollidingKey, u32> = HashMap::new();
        assert_eq!(map.capacity(), 4);
        for i in 1..=10 {
            map.insert(CollidingKey(i), i);
        }
        assert_eq!(map.len(), 10);
        assert_eq!(map.capacity(), 16);

        assert_eq!(map.remove(&CollidingKey(5)), Some(5));
        let mut keys: Vec<u32> = map.keys().flatten().map(|k| k.0).collect();
        keys.sort();
        assert_eq!(keys, vec![1, 2, 3, 4, 6, 7, 8, 9, 10]);
        map.assert_invariants();
    }

    #[test]
    fn test_collision_cluster_head_removal() {
        let mut map: HashMap<CollidingKey, u32> = HashMap::new();
        for i in 0..6 {
            map.insert(CollidingKey(i), i);
        }
        assert_eq!(map.remove(&CollidingKey(0)), Some(0));
        for i in 1..6 {
            assert_eq!(map.get(&CollidingKey(i)), Some(&i));
        }
        map.assert_invariants();
    }

    #[test]
    fn test_cursor_set_value_and_remove() {
        let mut map: HashMap<u32, u32> = (0..50).map(|i| (i, i)).collect();
        let mut cursor = map.cursor();
        while let Ok(mut entry) = cursor.advance() {
            let key = *entry.key().unwrap();
            if key % 2 == 0 {
                drop(entry);
                assert_eq!(cursor.remove().map(|(k, _)| k), Ok(Some(key)));
            } else {
                entry.set_value(key * 100);
            }
        }
        assert_eq!(cursor.advance().err(), Some(Error::Exhausted));
        assert_eq!(map.len(), 25);
        for i in 0..50 {
            if i % 2 == 0 {
                assert!(!map.contains_key(&i));
            } else {
                assert_eq!(map.get(&i), Some(&(i * 100)));
            }
        }
        map.assert_invariants();
    }

    #[test]
    fn test_retain() {
        let mut map: HashMap<CollidingKey, u32> =
            (0..20).map(|i| (CollidingKey(i), i)).collect();
        map.retain(|_, v| {
            *v += 1;
            *v % 2 == 0
        });
        assert_eq!(map.len(), 10);
        for v in map.values() {
            assert_eq!(v % 2, 0);
        }
        map.assert_invariants();
    }

    #[test]
    fn test_contains_and_remove_value() {
        let mut map: HashMap<i32, &str> = HashMap::new();
        map.insert(1, "a");
        map.insert(2, "b");
        map.insert_nullable(None, "c");
        assert!(map.contains_value(&"c"));
        assert!(!map.contains_value(&"z"));

        assert!(map.remove_value(&"c"));
        assert!(!map.contains_key_nullable(None));
        assert!(!map.remove_value(&"c"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_put_all_and_from_map() {
        let mut a: HashMap<i32, i32> = (0..6).map(|i| (i, i)).collect();
        let b: HashMap<i32, i32> = (0..6).map(|i| (i, i * 2)).collect();
        let capacity = a.capacity();
        a.put_all(&b);
        assert_eq!(a.capacity(), capacity);
        assert_eq!(a, b);

        let c = HashMap::from_map(&b);
        assert_eq!(c, b);
        c.assert_invariants();
    }

    #[test]
    fn test_equality_and_content_hash() {
        let a: HashMap<i32, i32> = (0..10).map(|i| (i, i)).collect();
        let mut b: HashMap<i32, i32> = HashMap::with_capacity(100);
        for i in (0..10).rev() {
            b.insert(i, i);
        }
        assert_eq!(a, b);
        assert_eq!(a.content_hash(), b.content_hash());

        b.insert(3, 4);
        assert_ne!(a, b);
        b.remove(&3);
        assert_ne!(a, b);
    }

    #[test]
    fn test_identity_keys() {
        let a = Rc::new(1);
        let b = Rc::new(1);
        let mut map: IdentityHashMap<Rc<i32>, &str> = IdentityHashMap::new();
        map.insert(Rc::clone(&a), "a");
        map.insert(Rc::clone(&b), "b");
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&a), Some(&"a"));
        assert_eq!(map.get(&Rc::new(1)), None);
        assert!(map.contains_value(&"b"));
    }

    #[test]
    fn test_custom_hasher() {
        let mut map: HashMap<String, usize, Value<BuildHasherDefault<SipHasher>>> =
            HashMap::new();
        for i in 0..100 {
            map.insert(format!("key_{i}"), i);
        }
        for i in 0..100 {
            assert_eq!(map.get(&format!("key_{i}")), Some(&i));
        }
        map.assert_invariants();
    }

    #[test]
    fn test_random_operations_match_model() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut map: HashMap<u16, u32> = HashMap::new();
        let mut model = BTreeMap::new();
        for step in 0..5000u32 {
            let key = rng.random_range(0..300u16);
            match rng.random_range(0..3) {
                0 | 1 => assert_eq!(map.insert(key, step), model.insert(key, step)),
                _ => assert_eq!(map.remove(&key), model.remove(&key)),
            }
        }
        map.assert_invariants();
        assert_eq!(map.len(), model.len());
        for (k, v) in &model {
            assert_eq!(map.get(k), Some(v));
        }
    }

    #[test]
    fn test_debug() {
        let mut map: HashMap<i32, &str> = HashMap::new();
        map.insert_nullable(None, "x");
        assert_eq!(format!("{:?}", map), "{null: \"x\"}");
    }
}

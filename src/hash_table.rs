use alloc::boxed::Box;
#[cfg(any(test, feature = "stats"))]
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::error::Error;

/// Smallest power-of-two table that holds three items without rehashing.
pub(crate) const INITIAL_CAPACITY: usize = 4;

/// Returns `true` if `capacity` slots can hold `expected` items at a load
/// factor of at most 3/4.
#[inline(always)]
fn fits(capacity: usize, expected: usize) -> bool {
    capacity.saturating_mul(3) >= expected.saturating_mul(4)
}

#[inline(always)]
pub(crate) fn capacity_for(expected: usize) -> usize {
    let mut capacity = INITIAL_CAPACITY;
    while !fits(capacity, expected) {
        capacity <<= 1;
    }
    capacity
}

fn empty_slots<T>(capacity: usize) -> Box<[Option<T>]> {
    debug_assert!(capacity.is_power_of_two() && capacity >= INITIAL_CAPACITY);
    (0..capacity).map(|_| None).collect()
}

/// Scrambles a raw hash code so that codes differing only in their high bits
/// still land on different slots once masked down to a power of two.
#[inline(always)]
pub fn spread(hash: i32) -> u32 {
    let mut h = hash;
    h = h.wrapping_add(!(h << 9));
    h ^= ((h as u32) >> 14) as i32;
    h = h.wrapping_add(h << 4);
    h ^= ((h as u32) >> 10) as i32;
    h as u32
}

#[inline(always)]
fn home_slot(hash: i32, mask: usize) -> usize {
    spread(hash) as usize & mask
}

/// Probe-distance histogram of a [`HashTable`].
///
/// `buckets[d]` counts the live elements stored `d` slots past their home
/// slot.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeHistogram {
    /// Element counts indexed by probe distance.
    pub buckets: Vec<usize>,
}

#[cfg(any(test, feature = "stats"))]
impl ProbeHistogram {
    /// Pretty-print the histogram.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let total: usize = self.buckets.iter().sum();
        println!("=== Probe Distance Histogram ===");
        for (distance, count) in self.buckets.iter().enumerate() {
            if *count == 0 {
                continue;
            }
            println!(
                "{distance:>4}: {count:>8} ({:.2}%)",
                *count as f64 / total.max(1) as f64 * 100.0
            );
        }
    }
}

/// Debug statistics for hash table analysis.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of elements currently in the table
    pub populated: usize,
    /// Number of slots allocated
    pub capacity: usize,
    /// Maximum population before the next growth
    pub max_load: usize,
    /// Load factor (populated / capacity)
    pub load_factor: f64,
    /// Longest distance of any element from its home slot
    pub longest_probe: usize,
    /// Total memory in bytes used by the slot array
    pub total_bytes: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor, grows past {})",
            self.populated,
            self.capacity,
            self.load_factor * 100.0,
            self.max_load
        );
        println!("Longest probe: {}", self.longest_probe);
        println!("Total Allocated: {} bytes", self.total_bytes);
    }
}

/// A linear-probing hash table with tombstone-free removal.
///
/// `HashTable<T>` stores values of type `T` in a power-of-two slot array.
/// Like the sets and maps built on top of it, it never stores hashes: every
/// operation takes the value's raw 32-bit hash code and an equality
/// predicate, and operations that may move other values (growth, removal)
/// also take a `hasher` that recomputes the hash code of a stored value.
///
/// The table starts with four slots, doubles whenever an insertion would
/// push the load factor past 3/4, and never shrinks on its own. Removal
/// shifts displaced values back into the vacated slot, so lookups never
/// step over tombstones.
///
/// ## Example
///
/// ```rust
/// use lean_hash::hash_table::Entry;
/// use lean_hash::hash_table::HashTable;
///
/// fn hash(v: &u32) -> i32 {
///     *v as i32
/// }
///
/// let mut table = HashTable::new();
/// match table.entry(hash(&7), |v| *v == 7, hash) {
///     Entry::Vacant(entry) => {
///         entry.insert(7);
///     }
///     Entry::Occupied(_) => unreachable!(),
/// }
/// assert_eq!(table.find(hash(&7), |v| *v == 7), Some(&7));
/// assert_eq!(table.remove(hash(&7), |v| *v == 7, hash), Some(7));
/// ```
#[derive(Clone)]
pub struct HashTable<T> {
    slots: Box<[Option<T>]>,
    populated: usize,
}

/// Placeholder printed for an empty slot.
struct Vacant;

impl Debug for Vacant {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("..")
    }
}

struct SlotList<'a, T>(&'a [Option<T>]);

impl<T: Debug> Debug for SlotList<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(self.0.iter().map(|slot| match slot {
                Some(value) => value as &dyn Debug,
                None => &Vacant as &dyn Debug,
            }))
            .finish()
    }
}

impl<T: Debug> Debug for HashTable<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HashTable")
            .field("populated", &self.populated)
            .field("capacity", &self.capacity())
            .field("slots", &SlotList(&self.slots))
            .finish()
    }
}

impl<T> Default for HashTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HashTable<T> {
    /// Creates an empty table with the initial four slots.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty table large enough to hold `expected` values without
    /// growing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use lean_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<String> = HashTable::with_capacity(10);
    /// assert_eq!(table.capacity(), 16);
    /// ```
    pub fn with_capacity(expected: usize) -> Self {
        Self {
            slots: empty_slots(capacity_for(expected)),
            populated: 0,
        }
    }

    /// Creates an empty table with exactly `capacity` slots.
    ///
    /// `capacity` must be a power of two of at least four.
    #[cfg(feature = "serde")]
    pub(crate) fn with_slot_count(capacity: usize) -> Self {
        Self {
            slots: empty_slots(capacity),
            populated: 0,
        }
    }

    /// Returns the number of values in the table.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table contains no values.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of slots. Always a power of two of at least four.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline(always)]
    fn mask(&self) -> usize {
        self.slots.len() - 1
    }

    #[inline(always)]
    fn next_index(&self, index: usize) -> usize {
        (index + 1) & self.mask()
    }

    /// Probes from the home slot of `hash`. Returns `Ok(index)` of the value
    /// matching `eq`, or `Err(index)` of the empty slot that ends the probe.
    ///
    /// Terminates because the load factor leaves at least one slot empty.
    #[inline]
    fn probe(&self, hash: i32, eq: impl Fn(&T) -> bool) -> Result<usize, usize> {
        let mut index = home_slot(hash, self.mask());
        loop {
            match &self.slots[index] {
                None => return Err(index),
                Some(existing) if eq(existing) => return Ok(index),
                Some(_) => index = self.next_index(index),
            }
        }
    }

    #[inline]
    fn first_empty(&self, hash: i32) -> usize {
        let mut index = home_slot(hash, self.mask());
        while self.slots[index].is_some() {
            index = self.next_index(index);
        }
        index
    }

    /// Returns the slot index of the value matching `eq`, if any.
    pub fn find_index(&self, hash: i32, eq: impl Fn(&T) -> bool) -> Option<usize> {
        self.probe(hash, eq).ok()
    }

    /// Returns a reference to the value matching `eq`, if any.
    pub fn find(&self, hash: i32, eq: impl Fn(&T) -> bool) -> Option<&T> {
        let index = self.probe(hash, eq).ok()?;
        self.slots[index].as_ref()
    }

    /// Returns a mutable reference to the value matching `eq`, if any.
    ///
    /// The caller must not change the value in a way that changes its hash
    /// code or its equality with other stored values.
    pub fn find_mut(&mut self, hash: i32, eq: impl Fn(&T) -> bool) -> Option<&mut T> {
        let index = self.probe(hash, eq).ok()?;
        self.slots[index].as_mut()
    }

    /// Returns the value stored in slot `index`, if any.
    pub fn get_slot(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Gets the entry for the value matching `eq`.
    ///
    /// Looking up an entry never grows the table; a vacant entry grows it
    /// only when a value is actually inserted.
    pub fn entry<H>(&mut self, hash: i32, eq: impl Fn(&T) -> bool, hasher: H) -> Entry<'_, T, H>
    where
        H: Fn(&T) -> i32,
    {
        match self.probe(hash, eq) {
            Ok(index) => Entry::Occupied(OccupiedEntry {
                table: self,
                index,
                hasher,
            }),
            Err(index) => Entry::Vacant(VacantEntry {
                table: self,
                index,
                hash,
                hasher,
            }),
        }
    }

    /// Removes and returns the value matching `eq`.
    pub fn remove(
        &mut self,
        hash: i32,
        eq: impl Fn(&T) -> bool,
        hasher: impl Fn(&T) -> i32,
    ) -> Option<T> {
        let index = self.probe(hash, eq).ok()?;
        self.remove_at(index, hasher)
    }

    /// Removes the value in slot `index` and plugs the hole it leaves.
    pub(crate) fn remove_at(&mut self, index: usize, hasher: impl Fn(&T) -> i32) -> Option<T> {
        self.take_at(index, hasher).map(|(value, _)| value)
    }

    /// Like [`remove_at`](Self::remove_at), also returning the slot the
    /// value now filling `index` was shifted from.
    fn take_at(&mut self, index: usize, hasher: impl Fn(&T) -> i32) -> Option<(T, Option<usize>)> {
        let value = self.slots.get_mut(index)?.take()?;
        self.populated -= 1;
        let filled_from = self.plug_hole(index, hasher);
        Some((value, filled_from))
    }

    /// Closes the gap at `hole` by walking the cluster that follows it and
    /// shifting back every value whose probe sequence passes through the
    /// hole. Stops at the first empty slot.
    ///
    /// Returns the slot of the value moved into the original hole, if any.
    fn plug_hole(&mut self, mut hole: usize, hasher: impl Fn(&T) -> i32) -> Option<usize> {
        let mask = self.mask();
        let mut index = (hole + 1) & mask;
        let mut filled_from = None;
        loop {
            let target = match &self.slots[index] {
                Some(value) => home_slot(hasher(value), mask),
                None => break,
            };
            let shift = if hole < index {
                // No wrap between the hole and index: the value stays put if
                // its home lies in (hole, index].
                !(hole < target && target <= index)
            } else {
                // index wrapped past the end: the value moves only if its home
                // lies in (index, hole].
                index < target && target <= hole
            };
            if shift {
                self.slots[hole] = self.slots[index].take();
                filled_from.get_or_insert(index);
                hole = index;
            }
            index = (index + 1) & mask;
        }
        filled_from
    }

    /// Grows the table, if needed, so that it holds `expected` values at a
    /// load factor of at most 3/4. Returns `true` if it grew.
    ///
    /// Growth doubles the slot count until the target fits and re-homes
    /// every value, which invalidates all slot indices.
    pub fn ensure_capacity_for(&mut self, expected: usize, hasher: impl Fn(&T) -> i32) -> bool {
        if fits(self.capacity(), expected) {
            return false;
        }

        let mut capacity = self.capacity() << 1;
        while !fits(capacity, expected) {
            capacity <<= 1;
        }

        self.rehome(capacity, hasher);
        true
    }

    /// Moves every value into a fresh array of `capacity` slots.
    fn rehome(&mut self, capacity: usize, hasher: impl Fn(&T) -> i32) {
        let old = core::mem::replace(&mut self.slots, empty_slots(capacity));
        for value in old.into_vec().into_iter().flatten() {
            let index = self.first_empty(hasher(&value));
            self.slots[index] = Some(value);
        }
    }

    /// Grows ahead of joining another collection of `other_len` values.
    ///
    /// Sizes for the larger of the two rather than their sum: the incoming
    /// values may all be duplicates, in which case the table must not grow.
    /// Disjoint joins of similar sizes grow at most once more later.
    pub fn reserve_for_join(&mut self, other_len: usize, hasher: impl Fn(&T) -> i32) -> bool {
        self.ensure_capacity_for(self.populated.max(other_len), hasher)
    }

    /// Removes all values and returns to the initial four slots.
    pub fn clear(&mut self) {
        self.slots = empty_slots(INITIAL_CAPACITY);
        self.populated = 0;
    }

    /// Returns an iterator over the values in slot order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.populated,
        }
    }

    /// Returns an iterator over mutable references to the values in slot
    /// order.
    ///
    /// The same caveat as [`find_mut`](Self::find_mut) applies.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            slots: self.slots.iter_mut(),
            remaining: self.populated,
        }
    }

    /// Removes every value and returns them in slot order. The table is
    /// left empty at its initial capacity.
    pub fn drain(&mut self) -> IntoIter<T> {
        let slots = core::mem::replace(&mut self.slots, empty_slots(INITIAL_CAPACITY));
        let remaining = core::mem::take(&mut self.populated);
        IntoIter {
            slots: slots.into_vec().into_iter(),
            remaining,
        }
    }

    /// Returns a cursor that walks the table and can remove the value it
    /// last returned.
    pub fn cursor<H>(&mut self, hasher: H) -> Cursor<'_, T, H>
    where
        H: Fn(&T) -> i32,
    {
        Cursor {
            table: self,
            index: 0,
            last: None,
            hasher,
        }
    }

    /// Keeps only the values for which `f` returns `true`.
    ///
    /// `f` sees every value exactly once, in slot order. Dropped values are
    /// cleared in a single pass and the survivors re-homed afterwards, so
    /// no value is shifted past the scan.
    pub fn retain(&mut self, mut f: impl FnMut(&mut T) -> bool, hasher: impl Fn(&T) -> i32) {
        let mut dropped = 0;
        for slot in self.slots.iter_mut() {
            if slot.as_mut().is_some_and(|value| !f(value)) {
                *slot = None;
                dropped += 1;
            }
        }
        if dropped == 0 {
            return;
        }
        self.populated -= dropped;
        let capacity = self.capacity();
        self.rehome(capacity, hasher);
    }

    /// Builds a histogram of each value's distance from its home slot.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self, hasher: impl Fn(&T) -> i32) -> ProbeHistogram {
        let mask = self.mask();
        let mut buckets = Vec::new();
        for (index, slot) in self.slots.iter().enumerate() {
            if let Some(value) = slot {
                let distance = index.wrapping_sub(home_slot(hasher(value), mask)) & mask;
                if buckets.len() <= distance {
                    buckets.resize(distance + 1, 0);
                }
                buckets[distance] += 1;
            }
        }
        ProbeHistogram { buckets }
    }

    /// Collects occupancy and memory statistics.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self, hasher: impl Fn(&T) -> i32) -> DebugStats {
        let histogram = self.probe_histogram(hasher);
        DebugStats {
            populated: self.populated,
            capacity: self.capacity(),
            max_load: self.capacity() * 3 / 4,
            load_factor: self.populated as f64 / self.capacity() as f64,
            longest_probe: histogram.buckets.len().saturating_sub(1),
            total_bytes: core::mem::size_of::<Self>()
                + self.capacity() * core::mem::size_of::<Option<T>>(),
        }
    }

    /// Panics unless the load factor, probe-sequence and uniqueness
    /// invariants hold.
    #[cfg(test)]
    pub(crate) fn assert_invariants(
        &self,
        hasher: impl Fn(&T) -> i32,
        same: impl Fn(&T, &T) -> bool,
    ) {
        let capacity = self.capacity();
        assert!(capacity.is_power_of_two() && capacity >= INITIAL_CAPACITY);
        assert!(self.populated * 4 <= capacity * 3, "load factor exceeded");

        let live = self.slots.iter().filter(|slot| slot.is_some()).count();
        assert_eq!(live, self.populated, "population count drifted");

        let mask = self.mask();
        for (index, slot) in self.slots.iter().enumerate() {
            let Some(value) = slot else { continue };
            let mut probe = home_slot(hasher(value), mask);
            while probe != index {
                assert!(
                    self.slots[probe].is_some(),
                    "slot {index} unreachable from home: empty slot {probe} on its probe path"
                );
                probe = (probe + 1) & mask;
            }
            for other in self.slots[index + 1..].iter().flatten() {
                assert!(!same(value, other), "duplicate value in table");
            }
        }
    }
}

impl<T> IntoIterator for HashTable<T> {
    type IntoIter = IntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            slots: self.slots.into_vec().into_iter(),
            remaining: self.populated,
        }
    }
}

impl<'a, T> IntoIterator for &'a HashTable<T> {
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A view into a single slot of a [`HashTable`], which may either be vacant
/// or occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashTable`]. It
/// borrows the table mutably, so it cannot outlive a resize or removal.
///
/// [`entry`]: HashTable::entry
pub enum Entry<'a, T, H> {
    /// A vacant entry - no matching value is present in the table
    Vacant(VacantEntry<'a, T, H>),
    /// An occupied entry - a matching value is present in the table
    Occupied(OccupiedEntry<'a, T, H>),
}

impl<'a, T, H> Entry<'a, T, H>
where
    H: Fn(&T) -> i32,
{
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the stored value.
    pub fn or_insert(self, default: T) -> &'a mut T {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant and returns a
    /// mutable reference to the stored value.
    pub fn or_insert_with(self, default: impl FnOnce() -> T) -> &'a mut T {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Applies `f` to the stored value if the entry is occupied.
    pub fn and_modify(self, f: impl FnOnce(&mut T)) -> Self {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }
}

/// A view into a vacant slot of a [`HashTable`].
pub struct VacantEntry<'a, T, H> {
    table: &'a mut HashTable<T>,
    index: usize,
    hash: i32,
    hasher: H,
}

impl<'a, T, H> VacantEntry<'a, T, H>
where
    H: Fn(&T) -> i32,
{
    /// Inserts `value` and returns a mutable reference to it.
    ///
    /// If the new value would push the load factor past 3/4 the table grows
    /// first, and the value is placed by a fresh probe in the grown table.
    pub fn insert(self, value: T) -> &'a mut T {
        let VacantEntry {
            table,
            mut index,
            hash,
            hasher,
        } = self;

        if table.ensure_capacity_for(table.populated + 1, &hasher) {
            index = table.first_empty(hash);
        }

        debug_assert!(table.slots[index].is_none());
        table.populated += 1;
        table.slots[index].insert(value)
    }
}

/// A view into an occupied slot of a [`HashTable`].
pub struct OccupiedEntry<'a, T, H> {
    table: &'a mut HashTable<T>,
    index: usize,
    hasher: H,
}

impl<'a, T, H> OccupiedEntry<'a, T, H>
where
    H: Fn(&T) -> i32,
{
    /// Returns the slot index this entry refers to.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Gets a reference to the stored value.
    pub fn get(&self) -> &T {
        match &self.table.slots[self.index] {
            Some(value) => value,
            None => unreachable!("occupied entry refers to an empty slot"),
        }
    }

    /// Gets a mutable reference to the stored value.
    pub fn get_mut(&mut self) -> &mut T {
        match &mut self.table.slots[self.index] {
            Some(value) => value,
            None => unreachable!("occupied entry refers to an empty slot"),
        }
    }

    /// Converts the entry into a mutable reference to the stored value.
    pub fn into_mut(self) -> &'a mut T {
        match &mut self.table.slots[self.index] {
            Some(value) => value,
            None => unreachable!("occupied entry refers to an empty slot"),
        }
    }

    /// Removes the stored value from the table and returns it.
    pub fn remove(self) -> T {
        match self.table.remove_at(self.index, &self.hasher) {
            Some(value) => value,
            None => unreachable!("occupied entry refers to an empty slot"),
        }
    }
}

/// A forward cursor over a [`HashTable`] that can remove the value it last
/// returned.
///
/// Created by [`HashTable::cursor`]. It holds the table mutably, so no other
/// mutation can invalidate it while it is alive.
pub struct Cursor<'a, T, H> {
    table: &'a mut HashTable<T>,
    index: usize,
    last: Option<usize>,
    hasher: H,
}

impl<T, H> Cursor<'_, T, H>
where
    H: Fn(&T) -> i32,
{
    fn seek(&mut self) {
        while self.index < self.table.capacity() && self.table.slots[self.index].is_none() {
            self.index += 1;
        }
    }

    /// Returns `true` if another value remains.
    pub fn has_next(&mut self) -> bool {
        self.seek();
        self.index < self.table.capacity()
    }

    /// Moves to the next value and returns it.
    ///
    /// The caller must not change the value in a way that changes its hash
    /// code or its equality with other stored values.
    ///
    /// # Errors
    ///
    /// [`Error::Exhausted`] if no value remains.
    pub fn advance(&mut self) -> Result<&mut T, Error> {
        if !self.has_next() {
            self.last = None;
            return Err(Error::Exhausted);
        }
        let index = self.index;
        self.last = Some(index);
        self.index += 1;
        self.table.slots[index].as_mut().ok_or(Error::Exhausted)
    }

    /// Removes the value last returned by [`advance`](Self::advance).
    ///
    /// Removal may shift a later value of the same cluster back into the
    /// vacated slot; the cursor then resumes at that slot so the shifted
    /// value is not skipped. A value that wrapped from the front of the
    /// array is not revisited when it lands in the vacated slot, but one
    /// shifted further along the cluster, into a slot the cursor has not
    /// reached yet, may be returned a second time.
    ///
    /// # Errors
    ///
    /// [`Error::NoCurrentElement`] if nothing was returned since the last
    /// removal, or the last `advance` found the cursor exhausted.
    pub fn remove(&mut self) -> Result<T, Error> {
        let last = self.last.take().ok_or(Error::NoCurrentElement)?;
        let (value, filled_from) = self
            .table
            .take_at(last, &self.hasher)
            .ok_or(Error::NoCurrentElement)?;
        if filled_from.is_some_and(|from| from > last) {
            self.index = last;
        }
        Ok(value)
    }
}

/// An iterator over the values of a [`HashTable`].
///
/// This struct is created by the [`iter`] method on [`HashTable`].
///
/// [`iter`]: HashTable::iter
pub struct Iter<'a, T> {
    slots: core::slice::Iter<'a, Option<T>>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        for slot in &mut self.slots {
            if let Some(value) = slot {
                self.remaining -= 1;
                return Some(value);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            slots: self.slots.clone(),
            remaining: self.remaining,
        }
    }
}

/// A mutable iterator over the values of a [`HashTable`].
pub struct IterMut<'a, T> {
    slots: core::slice::IterMut<'a, Option<T>>,
    remaining: usize,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        for slot in &mut self.slots {
            if let Some(value) = slot {
                self.remaining -= 1;
                return Some(value);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

/// An owning iterator over the values of a [`HashTable`], in slot order.
pub struct IntoIter<T> {
    slots: alloc::vec::IntoIter<Option<T>>,
    remaining: usize,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        for slot in &mut self.slots {
            if let Some(value) = slot {
                self.remaining -= 1;
                return Some(value);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

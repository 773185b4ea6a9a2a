//! Serde support.
//!
//! A [`HashMap`] serializes as the tuple `(capacity, size, entries)`, where
//! `entries` lists every `(key, value)` pair in slot order and the null key
//! is written as `None`. A [`HashSet`] uses the same shape with bare
//! elements. Deserializing rebuilds a table of the recorded capacity, capped
//! at twice the slots the size calls for, and re-inserts the entries, so the
//! null key comes back masked like any other insertion.
//!
//! Slot order depends on the hasher. Wrap a collection in [`Sorted`] for
//! output that only depends on the contents.
//!
//! ```rust
//! use lean_hash::HashMap;
//! use lean_hash::ser::Sorted;
//!
//! let mut map: HashMap<u32, &str> = HashMap::new();
//! map.insert(2, "b");
//! map.insert(1, "a");
//! map.insert_nullable(None, "z");
//!
//! let json = serde_json::to_string(&Sorted(&map)).unwrap();
//! assert_eq!(json, r#"[4,3,[[1,"a"],[2,"b"],[null,"z"]]]"#);
//! ```

use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;
use core::marker::PhantomData;

use serde::de::Deserialize;
use serde::de::Deserializer;
use serde::de::Error as _;
use serde::de::SeqAccess;
use serde::de::Visitor;
use serde::ser::Error as _;
use serde::ser::Serialize;
use serde::ser::SerializeSeq;
use serde::ser::SerializeTuple;
use serde::ser::Serializer;

use crate::hash_map::HashMap;
use crate::hash_set::HashSet;
use crate::hash_table::HashTable;
use crate::hash_table::INITIAL_CAPACITY;
use crate::hash_table::capacity_for;
use crate::strategy::Equivalence;

/// Serializes a collection with its entries in ascending key order, the
/// null key last.
pub struct Sorted<'a, C>(pub &'a C);

fn null_last<T: Ord>(a: Option<&T>, b: Option<&T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Writes `(capacity, size, entries)`.
fn serialize_header<Ser, E>(
    ser: Ser,
    capacity: usize,
    size: usize,
    entries: &E,
) -> Result<Ser::Ok, Ser::Error>
where
    Ser: Serializer,
    E: Serialize + ?Sized,
{
    let capacity = u32::try_from(capacity).map_err(Ser::Error::custom)?;
    let size = u32::try_from(size).map_err(Ser::Error::custom)?;
    let mut t = ser.serialize_tuple(3)?;
    t.serialize_element(&capacity)?;
    t.serialize_element(&size)?;
    t.serialize_element(entries)?;
    t.end()
}

struct Entries<I>(I);

impl<I, E> Serialize for Entries<I>
where
    I: Iterator<Item = E> + ExactSizeIterator + Clone,
    E: Serialize,
{
    fn serialize<Ser>(&self, ser: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: Serializer,
    {
        let iter = self.0.clone();
        let mut s = ser.serialize_seq(Some(iter.len()))?;
        for entry in iter {
            s.serialize_element(&entry)?;
        }
        s.end()
    }
}

impl<K, V, S, VS> Serialize for HashMap<K, V, S, VS>
where
    K: Serialize,
    V: Serialize,
{
    fn serialize<Ser>(&self, ser: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: Serializer,
    {
        let entries = Entries(self.table().iter().map(|(k, v)| (k.get(), v)));
        serialize_header(ser, self.capacity(), self.len(), &entries)
    }
}

impl<K, V, S, VS> Serialize for Sorted<'_, HashMap<K, V, S, VS>>
where
    K: Serialize + Ord,
    V: Serialize,
{
    fn serialize<Ser>(&self, ser: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: Serializer,
    {
        let mut entries: Vec<(Option<&K>, &V)> = self.0.iter().collect();
        entries.sort_by(|a, b| null_last(a.0, b.0));
        serialize_header(ser, self.0.capacity(), self.0.len(), &entries)
    }
}

impl<T, S> Serialize for HashSet<T, S>
where
    T: Serialize,
{
    fn serialize<Ser>(&self, ser: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: Serializer,
    {
        let entries = Entries(self.table().iter().map(|v| v.get()));
        serialize_header(ser, self.capacity(), self.len(), &entries)
    }
}

impl<T, S> Serialize for Sorted<'_, HashSet<T, S>>
where
    T: Serialize + Ord,
{
    fn serialize<Ser>(&self, ser: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: Serializer,
    {
        let mut entries: Vec<Option<&T>> = self.0.iter().collect();
        entries.sort_by(|a, b| null_last(*a, *b));
        serialize_header(ser, self.0.capacity(), self.0.len(), &entries)
    }
}

/// Reads `(capacity, size, entries)` and hands the entries to `build`.
struct TableVisitor<C, E, F> {
    build: F,
    _marker: PhantomData<fn() -> (C, E)>,
}

impl<'de, C, E, F> Visitor<'de> for TableVisitor<C, E, F>
where
    E: Deserialize<'de>,
    F: FnOnce(usize, Vec<E>) -> C,
{
    type Value = (C, usize);

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a (capacity, size, entries) tuple")
    }

    fn visit_seq<Access>(self, mut access: Access) -> Result<Self::Value, Access::Error>
    where
        Access: SeqAccess<'de>,
    {
        let capacity: u32 = access
            .next_element()?
            .ok_or_else(|| Access::Error::invalid_length(0, &self))?;
        let size: u32 = access
            .next_element()?
            .ok_or_else(|| Access::Error::invalid_length(1, &self))?;
        let entries: Vec<E> = access
            .next_element()?
            .ok_or_else(|| Access::Error::invalid_length(2, &self))?;

        let capacity = capacity as usize;
        let size = size as usize;
        if !capacity.is_power_of_two() || capacity < INITIAL_CAPACITY {
            return Err(Access::Error::custom(format_args!(
                "capacity {capacity} is not a power of two of at least 4"
            )));
        }
        if entries.len() != size {
            return Err(Access::Error::invalid_length(entries.len(), &"the recorded size"));
        }
        // The recorded capacity is a hint, bounded by what the size needs.
        let capacity = capacity.min(capacity_for(size).saturating_mul(2));
        Ok(((self.build)(capacity, entries), size))
    }
}

fn deserialize_table<'de, D, C, E, F>(des: D, build: F) -> Result<(C, usize), D::Error>
where
    D: Deserializer<'de>,
    E: Deserialize<'de>,
    F: FnOnce(usize, Vec<E>) -> C,
{
    des.deserialize_tuple(
        3,
        TableVisitor {
            build,
            _marker: PhantomData,
        },
    )
}

impl<'de, K, V, S, VS> Deserialize<'de> for HashMap<K, V, S, VS>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
    S: Equivalence<K>,
{
    fn deserialize<D>(des: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (map, size) = deserialize_table(des, |capacity, entries: Vec<(Option<K>, V)>| {
            let mut map = Self::from_table(HashTable::with_slot_count(capacity));
            for (k, v) in entries {
                map.insert_nullable(k, v);
            }
            map
        })?;
        if map.len() != size {
            return Err(D::Error::custom("duplicate keys in serialized map"));
        }
        Ok(map)
    }
}

impl<'de, T, S> Deserialize<'de> for HashSet<T, S>
where
    T: Deserialize<'de>,
    S: Equivalence<T>,
{
    fn deserialize<D>(des: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (set, size) = deserialize_table(des, |capacity, entries: Vec<Option<T>>| {
            let mut set = Self::from_table(HashTable::with_slot_count(capacity));
            for value in entries {
                set.insert_nullable(value);
            }
            set
        })?;
        if set.len() != size {
            return Err(D::Error::custom("duplicate elements in serialized set"));
        }
        Ok(set)
    }
}

#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod error;
mod masked;

/// A hash map built on the linear-probing `HashTable`.
///
/// This module provides a `HashMap` with a nullable key, pluggable key and
/// value strategies, entry views and a removing cursor.
pub mod hash_map;

/// The raw linear-probing table behind every collection in this crate.
pub mod hash_table;

/// A hash set built on the linear-probing `HashTable`.
///
/// This module provides a `HashSet` with a nullable element, a pluggable
/// equality strategy and a removing cursor.
pub mod hash_set;

#[cfg(feature = "serde")]
pub mod ser;

pub mod strategy;

/// Sets that switch between empty, singleton and table representations.
pub mod tiered_set;

/// Maps that switch between empty, singleton and table representations.
pub mod tiered_map;

#[cfg(test)]
mod hash_table_proptest;

pub use error::Error;
pub use hash_map::Entry;
pub use hash_map::HashMap;
pub use hash_map::IdentityHashMap;
pub use hash_set::HashSet;
pub use hash_set::IdentityHashSet;
pub use hash_table::HashTable;
pub use strategy::Equivalence;
pub use strategy::Identity;
pub use strategy::Value;
pub use tiered_map::IdentityTieredMap;
pub use tiered_map::TieredMap;
pub use tiered_set::IdentityTieredSet;
pub use tiered_set::Tier;
pub use tiered_set::TieredSet;

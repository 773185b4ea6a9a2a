//! Equality and hashing strategies.
//!
//! Every collection in this crate is parameterized by a strategy type that
//! decides when two elements are the same and what 32-bit hash code an
//! element has. Strategies are never instantiated; they only select the
//! functions the table calls, so lookups are monomorphized.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::sync::Arc;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::marker::PhantomData;
use core::ptr::NonNull;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hash builder used by [`Value`] when none is named.
        ///
        /// Seedless, so every `default()` instance hashes identically.
        pub type DefaultHashBuilder = foldhash::fast::FixedState;
    } else if #[cfg(feature = "std")] {
        /// The hash builder used by [`Value`] when none is named.
        ///
        /// SipHash-1-3 with zero keys, so every `default()` instance hashes
        /// identically.
        pub type DefaultHashBuilder = core::hash::BuildHasherDefault<std::hash::DefaultHasher>;
    } else {
        compile_error!("enable the `foldhash` or `std` feature to provide a default hasher");
    }
}

/// Decides equality and hash codes for the elements of a collection.
///
/// Implementations must be consistent: `equals(a, b)` implies
/// `hash(a) == hash(b)`.
pub trait Equivalence<T: ?Sized> {
    /// Returns `true` if `a` and `b` are the same element.
    fn equals(a: &T, b: &T) -> bool;

    /// Returns the raw 32-bit hash code of `value`.
    fn hash(value: &T) -> i32;
}

/// Structural equality: `Eq` for comparison and `Hash` through `H`.
///
/// `H::default()` must produce identically seeded hashers, since a fresh
/// hasher is built for each hash code. Randomly seeded builders such as
/// `std::hash::RandomState` do not qualify.
pub struct Value<H = DefaultHashBuilder> {
    _hasher: PhantomData<fn() -> H>,
}

impl<T, H> Equivalence<T> for Value<H>
where
    T: Hash + Eq + ?Sized,
    H: BuildHasher + Default,
{
    #[inline(always)]
    fn equals(a: &T, b: &T) -> bool {
        a == b
    }

    #[inline(always)]
    fn hash(value: &T) -> i32 {
        let h = H::default().hash_one(value);
        (h ^ (h >> 32)) as i32
    }
}

/// Identity equality: two elements are the same only if they point at the
/// same object.
pub struct Identity {
    _private: (),
}

impl<T: Pointer + ?Sized> Equivalence<T> for Identity {
    #[inline(always)]
    fn equals(a: &T, b: &T) -> bool {
        a.addr() == b.addr()
    }

    #[inline(always)]
    fn hash(value: &T) -> i32 {
        // Low bits are alignment padding; fold the high half in for 64-bit
        // addresses.
        let addr = value.addr() as u64;
        ((addr >> 3) ^ (addr >> 32)) as u32 as i32
    }
}

/// A handle whose identity is the address of the object it points at.
pub trait Pointer {
    /// The address of the pointee, with any metadata discarded.
    fn addr(&self) -> usize;
}

impl<T: ?Sized> Pointer for &T {
    fn addr(&self) -> usize {
        (*self as *const T).cast::<()>() as usize
    }
}

impl<T: ?Sized> Pointer for &mut T {
    fn addr(&self) -> usize {
        (&**self as *const T).cast::<()>() as usize
    }
}

impl<T: ?Sized> Pointer for Box<T> {
    fn addr(&self) -> usize {
        (&**self as *const T).cast::<()>() as usize
    }
}

impl<T: ?Sized> Pointer for Rc<T> {
    fn addr(&self) -> usize {
        Rc::as_ptr(self).cast::<()>() as usize
    }
}

impl<T: ?Sized> Pointer for Arc<T> {
    fn addr(&self) -> usize {
        Arc::as_ptr(self).cast::<()>() as usize
    }
}

impl<T: ?Sized> Pointer for *const T {
    fn addr(&self) -> usize {
        self.cast::<()>() as usize
    }
}

impl<T: ?Sized> Pointer for *mut T {
    fn addr(&self) -> usize {
        self.cast::<()>() as usize
    }
}

impl<T: ?Sized> Pointer for NonNull<T> {
    fn addr(&self) -> usize {
        self.as_ptr().cast::<()>() as usize
    }
}

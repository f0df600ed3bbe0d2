//! Collections that don't keep their elements alive.
//!
//! These store [`Weak`](std::sync::Weak) handles, so adding an element never extends its
//! lifetime. They are typically used for lists of delegates or listeners that are owned
//! elsewhere.
//!
//! Be careful: by all appearances these still behave like regular collections. When the last
//! [`Arc`](std::sync::Arc) to an element is dropped, its entry stays in the collection, counted
//! by `len`, but reading it gives `None` and iteration skips it. Call `prune` to remove such
//! dangling entries, and use `live_len` for the number of elements still alive.
//!
//! Identity is by allocation. A dangling entry keeps its allocation (not the value) reserved, so
//! a new element can never be mistaken for a dropped one.

mod map;
mod set;
mod vec;


pub use map::WeakMap;
pub use set::WeakSet;
pub use vec::WeakVec;

/// Returns a new, empty sequence that does not keep its elements alive.
#[must_use]
pub fn non_retaining_vec<T: ?Sized>() -> WeakVec<T> {
  WeakVec::new()
}

/// Returns a new, empty mapping that does not keep its values alive. Keys are owned.
#[must_use]
pub fn non_retaining_map<K, V: ?Sized>() -> WeakMap<K, V> {
  WeakMap::new()
}

/// Returns a new, empty set that does not keep its elements alive.
#[must_use]
pub fn non_retaining_set<T: ?Sized>() -> WeakSet<T> {
  WeakSet::new()
}

/// The address of the allocation, without any pointer metadata.
fn addr<T: ?Sized>(ptr: *const T) -> usize {
  ptr.cast::<()>() as usize
}

fn log_pruned(kind: &str, n: usize) {
  if n != 0 {
    log::trace!("pruned {n} dangling entries from {kind}");
  }
}

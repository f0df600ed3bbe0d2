use crate::addr;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::{Arc, Weak};

/// A set of weak handles, keyed by allocation.
///
/// Elements can't be hashed or compared by value, since they may be dropped while in the set.
pub struct WeakSet<T: ?Sized> {
  entries: FxHashMap<usize, Weak<T>>,
}

impl<T: ?Sized> WeakSet<T> {
  /// Returns a new, empty `WeakSet`.
  #[must_use]
  pub fn new() -> Self {
    Self { entries: FxHashMap::default() }
  }

  /// Adds `value` without taking ownership of it. Returns whether it was newly added.
  pub fn insert(&mut self, value: &Arc<T>) -> bool {
    self.entries.insert(addr(Arc::as_ptr(value)), Arc::downgrade(value)).is_none()
  }

  /// Returns whether `value` is in here.
  #[must_use]
  pub fn contains(&self, value: &Arc<T>) -> bool {
    self.entries.contains_key(&addr(Arc::as_ptr(value)))
  }

  /// Removes `value`. Returns whether it was in here.
  pub fn remove(&mut self, value: &Arc<T>) -> bool {
    self.entries.remove(&addr(Arc::as_ptr(value))).is_some()
  }

  /// Returns the number of entries, including dangling ones.
  #[must_use]
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Returns whether there are no entries, dangling or not.
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Returns the number of entries whose element is still alive.
  #[must_use]
  pub fn live_len(&self) -> usize {
    self.entries.values().filter(|w| w.strong_count() != 0).count()
  }

  /// Returns an iterator over the elements still alive, in arbitrary order.
  pub fn iter(&self) -> impl Iterator<Item = Arc<T>> + '_ {
    self.entries.values().filter_map(Weak::upgrade)
  }

  /// Removes the dangling entries. Returns how many there were.
  pub fn prune(&mut self) -> usize {
    let before = self.entries.len();
    self.entries.retain(|_, w| w.strong_count() != 0);
    let n = before - self.entries.len();
    crate::log_pruned("WeakSet", n);
    n
  }

  /// Removes all entries.
  pub fn clear(&mut self) {
    self.entries.clear();
  }
}

impl<T: ?Sized> Default for WeakSet<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T: ?Sized> fmt::Debug for WeakSet<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("WeakSet").field("len", &self.len()).field("live", &self.live_len()).finish()
  }
}

use crate::addr;
use std::fmt;
use std::sync::{Arc, Weak};

/// A sequence of weak handles, in insertion order.
pub struct WeakVec<T: ?Sized> {
  entries: Vec<Weak<T>>,
}

impl<T: ?Sized> WeakVec<T> {
  /// Returns a new, empty `WeakVec`.
  #[must_use]
  pub fn new() -> Self {
    Self { entries: Vec::new() }
  }

  /// Appends `value` without taking ownership of it.
  pub fn push(&mut self, value: &Arc<T>) {
    self.entries.push(Arc::downgrade(value));
  }

  /// Returns the element at `idx`, or `None` if out of bounds or already dropped.
  #[must_use]
  pub fn get(&self, idx: usize) -> Option<Arc<T>> {
    self.entries.get(idx)?.upgrade()
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
    self.entries.iter().filter(|w| w.strong_count() != 0).count()
  }

  /// Returns whether `value` (the same allocation, not an equal value) is in here.
  #[must_use]
  pub fn contains(&self, value: &Arc<T>) -> bool {
    let a = addr(Arc::as_ptr(value));
    self.entries.iter().any(|w| addr(w.as_ptr()) == a)
  }

  /// Removes the entry at `idx`, returning its element if still alive. Does nothing if `idx` is
  /// out of bounds.
  pub fn remove(&mut self, idx: usize) -> Option<Arc<T>> {
    if idx < self.entries.len() {
      self.entries.remove(idx).upgrade()
    } else {
      None
    }
  }

  /// Removes the first entry for `value`. Returns whether there was one.
  pub fn remove_item(&mut self, value: &Arc<T>) -> bool {
    let a = addr(Arc::as_ptr(value));
    match self.entries.iter().position(|w| addr(w.as_ptr()) == a) {
      Some(idx) => {
        self.entries.remove(idx);
        true
      }
      None => false,
    }
  }

  /// Returns an iterator over the elements still alive, in order.
  pub fn iter(&self) -> impl Iterator<Item = Arc<T>> + '_ {
    self.entries.iter().filter_map(Weak::upgrade)
  }

  /// Removes the dangling entries. Returns how many there were.
  pub fn prune(&mut self) -> usize {
    let before = self.entries.len();
    self.entries.retain(|w| w.strong_count() != 0);
    let n = before - self.entries.len();
    crate::log_pruned("WeakVec", n);
    n
  }

  /// Removes all entries.
  pub fn clear(&mut self) {
    self.entries.clear();
  }
}

impl<T: ?Sized> Default for WeakVec<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T: ?Sized> Clone for WeakVec<T> {
  fn clone(&self) -> Self {
    Self { entries: self.entries.clone() }
  }
}

impl<T: ?Sized> fmt::Debug for WeakVec<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("WeakVec").field("len", &self.len()).field("live", &self.live_len()).finish()
  }
}

impl<'a, T> Extend<&'a Arc<T>> for WeakVec<T>
where
  T: ?Sized + 'a,
{
  fn extend<I>(&mut self, iter: I)
  where
    I: IntoIterator<Item = &'a Arc<T>>,
  {
    self.entries.extend(iter.into_iter().map(Arc::downgrade));
  }
}

impl<'a, T> FromIterator<&'a Arc<T>> for WeakVec<T>
where
  T: ?Sized + 'a,
{
  fn from_iter<I>(iter: I) -> Self
  where
    I: IntoIterator<Item = &'a Arc<T>>,
  {
    let mut ret = Self::new();
    ret.extend(iter);
    ret
  }
}

use rustc_hash::FxHashMap;
use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, Weak};

/// A map from owned keys to weak handles.
pub struct WeakMap<K, V: ?Sized> {
  entries: FxHashMap<K, Weak<V>>,
}

impl<K, V: ?Sized> WeakMap<K, V> {
  /// Returns a new, empty `WeakMap`.
  #[must_use]
  pub fn new() -> Self {
    Self { entries: FxHashMap::default() }
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

  /// Returns the number of entries whose value is still alive.
  #[must_use]
  pub fn live_len(&self) -> usize {
    self.entries.values().filter(|w| w.strong_count() != 0).count()
  }

  /// Returns an iterator over the entries whose value is still alive, in arbitrary order.
  pub fn iter(&self) -> impl Iterator<Item = (&K, Arc<V>)> + '_ {
    self.entries.iter().filter_map(|(k, w)| Some((k, w.upgrade()?)))
  }

  /// Returns an iterator over all the keys, including those of dangling entries.
  pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
    self.entries.keys()
  }

  /// Removes the dangling entries. Returns how many there were.
  pub fn prune(&mut self) -> usize {
    let before = self.entries.len();
    self.entries.retain(|_, w| w.strong_count() != 0);
    let n = before - self.entries.len();
    crate::log_pruned("WeakMap", n);
    n
  }

  /// Removes all entries.
  pub fn clear(&mut self) {
    self.entries.clear();
  }
}

impl<K, V> WeakMap<K, V>
where
  K: Eq + Hash,
  V: ?Sized,
{
  /// Maps `key` to `value` without taking ownership of `value`. Returns whether `key` was new.
  pub fn insert(&mut self, key: K, value: &Arc<V>) -> bool {
    self.entries.insert(key, Arc::downgrade(value)).is_none()
  }

  /// Returns the value for `key`, or `None` if there is no entry or its value was dropped.
  pub fn get<Q>(&self, key: &Q) -> Option<Arc<V>>
  where
    K: Borrow<Q>,
    Q: ?Sized + Hash + Eq,
  {
    self.entries.get(key)?.upgrade()
  }

  /// Returns whether there is an entry for `key`, dangling or not.
  pub fn contains_key<Q>(&self, key: &Q) -> bool
  where
    K: Borrow<Q>,
    Q: ?Sized + Hash + Eq,
  {
    self.entries.contains_key(key)
  }

  /// Removes the entry for `key`, returning its value if still alive.
  pub fn remove<Q>(&mut self, key: &Q) -> Option<Arc<V>>
  where
    K: Borrow<Q>,
    Q: ?Sized + Hash + Eq,
  {
    self.entries.remove(key)?.upgrade()
  }
}

impl<K, V: ?Sized> Default for WeakMap<K, V> {
  fn default() -> Self {
    Self::new()
  }
}

impl<K, V: ?Sized> fmt::Debug for WeakMap<K, V> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("WeakMap").field("len", &self.len()).field("live", &self.live_len()).finish()
  }
}

//! Testing whether a value is of a certain shape and non-empty.
//!
//! Checking only the length of a value can be misleading when its type is not known for sure.
//! For instance, a decoded response may hold a map where a list was expected; it has a length,
//! but indexing into it like a list is wrong. These functions check both at once, and never fail:
//! an absent value, a value of the wrong shape, and an empty value are all just `false`.

mod impls;


/// The shape of a value, with its number of elements where that makes sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
  /// An ordered sequence, like a list or array.
  Sequence(usize),
  /// An unordered collection of distinct elements.
  Set(usize),
  /// Text. The count is in bytes.
  Text(usize),
  /// Anything else: scalars, maps, nothing at all.
  Other,
}

/// Things whose [`Shape`] can be determined.
pub trait Classify {
  /// Returns the shape of this.
  fn shape(&self) -> Shape;
}

/// Returns whether `value` is present and is a sequence with at least one element.
pub fn is_sequence_with_elements<T>(value: Option<&T>) -> bool
where
  T: ?Sized + Classify,
{
  matches!(value.map(T::shape), Some(Shape::Sequence(n)) if n != 0)
}

/// Returns whether `value` is present and is a set with at least one element.
pub fn is_set_with_elements<T>(value: Option<&T>) -> bool
where
  T: ?Sized + Classify,
{
  matches!(value.map(T::shape), Some(Shape::Set(n)) if n != 0)
}

/// Returns whether `value` is present and is non-empty text.
pub fn is_text_with_content<T>(value: Option<&T>) -> bool
where
  T: ?Sized + Classify,
{
  matches!(value.map(T::shape), Some(Shape::Text(n)) if n != 0)
}

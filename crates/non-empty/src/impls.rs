//! [`Classify`] for the standard library, and `serde_json` with the `json` feature.

use crate::{Classify, Shape};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, LinkedList, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

impl<T> Classify for [T] {
  fn shape(&self) -> Shape {
    Shape::Sequence(self.len())
  }
}

impl<T, const N: usize> Classify for [T; N] {
  fn shape(&self) -> Shape {
    Shape::Sequence(N)
  }
}

impl<T> Classify for Vec<T> {
  fn shape(&self) -> Shape {
    Shape::Sequence(self.len())
  }
}

impl<T> Classify for VecDeque<T> {
  fn shape(&self) -> Shape {
    Shape::Sequence(self.len())
  }
}

impl<T> Classify for LinkedList<T> {
  fn shape(&self) -> Shape {
    Shape::Sequence(self.len())
  }
}

impl<T, S> Classify for HashSet<T, S> {
  fn shape(&self) -> Shape {
    Shape::Set(self.len())
  }
}

impl<T> Classify for BTreeSet<T> {
  fn shape(&self) -> Shape {
    Shape::Set(self.len())
  }
}

impl Classify for str {
  fn shape(&self) -> Shape {
    Shape::Text(self.len())
  }
}

impl Classify for String {
  fn shape(&self) -> Shape {
    Shape::Text(self.len())
  }
}

impl Classify for Cow<'_, str> {
  fn shape(&self) -> Shape {
    Shape::Text(self.len())
  }
}

impl<K, V, S> Classify for HashMap<K, V, S> {
  fn shape(&self) -> Shape {
    Shape::Other
  }
}

impl<K, V> Classify for BTreeMap<K, V> {
  fn shape(&self) -> Shape {
    Shape::Other
  }
}

macro_rules! other {
  ($($t:ty),* $(,)?) => {
    $(
      impl Classify for $t {
        fn shape(&self) -> Shape {
          Shape::Other
        }
      }
    )*
  };
}

other![(), bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64];

impl<T> Classify for Option<T>
where
  T: Classify,
{
  fn shape(&self) -> Shape {
    self.as_ref().map_or(Shape::Other, T::shape)
  }
}

macro_rules! deref {
  ($($t:ty),* $(,)?) => {
    $(
      impl<T> Classify for $t
      where
        T: ?Sized + Classify,
      {
        fn shape(&self) -> Shape {
          (**self).shape()
        }
      }
    )*
  };
}

deref![&T, &mut T, Box<T>, Rc<T>, Arc<T>];

#[cfg(feature = "json")]
impl Classify for serde_json::Value {
  fn shape(&self) -> Shape {
    match self {
      serde_json::Value::Array(xs) => Shape::Sequence(xs.len()),
      serde_json::Value::String(s) => Shape::Text(s.len()),
      serde_json::Value::Null
      | serde_json::Value::Bool(_)
      | serde_json::Value::Number(_)
      | serde_json::Value::Object(_) => Shape::Other,
    }
  }
}

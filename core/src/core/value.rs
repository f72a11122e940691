// chaintools/src/core/value.rs

//! Defines `Value`, the type-erased unit that stages pass to one another.

use crate::error::{ChainError, ChainResult};
use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

/// A shared, type-erased value flowing through a pipeline.
///
/// Cloning a `Value` only bumps a reference count, so element-wise filtering
/// can test an element and still hand it on unchanged.
#[derive(Clone)]
pub struct Value {
  inner: Arc<dyn Any + Send + Sync>,
  type_name: &'static str,
}

impl Value {
  /// Wraps `value`. Wrapping something that already is a `Value` returns it as is.
  pub fn new<T: Any + Send + Sync>(value: T) -> Self {
    let boxed: Box<dyn Any + Send + Sync> = Box::new(value);
    match boxed.downcast::<Value>() {
      Ok(already_value) => *already_value,
      Err(boxed) => Value {
        inner: Arc::from(boxed),
        type_name: type_name::<T>(),
      },
    }
  }

  /// Full Rust type name of the wrapped value.
  pub fn type_name(&self) -> &'static str {
    self.type_name
  }

  pub fn is<T: Any>(&self) -> bool {
    self.inner.is::<T>()
  }

  pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
    self.inner.downcast_ref::<T>()
  }

  /// Recovers the typed value, cloning it only if the value is still shared.
  pub fn take<T: Any + Send + Sync + Clone>(self) -> ChainResult<T> {
    let Value { inner, type_name: found } = self;
    match inner.downcast::<T>() {
      Ok(typed) => Ok(Arc::try_unwrap(typed).unwrap_or_else(|shared| (*shared).clone())),
      Err(_) => Err(ChainError::TypeMismatch {
        expected: display_type_name(type_name::<T>()),
        found: display_type_name(found),
      }),
    }
  }

  /// Reads the value as a predicate verdict.
  pub(crate) fn truthy(&self) -> ChainResult<bool> {
    self.downcast_ref::<bool>().copied().ok_or_else(|| ChainError::TypeMismatch {
      expected: display_type_name(type_name::<bool>()),
      found: display_type_name(self.type_name),
    })
  }
}

impl fmt::Debug for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("Value")
      .field(&format_args!("{}", display_type_name(self.type_name)))
      .finish()
  }
}

/// Strips module paths from a `std::any::type_name` string,
/// e.g. `alloc::vec::Vec<alloc::string::String>` becomes `Vec<String>`.
pub fn display_type_name(raw: &str) -> String {
  let mut out = String::with_capacity(raw.len());
  let mut path = String::new();
  for ch in raw.chars() {
    if ch.is_alphanumeric() || ch == '_' || ch == ':' {
      path.push(ch);
    } else {
      push_last_segment(&mut out, &mut path);
      out.push(ch);
    }
  }
  push_last_segment(&mut out, &mut path);
  out
}

fn push_last_segment(out: &mut String, path: &mut String) {
  if let Some(last) = path.rsplit("::").next() {
    out.push_str(last);
  }
  path.clear();
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn display_type_name_strips_paths_inside_generics() {
    assert_eq!(display_type_name(type_name::<Vec<String>>()), "Vec<String>");
    assert_eq!(display_type_name(type_name::<(i32, String)>()), "(i32, String)");
    assert_eq!(display_type_name(type_name::<&str>()), "&str");
    assert_eq!(
      display_type_name(type_name::<Option<std::collections::BTreeMap<u8, bool>>>()),
      "Option<BTreeMap<u8, bool>>"
    );
  }

  #[test]
  fn new_does_not_nest_values() {
    let inner = Value::new(7_i32);
    let outer = Value::new(inner);
    assert!(outer.is::<i32>());
    assert_eq!(outer.take::<i32>().unwrap(), 7);
  }

  #[test]
  fn take_reports_both_types_on_mismatch() {
    let err = Value::new("text".to_string()).take::<u64>().unwrap_err();
    match err {
      ChainError::TypeMismatch { expected, found } => {
        assert_eq!(expected, "u64");
        assert_eq!(found, "String");
      }
      other => panic!("Expected TypeMismatch, got {:?}", other),
    }
  }

  #[test]
  fn take_clones_when_shared() {
    let value = Value::new(vec![1, 2, 3]);
    let copy = value.clone();
    assert_eq!(value.take::<Vec<i32>>().unwrap(), vec![1, 2, 3]);
    assert_eq!(copy.downcast_ref::<Vec<i32>>(), Some(&vec![1, 2, 3]));
  }
}

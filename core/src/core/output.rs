// chaintools/src/core/output.rs

//! Defines the tagged result of a stage call and how sequences are spread.

use crate::core::argument::Argument;
use crate::core::value::Value;
use std::any::Any;

/// What a stage hands to the next stage.
///
/// The tag is chosen by whoever wraps the stage, so a tuple result is only
/// ever spread into several arguments when the stage says so.
#[derive(Debug, Clone)]
pub enum StageOutput {
  /// One value, passed on as the single positional argument.
  Single(Value),
  /// Several values, passed on as separate positional arguments.
  Spread(Vec<Value>),
  /// A complete bundle, keywords included, passed on as is.
  Bundle(Argument),
}

impl StageOutput {
  pub fn single<T: Any + Send + Sync>(value: T) -> Self {
    StageOutput::Single(Value::new(value))
  }

  pub fn spread<S: IntoValues>(sequence: S) -> Self {
    StageOutput::Spread(sequence.into_values())
  }

  /// Collapses the output into one value, as element-wise `map`/`filter` see it.
  /// Spread values become a `Vec<Value>`, a non-scalar bundle stays an `Argument`.
  pub fn into_value(self) -> Value {
    match self {
      StageOutput::Single(value) => value,
      StageOutput::Spread(values) => Value::new(values),
      StageOutput::Bundle(bundle) => bundle.try_into_scalar().unwrap_or_else(Value::new),
    }
  }
}

/// A sequence whose elements can be spread into separate positional arguments.
pub trait IntoValues {
  fn into_values(self) -> Vec<Value>;
}

impl IntoValues for Vec<Value> {
  fn into_values(self) -> Vec<Value> {
    self
  }
}

macro_rules! impl_into_values_for_tuple {
  ($($element:ident),+) => {
    impl<$($element),+> IntoValues for ($($element,)+)
    where
      $($element: Any + Send + Sync,)+
    {
      #[allow(non_snake_case)]
      fn into_values(self) -> Vec<Value> {
        let ($($element,)+) = self;
        vec![$(Value::new($element)),+]
      }
    }
  };
}

impl_into_values_for_tuple!(A);
impl_into_values_for_tuple!(A, B);
impl_into_values_for_tuple!(A, B, C);
impl_into_values_for_tuple!(A, B, C, D);
impl_into_values_for_tuple!(A, B, C, D, E);
impl_into_values_for_tuple!(A, B, C, D, E, F);
impl_into_values_for_tuple!(A, B, C, D, E, F, G);
impl_into_values_for_tuple!(A, B, C, D, E, F, G, H);

// chaintools/src/core/argument.rs

//! Defines `Argument`, the positional/keyword bundle threaded between stages.

use crate::core::output::StageOutput;
use crate::core::stage::Stage;
use crate::core::value::Value;
use crate::error::{ChainError, ChainResult};
use std::any::Any;
use std::collections::BTreeMap;

/// The arguments of one stage call: ordered positional values plus named keyword values.
///
/// A bundle built from one plain value holds exactly that value and no keywords.
/// Every other bundle is derived from a stage's tagged output (see [`StageOutput`]).
#[derive(Debug, Clone, Default)]
pub struct Argument {
  positional: Vec<Value>,
  keywords: BTreeMap<String, Value>,
}

impl Argument {
  /// An empty bundle (no positional, no keyword values).
  pub fn new() -> Self {
    Self::default()
  }

  pub fn single<T: Any + Send + Sync>(value: T) -> Self {
    Self {
      positional: vec![Value::new(value)],
      keywords: BTreeMap::new(),
    }
  }

  pub fn from_values(values: impl IntoIterator<Item = Value>) -> Self {
    Self {
      positional: values.into_iter().collect(),
      keywords: BTreeMap::new(),
    }
  }

  /// Appends a positional value.
  pub fn with_positional<T: Any + Send + Sync>(mut self, value: T) -> Self {
    self.positional.push(Value::new(value));
    self
  }

  /// Sets a keyword value, replacing any earlier value under the same name.
  pub fn with_keyword<T: Any + Send + Sync>(mut self, name: impl Into<String>, value: T) -> Self {
    self.keywords.insert(name.into(), Value::new(value));
    self
  }

  pub fn positional(&self) -> &[Value] {
    &self.positional
  }

  pub fn keywords(&self) -> &BTreeMap<String, Value> {
    &self.keywords
  }

  pub fn keyword(&self, name: &str) -> Option<&Value> {
    self.keywords.get(name)
  }

  /// Clones out the positional value at `index` as a `T`.
  pub fn value_at<T: Any + Send + Sync + Clone>(&self, index: usize) -> ChainResult<T> {
    let value = self.positional.get(index).ok_or(ChainError::ArityMismatch {
      expected: index + 1,
      received: self.positional.len(),
    })?;
    value.clone().take::<T>()
  }

  pub fn is_empty(&self) -> bool {
    self.positional.is_empty() && self.keywords.is_empty()
  }

  /// True when the bundle holds exactly one positional value and no keywords.
  pub fn is_scalar(&self) -> bool {
    self.positional.len() == 1 && self.keywords.is_empty()
  }

  pub fn into_parts(self) -> (Vec<Value>, BTreeMap<String, Value>) {
    (self.positional, self.keywords)
  }

  /// Extracts the scalar value. Fails with `ChainError::NotScalar` rather than
  /// picking one value out of a multi-value bundle.
  pub fn into_value(self) -> ChainResult<Value> {
    self.try_into_scalar().map_err(|bundle| ChainError::NotScalar {
      positional: bundle.positional.len(),
      keywords: bundle.keywords.len(),
    })
  }

  /// Extracts and downcasts the scalar value.
  pub fn value<T: Any + Send + Sync + Clone>(self) -> ChainResult<T> {
    self.into_value()?.take::<T>()
  }

  /// Calls `stage` with this bundle and derives the next bundle from its output.
  pub fn evaluate<Err>(self, stage: &Stage<Err>) -> Result<Argument, Err>
  where
    Err: From<ChainError> + 'static,
  {
    stage.call(self).map(Argument::from)
  }

  /// Hands back the bundle itself when it is not scalar.
  pub(crate) fn try_into_scalar(mut self) -> Result<Value, Argument> {
    if self.is_scalar() {
      if let Some(value) = self.positional.pop() {
        return Ok(value);
      }
    }
    Err(self)
  }

  /// Checks the bundle against a fixed positional parameter list.
  pub(crate) fn into_positional_exact(self, expected: usize) -> ChainResult<Vec<Value>> {
    if !self.keywords.is_empty() {
      return Err(ChainError::UnexpectedKeywords {
        names: self.keywords.into_keys().collect(),
      });
    }
    if self.positional.len() != expected {
      return Err(ChainError::ArityMismatch {
        expected,
        received: self.positional.len(),
      });
    }
    Ok(self.positional)
  }
}

impl From<Value> for Argument {
  fn from(value: Value) -> Self {
    Self {
      positional: vec![value],
      keywords: BTreeMap::new(),
    }
  }
}

impl From<StageOutput> for Argument {
  fn from(output: StageOutput) -> Self {
    match output {
      StageOutput::Single(value) => Argument::from(value),
      StageOutput::Spread(values) => Argument::from_values(values),
      StageOutput::Bundle(bundle) => bundle,
    }
  }
}

impl FromIterator<Value> for Argument {
  fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
    Argument::from_values(iter)
  }
}

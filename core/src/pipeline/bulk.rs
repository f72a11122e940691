// chaintools/src/pipeline/bulk.rs

//! Element-wise `map` and `filter` of a pipeline over a sequence of items.
//! Nothing here uses argument threading: every stage sees one element at a time.

use crate::core::value::Value;
use crate::error::ChainError;
use crate::pipeline::definition::Pipeline;
use std::any::Any;
use std::fmt;
use tracing::{event, Level};

type BoxedValues<'a, Err> = Box<dyn Iterator<Item = Result<Value, Err>> + 'a>;

/// Lazy, single-pass sequence produced by [`Pipeline::map`] and [`Pipeline::filter`].
///
/// Stages run only as items are pulled, each element passing through each
/// stage at most once. A stage error is yielded in place of the element.
pub struct LazyValues<'a, Err> {
  inner: BoxedValues<'a, Err>,
}

impl<'a, Err> LazyValues<'a, Err>
where
  Err: From<ChainError> + 'a,
{
  /// Downcasts every yielded value to `U`.
  pub fn typed<U>(self) -> impl Iterator<Item = Result<U, Err>> + 'a
  where
    U: Any + Send + Sync + Clone,
  {
    self.map(|item| item.and_then(|value| value.take::<U>().map_err(Err::from)))
  }
}

impl<Err> Iterator for LazyValues<'_, Err> {
  type Item = Result<Value, Err>;

  fn next(&mut self) -> Option<Self::Item> {
    self.inner.next()
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    self.inner.size_hint()
  }
}

impl<Err> fmt::Debug for LazyValues<'_, Err> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("LazyValues").finish_non_exhaustive()
  }
}

fn wrap_items<'a, I, Err>(items: I) -> BoxedValues<'a, Err>
where
  I: IntoIterator + 'a,
  I::IntoIter: 'a,
  I::Item: Any + Send + Sync,
  Err: 'a,
{
  Box::new(items.into_iter().map(|item| Ok(Value::new(item))))
}

impl<Err> Pipeline<Err>
where
  Err: std::error::Error + From<ChainError> + Send + Sync + 'static,
{
  /// Applies every stage to every item, lazily: `f` then `g` behaves as
  /// `items.map(f).map(g)`.
  pub fn map<'a, I>(&'a self, items: I) -> LazyValues<'a, Err>
  where
    I: IntoIterator + 'a,
    I::IntoIter: 'a,
    I::Item: Any + Send + Sync,
  {
    event!(Level::TRACE, num_stages = self.stages.len(), "Building lazy map.");
    let mut current = wrap_items(items);
    for stage in &self.stages {
      current = Box::new(current.map(move |item| item.and_then(|value| stage.apply(value))));
    }
    LazyValues { inner: current }
  }

  /// Keeps the items every stage accepts, lazily. Stages are predicates
  /// returning `bool`; any other result is a `ChainError::TypeMismatch`.
  pub fn filter<'a, I>(&'a self, items: I) -> LazyValues<'a, Err>
  where
    I: IntoIterator + 'a,
    I::IntoIter: 'a,
    I::Item: Any + Send + Sync,
  {
    event!(Level::TRACE, num_stages = self.stages.len(), "Building lazy filter.");
    let mut current = wrap_items(items);
    for stage in &self.stages {
      current = Box::new(current.filter_map(move |item| match item {
        Ok(value) => match stage.test(&value) {
          Ok(true) => Some(Ok(value)),
          Ok(false) => None,
          Err(e) => Some(Err(e)),
        },
        Err(e) => Some(Err(e)),
      }));
    }
    LazyValues { inner: current }
  }
}

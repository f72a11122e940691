// chaintools/src/pipeline/definition.rs

//! Contains the `Pipeline<Err>` struct definition and methods for its
//! construction, structural modification and type-flow description.

use crate::core::argument::Argument;
use crate::core::chainable::Chainable;
use crate::core::output::StageOutput;
use crate::core::stage::{Annotation, Stage};
use crate::core::value::{display_type_name, Value};
use crate::error::ChainError;
use std::fmt;
use tracing::{event, Level};

/// An ordered list of stages invoked as one unit.
///
/// `Err` is the error type its stages return. It must be `From<ChainError>` so
/// that adapter failures (arity, types, non-scalar results) can be reported in it.
pub struct Pipeline<Err = ChainError>
where
  Err: std::error::Error + From<ChainError> + Send + Sync + 'static,
{
  /// Stages in invocation order.
  pub(crate) stages: Vec<Stage<Err>>,
}

/// Everything a pipeline can be constructed from.
#[derive(Debug)]
pub enum PipelineSource<Err> {
  Empty,
  Single(Stage<Err>),
  Many(Vec<Stage<Err>>),
}

impl<Err> From<()> for PipelineSource<Err> {
  fn from(_: ()) -> Self {
    PipelineSource::Empty
  }
}

impl<Err> From<Stage<Err>> for PipelineSource<Err> {
  fn from(stage: Stage<Err>) -> Self {
    PipelineSource::Single(stage)
  }
}

impl<Err> From<Option<Stage<Err>>> for PipelineSource<Err> {
  fn from(stage: Option<Stage<Err>>) -> Self {
    stage.map_or(PipelineSource::Empty, PipelineSource::Single)
  }
}

impl<Err> From<Vec<Stage<Err>>> for PipelineSource<Err> {
  fn from(stages: Vec<Stage<Err>>) -> Self {
    PipelineSource::Many(stages)
  }
}

impl<Err, const N: usize> From<[Stage<Err>; N]> for PipelineSource<Err> {
  fn from(stages: [Stage<Err>; N]) -> Self {
    PipelineSource::Many(stages.into())
  }
}

/// Dynamic construction: accepts `()`, a `Stage<Err>`, a `Vec<Stage<Err>>` or a
/// `Pipeline<Err>` (as a single nested stage). Anything else is a
/// `ChainError::Construction`.
impl<Err> TryFrom<Value> for PipelineSource<Err>
where
  Err: std::error::Error + From<ChainError> + Send + Sync + 'static,
{
  type Error = ChainError;

  fn try_from(source: Value) -> Result<Self, Self::Error> {
    if source.is::<()>() {
      return Ok(PipelineSource::Empty);
    }
    if let Some(stage) = source.downcast_ref::<Stage<Err>>() {
      return Ok(PipelineSource::Single(stage.clone()));
    }
    if let Some(stages) = source.downcast_ref::<Vec<Stage<Err>>>() {
      return Ok(PipelineSource::Many(stages.clone()));
    }
    if let Some(pipeline) = source.downcast_ref::<Pipeline<Err>>() {
      return Ok(PipelineSource::Single(pipeline.clone().into_stage()));
    }
    Err(ChainError::Construction {
      type_name: display_type_name(source.type_name()),
    })
  }
}

impl<Err> Pipeline<Err>
where
  Err: std::error::Error + From<ChainError> + Send + Sync + 'static,
{
  /// Creates an empty pipeline. Invoking it returns its input unchanged.
  pub fn new() -> Self {
    Self { stages: Vec::new() }
  }

  /// Creates a pipeline from nothing, one stage, or an ordered list of stages.
  pub fn construct(source: impl Into<PipelineSource<Err>>) -> Self {
    let stages = match source.into() {
      PipelineSource::Empty => Vec::new(),
      PipelineSource::Single(stage) => vec![stage],
      PipelineSource::Many(stages) => stages,
    };
    event!(Level::TRACE, num_stages = stages.len(), "Pipeline constructed.");
    Self { stages }
  }

  /// Creates a pipeline from a type-erased source, failing with
  /// `ChainError::Construction` when the value is not a valid source.
  pub fn from_value(source: Value) -> Result<Self, ChainError> {
    PipelineSource::<Err>::try_from(source).map(Self::construct)
  }

  /// Appends `stage` after every existing stage.
  pub fn append(&mut self, stage: Stage<Err>) -> &mut Self {
    self.stages.push(stage);
    self
  }

  /// Builder form of [`append`](Self::append).
  pub fn then(mut self, stage: Stage<Err>) -> Self {
    self.stages.push(stage);
    self
  }

  pub fn len(&self) -> usize {
    self.stages.len()
  }

  pub fn is_empty(&self) -> bool {
    self.stages.is_empty()
  }

  pub fn stages(&self) -> &[Stage<Err>] {
    &self.stages
  }

  /// Per-stage parameter/return type text, in stage order.
  pub fn annotations(&self) -> Vec<Annotation> {
    self.stages.iter().map(|stage| stage.annotation().clone()).collect()
  }

  /// Describes how types flow through the stages, e.g. `Pipeline(i32 -> String -> usize)`.
  ///
  /// A stage whose declared input matches the previous output shares its segment.
  /// When they differ, the stage's input is shown in parentheses after the
  /// previous output: `Pipeline(i32 -> i32(u8) -> u8)`.
  pub fn type_flow(&self) -> String {
    let mut types: Vec<String> = Vec::with_capacity(self.stages.len() + 1);
    for annotation in self.stages.iter().map(Stage::annotation) {
      match types.last_mut() {
        Some(previous) => {
          if *previous != annotation.param_type {
            *previous = format!("{}({})", previous, annotation.param_type);
          }
        }
        None => types.push(annotation.param_type.clone()),
      }
      types.push(annotation.return_type.clone());
    }
    format!("Pipeline({})", types.join(" -> "))
  }

  /// Wraps the whole pipeline as one stage of another pipeline.
  pub fn into_stage(self) -> Stage<Err> {
    let annotation = match (self.stages.first(), self.stages.last()) {
      (Some(first), Some(last)) => Annotation::new(
        first.annotation().param_type.clone(),
        last.annotation().return_type.clone(),
      ),
      _ => Annotation::unspecified(),
    };
    Stage::raw(move |args: Argument| -> Result<StageOutput, Err> { self.call(args).map(StageOutput::Single) })
      .annotate(annotation.param_type, annotation.return_type)
  }
}

impl<Err> Default for Pipeline<Err>
where
  Err: std::error::Error + From<ChainError> + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}

impl<Err> Clone for Pipeline<Err>
where
  Err: std::error::Error + From<ChainError> + Send + Sync + 'static,
{
  fn clone(&self) -> Self {
    Self {
      stages: self.stages.clone(),
    }
  }
}

impl<Err> From<Stage<Err>> for Pipeline<Err>
where
  Err: std::error::Error + From<ChainError> + Send + Sync + 'static,
{
  fn from(stage: Stage<Err>) -> Self {
    Self::construct(stage)
  }
}

impl<Err> From<Pipeline<Err>> for Stage<Err>
where
  Err: std::error::Error + From<ChainError> + Send + Sync + 'static,
{
  fn from(pipeline: Pipeline<Err>) -> Self {
    pipeline.into_stage()
  }
}

impl<Err> FromIterator<Stage<Err>> for Pipeline<Err>
where
  Err: std::error::Error + From<ChainError> + Send + Sync + 'static,
{
  fn from_iter<I: IntoIterator<Item = Stage<Err>>>(iter: I) -> Self {
    Self {
      stages: iter.into_iter().collect(),
    }
  }
}

impl<Err> Extend<Stage<Err>> for Pipeline<Err>
where
  Err: std::error::Error + From<ChainError> + Send + Sync + 'static,
{
  fn extend<I: IntoIterator<Item = Stage<Err>>>(&mut self, iter: I) {
    self.stages.extend(iter);
  }
}

impl<Err> fmt::Display for Pipeline<Err>
where
  Err: std::error::Error + From<ChainError> + Send + Sync + 'static,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.type_flow())
  }
}

impl<Err> fmt::Debug for Pipeline<Err>
where
  Err: std::error::Error + From<ChainError> + Send + Sync + 'static,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Pipeline").field("stages", &self.stages).finish()
  }
}

impl<Err> Chainable for Pipeline<Err>
where
  Err: std::error::Error + From<ChainError> + Send + Sync + 'static,
{
  type Link = Stage<Err>;
  type Output = Result<Value, Err>;

  fn append(&mut self, link: Stage<Err>) -> &mut Self {
    Pipeline::append(self, link)
  }

  fn invoke(&self, item: Value) -> Result<Value, Err> {
    Pipeline::invoke(self, item)
  }
}

crate::impl_chain_operators!(
  [Err: std::error::Error + From<ChainError> + Send + Sync + 'static]
  Pipeline<Err> => Stage<Err>
);

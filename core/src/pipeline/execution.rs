// chaintools/src/pipeline/execution.rs

//! Contains the invocation methods of `Pipeline<Err>`: the bundle is threaded
//! through every stage in order and the final bundle is unwrapped to one value.

use crate::core::argument::Argument;
use crate::core::value::Value;
use crate::error::ChainError;
use crate::pipeline::definition::Pipeline;
use std::any::Any;
use tracing::{event, instrument, span, Level};

impl<Err> Pipeline<Err>
where
  Err: std::error::Error + From<ChainError> + Send + Sync + 'static,
{
  /// Threads `args` through every stage and returns the scalar value of the
  /// final bundle.
  ///
  /// The first stage error aborts the call and is returned exactly as the stage
  /// produced it. A final bundle holding several values or any keyword value is
  /// reported as `ChainError::NotScalar` (converted into `Err`).
  #[instrument(
        name = "Pipeline::call",
        skip_all,
        fields(num_stages = self.stages.len())
    )]
  pub fn call(&self, args: Argument) -> Result<Value, Err> {
    event!(Level::TRACE, "Pipeline invocation starting.");

    let mut args = args;
    for (stage_idx, stage) in self.stages.iter().enumerate() {
      let stage_span = span!(
        Level::TRACE,
        "pipeline_stage",
        stage_index = stage_idx,
        stage_name = stage.name().unwrap_or("<anonymous>")
      );
      let _stage_span_guard = stage_span.enter();

      args = match args.evaluate(stage) {
        Ok(next) => next,
        Err(e) => {
          event!(Level::DEBUG, error = %e, "Stage failed.");
          return Err(e);
        }
      };
    }

    event!(Level::TRACE, "Pipeline invocation completed.");
    args.into_value().map_err(Err::from)
  }

  /// Invokes the pipeline with one item as the single positional argument.
  pub fn invoke(&self, item: impl Any + Send + Sync) -> Result<Value, Err> {
    self.call(Argument::single(item))
  }

  /// Like [`invoke`](Self::invoke), then downcasts the result to `U`.
  pub fn invoke_as<U>(&self, item: impl Any + Send + Sync) -> Result<U, Err>
  where
    U: Any + Send + Sync + Clone,
  {
    self.invoke(item)?.take::<U>().map_err(Err::from)
  }
}

// chaintools/src/core/stage.rs

//! Defines `Stage<Err>`, one callable of a pipeline, together with the adapters
//! that turn ordinary closures into stages and the display `Annotation` each carries.

use crate::core::argument::Argument;
use crate::core::output::{IntoValues, StageOutput};
use crate::core::value::{display_type_name, Value};
use crate::error::{ChainError, ChainResult};
use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

/// Display text used when a stage declares no parameter or return type.
pub const UNSPECIFIED_TYPE: &str = "_";

/// Type-erased stage body: takes the incoming bundle, produces the tagged output.
pub type StageBody<Err> = Arc<dyn Fn(Argument) -> Result<StageOutput, Err> + Send + Sync + 'static>;

/// Parameter and return type text of one stage. Only used for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
  pub param_type: String,
  pub return_type: String,
}

impl Annotation {
  pub fn new(param_type: impl Into<String>, return_type: impl Into<String>) -> Self {
    Self {
      param_type: param_type.into(),
      return_type: return_type.into(),
    }
  }

  pub fn unspecified() -> Self {
    Self::new(UNSPECIFIED_TYPE, UNSPECIFIED_TYPE)
  }

  fn of<M, F: StageFn<M>>(return_type: &str) -> Self {
    Self::new(params_text(&F::param_type_names()), display_type_name(return_type))
  }
}

impl Default for Annotation {
  fn default() -> Self {
    Self::unspecified()
  }
}

// One parameter shows as its type, anything else as a tuple: `()`, `(i32, i32)`.
fn params_text(names: &[&'static str]) -> String {
  match names {
    [single] => display_type_name(single),
    _ => {
      let parts: Vec<String> = names.iter().map(|name| display_type_name(name)).collect();
      format!("({})", parts.join(", "))
    }
  }
}

/// A closure whose parameters can be filled from an [`Argument`] bundle.
///
/// Implemented for every `Fn(A1, .., An) -> R` with up to eight parameters whose
/// types are `Any + Send + Sync + Clone`. `Marker` is the parameter tuple and only
/// exists to keep the implementations apart.
pub trait StageFn<Marker>: Send + Sync + 'static {
  type Output;

  /// Unpacks `args` into the parameters and calls the closure.
  fn call_with(&self, args: Argument) -> ChainResult<Self::Output>;

  fn param_type_names() -> Vec<&'static str>;
}

macro_rules! impl_stage_fn {
  ($count:expr; $($param:ident),*) => {
    impl<Func, Ret, $($param,)*> StageFn<($($param,)*)> for Func
    where
      Func: Fn($($param),*) -> Ret + Send + Sync + 'static,
      $($param: Any + Send + Sync + Clone,)*
    {
      type Output = Ret;

      #[allow(non_snake_case, unused_mut, unused_variables)]
      fn call_with(&self, args: Argument) -> ChainResult<Ret> {
        let mut values = args.into_positional_exact($count)?.into_iter();
        $(
          let $param = values
            .next()
            .ok_or(ChainError::ArityMismatch { expected: $count, received: 0 })?
            .take::<$param>()?;
        )*
        Ok((self)($($param),*))
      }

      fn param_type_names() -> Vec<&'static str> {
        vec![$(type_name::<$param>()),*]
      }
    }
  };
}

impl_stage_fn!(0;);
impl_stage_fn!(1; A);
impl_stage_fn!(2; A, B);
impl_stage_fn!(3; A, B, C);
impl_stage_fn!(4; A, B, C, D);
impl_stage_fn!(5; A, B, C, D, E);
impl_stage_fn!(6; A, B, C, D, E, F);
impl_stage_fn!(7; A, B, C, D, E, F, G);
impl_stage_fn!(8; A, B, C, D, E, F, G, H);

/// One callable participating in a pipeline.
///
/// `Err` is the error type of the pipeline the stage belongs to. Adapter
/// failures (wrong arity, wrong argument type) are converted into it through
/// `From<ChainError>`; errors returned by the stage itself pass through untouched.
pub struct Stage<Err> {
  body: StageBody<Err>,
  annotation: Annotation,
  name: Option<String>,
}

impl<Err> Stage<Err>
where
  Err: From<ChainError> + 'static,
{
  /// Wraps a closure with full control over the bundle and the output tag.
  pub fn raw<E>(body: impl Fn(Argument) -> Result<StageOutput, E> + Send + Sync + 'static) -> Self
  where
    E: Into<Err>,
  {
    Self {
      body: Arc::new(move |args: Argument| -> Result<StageOutput, Err> { body(args).map_err(Into::into) }),
      annotation: Annotation::unspecified(),
      name: None,
    }
  }

  /// Wraps an infallible closure. Its return value is passed on as one value,
  /// even when it is a tuple.
  pub fn from_fn<M, F>(func: F) -> Self
  where
    F: StageFn<M>,
    F::Output: Any + Send + Sync,
  {
    let annotation = Annotation::of::<M, F>(type_name::<F::Output>());
    Self {
      body: Arc::new(move |args: Argument| -> Result<StageOutput, Err> {
        let ret = func.call_with(args).map_err(Err::from)?;
        Ok(StageOutput::single(ret))
      }),
      annotation,
      name: None,
    }
  }

  /// Wraps a fallible closure. An `Err` it returns is converted with `Into`
  /// and otherwise left as is.
  pub fn try_fn<M, F, T, E>(func: F) -> Self
  where
    F: StageFn<M, Output = Result<T, E>>,
    T: Any + Send + Sync,
    E: Into<Err>,
  {
    let annotation = Annotation::of::<M, F>(type_name::<T>());
    Self {
      body: Arc::new(move |args: Argument| -> Result<StageOutput, Err> {
        let ret = func.call_with(args).map_err(Err::from)?.map_err(Into::<Err>::into)?;
        Ok(StageOutput::single(ret))
      }),
      annotation,
      name: None,
    }
  }

  /// Wraps a closure whose returned sequence becomes the next stage's
  /// positional arguments, one element each.
  pub fn spread_fn<M, F>(func: F) -> Self
  where
    F: StageFn<M>,
    F::Output: IntoValues,
  {
    let annotation = Annotation::of::<M, F>(type_name::<F::Output>());
    Self {
      body: Arc::new(move |args: Argument| -> Result<StageOutput, Err> {
        let ret = func.call_with(args).map_err(Err::from)?;
        Ok(StageOutput::spread(ret))
      }),
      annotation,
      name: None,
    }
  }

  /// A stage that takes one incoming sequence of type `S` and spreads its
  /// elements into separate positional arguments for the next stage.
  pub fn spread<S>() -> Self
  where
    S: IntoValues + Any + Send + Sync + Clone,
  {
    let sequence_type = display_type_name(type_name::<S>());
    Self {
      body: Arc::new(|args: Argument| -> Result<StageOutput, Err> {
        let sequence = args.value::<S>().map_err(Err::from)?;
        Ok(StageOutput::spread(sequence))
      }),
      annotation: Annotation::new(sequence_type.clone(), sequence_type),
      name: Some("spread".to_string()),
    }
  }

  /// Overrides the display text of the parameter and return types.
  pub fn annotate(mut self, param_type: impl Into<String>, return_type: impl Into<String>) -> Self {
    self.annotation = Annotation::new(param_type, return_type);
    self
  }

  /// Labels the stage in tracing output.
  pub fn named(mut self, name: impl Into<String>) -> Self {
    self.name = Some(name.into());
    self
  }

  pub fn annotation(&self) -> &Annotation {
    &self.annotation
  }

  pub fn name(&self) -> Option<&str> {
    self.name.as_deref()
  }

  /// Calls the stage with a full bundle.
  pub fn call(&self, args: Argument) -> Result<StageOutput, Err> {
    (self.body)(args)
  }

  /// Calls the stage with a single element, as `map` does.
  pub fn apply(&self, item: Value) -> Result<Value, Err> {
    self.call(Argument::from(item)).map(StageOutput::into_value)
  }

  /// Calls the stage as a predicate, as `filter` does.
  pub fn test(&self, item: &Value) -> Result<bool, Err> {
    self.apply(item.clone())?.truthy().map_err(Err::from)
  }
}

impl<Err> Clone for Stage<Err> {
  fn clone(&self) -> Self {
    Self {
      body: Arc::clone(&self.body),
      annotation: self.annotation.clone(),
      name: self.name.clone(),
    }
  }
}

impl<Err> fmt::Debug for Stage<Err> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Stage")
      .field("name", &self.name)
      .field("param_type", &self.annotation.param_type)
      .field("return_type", &self.annotation.return_type)
      .finish()
  }
}

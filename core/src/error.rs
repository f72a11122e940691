// chaintools/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
  /// The dynamic source handed to `Pipeline::from_value` was not nothing,
  /// a stage, or a list of stages.
  #[error("Cannot build a pipeline from a value of type '{type_name}': expected (), a stage, or a list of stages")]
  Construction { type_name: String },

  #[error("Type mismatch (expected {expected}, found {found})")]
  TypeMismatch { expected: String, found: String },

  #[error("Stage takes {expected} positional argument(s) but {received} were given")]
  ArityMismatch { expected: usize, received: usize },

  #[error("Stage got unexpected keyword argument(s): {}", .names.join(", "))]
  UnexpectedKeywords { names: Vec<String> },

  /// Raised when the scalar value of a bundle is requested but the bundle
  /// holds several positional values or any keyword value.
  #[error("Argument bundle is not a single value ({positional} positional, {keywords} keyword)")]
  NotScalar { positional: usize, keywords: usize },

  #[error("Error in user-provided stage. Source: {source}")]
  StageFailed {
    #[source]
    source: AnyhowError,
  },
}

// Lets stages written against anyhow run in a `Pipeline<ChainError>`.
impl From<AnyhowError> for ChainError {
  fn from(err: AnyhowError) -> Self {
    match err.downcast::<ChainError>() {
      Ok(chain_err) => chain_err,
      Err(source) => ChainError::StageFailed { source },
    }
  }
}

pub type ChainResult<T, E = ChainError> = std::result::Result<T, E>;

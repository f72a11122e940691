// src/lib.rs

//! chaintools: chainable functions for Rust.
//!
//! A [`Pipeline`] is an ordered list of [`Stage`]s invoked as one unit, the
//! output of each stage becoming the input of the next:
//!  - Stages wrap ordinary closures (`Stage::from_fn`, `Stage::try_fn`) or take the
//!    raw positional/keyword [`Argument`] bundle (`Stage::raw`).
//!  - Multi-value results are spread into several arguments only when asked to
//!    (`Stage::spread_fn`, `Stage::spread`, `StageOutput::Spread`).
//!  - `pipeline >> stage` appends, `&pipeline << item` invokes.
//!  - `map` and `filter` apply the stages element-wise, lazily.
//!  - `Display` renders the type flow, e.g. `Pipeline(i32 -> String -> usize)`.
//!
//! ```
//! use chaintools::{ChainError, Pipeline, Stage};
//!
//! let pipeline = Pipeline::<ChainError>::new()
//!   >> Stage::from_fn(|x: i32| x * 2)
//!   >> Stage::from_fn(|x: i32| x.to_string());
//!
//! assert_eq!(pipeline.invoke_as::<String>(21).unwrap(), "42");
//! assert_eq!(pipeline.to_string(), "Pipeline(i32 -> i32 -> String)");
//! ```

pub mod core;
pub mod error;
pub mod pipeline;

// --- Re-exports for the Public API ---

pub use crate::core::argument::Argument;
pub use crate::core::chainable::Chainable;
pub use crate::core::output::{IntoValues, StageOutput};
pub use crate::core::stage::{Annotation, Stage, StageFn, UNSPECIFIED_TYPE};
pub use crate::core::value::{display_type_name, Value};

pub use crate::pipeline::bulk::LazyValues;
pub use crate::pipeline::definition::{Pipeline, PipelineSource};

pub use crate::error::{ChainError, ChainResult};

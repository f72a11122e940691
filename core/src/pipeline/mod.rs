// chaintools/src/pipeline/mod.rs

//! Defines the `Pipeline<Err>` struct, its construction, invocation and bulk application.

pub mod bulk;
pub mod definition;
pub mod execution;

// Re-export the main Pipeline struct
pub use bulk::LazyValues;
pub use definition::{Pipeline, PipelineSource};

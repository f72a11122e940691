pub mod argument;
pub mod chainable;
pub mod output;
pub mod stage;
pub mod value;

// Re-export key types for easier access from other chaintools modules (and lib.rs)
pub use argument::Argument;
pub use chainable::Chainable;
pub use output::{IntoValues, StageOutput};
pub use stage::{Annotation, Stage, StageFn, UNSPECIFIED_TYPE};
pub use value::Value;

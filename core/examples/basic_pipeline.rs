// chaintools/examples/basic_pipeline.rs

use chaintools::{ChainError, Pipeline, Stage};
use tracing::info;

fn main() -> Result<(), ChainError> {
  // Initialize tracing (optional, for demonstration)
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Basic Pipeline Example ---");

  // 1. Chain ordinary closures with `>>`.
  let pipeline = Pipeline::<ChainError>::new()
    >> Stage::from_fn(|counter: i32| counter + 1).named("alpha")
    >> Stage::from_fn(|counter: i32| counter * 2).named("beta")
    >> Stage::from_fn(|counter: i32| counter - 1).named("gamma");

  info!("Type flow: {}", pipeline);

  // 2. Invoke it, either by method or with `<<`.
  let result = pipeline.invoke_as::<i32>(5)?;
  info!("Final counter value: {}", result);

  // Expected: (5+1)*2 - 1 = 11
  assert_eq!(result, 11);
  assert_eq!((&pipeline << 5)?.take::<i32>()?, 11);

  Ok(())
}

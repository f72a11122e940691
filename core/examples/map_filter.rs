// chaintools/examples/map_filter.rs

use chaintools::{ChainError, Pipeline, Stage};
use tracing::info;

fn main() -> Result<(), ChainError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Element-wise Map and Filter ---");

  let scale = Pipeline::<ChainError>::new()
    >> Stage::from_fn(|x: i32| x * 3)
    >> Stage::from_fn(|x: i32| x - 1);
  let scaled: Vec<i32> = scale.map(1..=5).typed::<i32>().collect::<Result<_, _>>()?;
  info!("Scaled: {:?}", scaled);
  assert_eq!(scaled, vec![2, 5, 8, 11, 14]);

  let keep = Pipeline::<ChainError>::new()
    >> Stage::from_fn(|x: i32| x > 0).named("is_positive")
    >> Stage::from_fn(|x: i32| x % 2 == 0).named("is_even");
  let kept: Vec<i32> = keep.filter(vec![-2, -1, 0, 1, 2, 3, 4]).typed::<i32>().collect::<Result<_, _>>()?;
  info!("Kept: {:?}", kept);
  assert_eq!(kept, vec![2, 4]);

  Ok(())
}

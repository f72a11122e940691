// tests/bulk_tests.rs
mod common;

use chaintools::{ChainError, Pipeline, Stage};
use common::*;
use serial_test::serial;
use std::sync::Arc;

#[test]
fn test_map_composes_stages_per_element() {
  setup_tracing();
  let f = |x: i32| x * 10;
  let g = |x: i32| x - 1;
  let pipeline = Pipeline::<ChainError>::new() >> Stage::from_fn(f) >> Stage::from_fn(g);

  let mapped: Vec<i32> = pipeline
    .map(vec![1, 2, 3])
    .typed::<i32>()
    .collect::<Result<_, _>>()
    .unwrap();

  assert_eq!(mapped, vec![g(f(1)), g(f(2)), g(f(3))]);
}

#[test]
fn test_map_with_empty_pipeline_yields_items_unchanged() {
  setup_tracing();
  let pipeline = Pipeline::<ChainError>::new();
  let mapped: Vec<String> = pipeline
    .map(["a".to_string(), "b".to_string()])
    .typed::<String>()
    .collect::<Result<_, _>>()
    .unwrap();

  assert_eq!(mapped, vec!["a", "b"]);
}

#[test]
fn test_filter_keeps_elements_passing_every_stage() {
  setup_tracing();
  let is_positive = Stage::from_fn(|x: i32| x > 0);
  let is_even = Stage::from_fn(|x: i32| x % 2 == 0);
  let pipeline = Pipeline::<ChainError>::new() >> is_positive >> is_even;

  let kept: Vec<i32> = pipeline
    .filter(vec![-2, -1, 0, 1, 2, 3, 4])
    .typed::<i32>()
    .collect::<Result<_, _>>()
    .unwrap();

  assert_eq!(kept, vec![2, 4]);
}

#[test]
fn test_filter_rejects_non_boolean_predicate() {
  setup_tracing();
  let pipeline = Pipeline::<ChainError>::construct(double());
  let mut filtered = pipeline.filter(vec![1]);

  match filtered.next() {
    Some(Err(ChainError::TypeMismatch { expected, found })) => {
      assert_eq!(expected, "bool");
      assert_eq!(found, "i32");
    }
    other => panic!("Expected TypeMismatch, got {:?}", other),
  }
  assert!(filtered.next().is_none());
}

#[test]
#[serial]
fn test_map_is_lazy_and_runs_each_stage_once_per_element() {
  setup_tracing();
  reset_counters();
  let pipeline = Pipeline::<TestError>::new()
    >> counting_stage(Arc::clone(&STAGE_EXEC_COUNTER))
    >> counting_stage(Arc::clone(&STAGE_EXEC_COUNTER));

  let mut mapped = pipeline.map(1..=3).typed::<i32>();
  assert_eq!(stage_exec_count(), 0, "nothing runs before the sequence is consumed");

  assert_eq!(mapped.next(), Some(Ok(1)));
  assert_eq!(stage_exec_count(), 2);

  let rest: Vec<_> = mapped.collect();
  assert_eq!(rest, vec![Ok(2), Ok(3)]);
  assert_eq!(stage_exec_count(), 6);
}

#[test]
#[serial]
fn test_filter_skips_later_stages_for_rejected_elements() {
  setup_tracing();
  reset_counters();
  let pipeline = Pipeline::<TestError>::new()
    >> Stage::from_fn(|x: i32| x > 2)
    >> Stage::from_fn(|x: i32| {
      STAGE_EXEC_COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
      x < 5
    });

  let kept: Vec<_> = pipeline.filter(0..7).typed::<i32>().collect();
  assert_eq!(kept, vec![Ok(3), Ok(4)]);
  // Only 3, 4, 5 and 6 reach the second predicate.
  assert_eq!(stage_exec_count(), 4);
}

#[test]
fn test_map_yields_stage_error_in_place_of_element() {
  setup_tracing();
  let pipeline = Pipeline::<TestError>::new()
    >> Stage::try_fn(|x: i32| {
      if x == 2 {
        Err(TestError::Stage("two is not allowed".to_string()))
      } else {
        Ok(x * 100)
      }
    });

  let results: Vec<_> = pipeline.map(vec![1, 2, 3]).typed::<i32>().collect();
  assert_eq!(
    results,
    vec![Ok(100), Err(TestError::Stage("two is not allowed".to_string())), Ok(300)]
  );
}

// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use chaintools::{ChainError, Stage};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc, Mutex,
};
use tracing::Level;

// --- Common Error Type for Tests ---
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)] // Clone, PartialEq, Eq for assertions
pub enum TestError {
  #[error("chaintools error: {0}")]
  Chain(String), // Store as String for Eq comparison

  #[error("Test stage failed: {0}")]
  Stage(String),
}

impl From<ChainError> for TestError {
  fn from(ce: ChainError) -> Self {
    TestError::Chain(format!("{:?}", ce))
  }
}

// --- Common Stage Creators ---
pub fn double() -> Stage<ChainError> {
  Stage::from_fn(|x: i32| x * 2).named("double")
}

pub fn increment() -> Stage<ChainError> {
  Stage::from_fn(|x: i32| x + 1).named("increment")
}

pub fn square() -> Stage<ChainError> {
  Stage::from_fn(|x: i32| x * x).named("square")
}

/// A stage that counts its calls and otherwise passes its input through.
pub fn counting_stage(counter: Arc<AtomicUsize>) -> Stage<TestError> {
  Stage::from_fn(move |x: i32| {
    counter.fetch_add(1, Ordering::SeqCst);
    tracing::debug!(target: "test_stages", value = x, "counting stage ran");
    x
  })
}

pub fn failing_stage(error_message: &'static str) -> Stage<TestError> {
  Stage::try_fn(move |x: i32| {
    tracing::warn!(target: "test_stages", value = x, "failing with: '{}'", error_message);
    Err::<i32, _>(TestError::Stage(error_message.to_string()))
  })
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::TRACE)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Atomic counter shared by tests that check how often stages run ---
pub static STAGE_EXEC_COUNTER: Lazy<Arc<AtomicUsize>> = Lazy::new(|| Arc::new(AtomicUsize::new(0)));

pub fn reset_counters() {
  STAGE_EXEC_COUNTER.store(0, Ordering::SeqCst);
}

pub fn stage_exec_count() -> usize {
  STAGE_EXEC_COUNTER.load(Ordering::SeqCst)
}

// --- Log capture: runs `f` under a thread-local subscriber at `max_level` ---
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
  pub fn contents(&self) -> String {
    String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
  }
}

impl std::io::Write for CapturedLogs {
  fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
    self.0.lock().unwrap().extend_from_slice(buf);
    Ok(buf.len())
  }

  fn flush(&mut self) -> std::io::Result<()> {
    Ok(())
  }
}

pub fn capture_logs<R>(max_level: Level, f: impl FnOnce() -> R) -> (R, String) {
  let logs = CapturedLogs::default();
  let writer = logs.clone();
  let subscriber = tracing_subscriber::fmt()
    .with_max_level(max_level)
    .with_ansi(false)
    .with_writer(move || writer.clone())
    .finish();
  let result = tracing::subscriber::with_default(subscriber, f);
  (result, logs.contents())
}

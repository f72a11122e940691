// chaintools/examples/spread_arguments.rs

use chaintools::{Argument, ChainError, Pipeline, Stage, StageOutput};
use tracing::info;

fn volume(width: f64, height: f64, depth: f64) -> f64 {
  width * height * depth
}

fn main() -> Result<(), ChainError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

  info!("--- Spreading Multi-Value Results ---");

  // A tuple result is one value unless the pipeline says otherwise.
  let parse = Stage::try_fn(|dims: String| -> Result<(f64, f64, f64), ChainError> {
    let parts: Vec<f64> = dims
      .split('x')
      .map(|p| p.trim().parse::<f64>().map_err(|e| anyhow::anyhow!("bad dimension '{}': {}", p, e)))
      .collect::<Result<_, _>>()?;
    match parts.as_slice() {
      [w, h, d] => Ok((*w, *h, *d)),
      _ => Err(ChainError::ArityMismatch { expected: 3, received: parts.len() }),
    }
  })
  .named("parse");

  let pipeline = Pipeline::<ChainError>::new()
    >> parse
    >> Stage::spread::<(f64, f64, f64)>()
    >> Stage::from_fn(volume).named("volume");

  info!("Type flow: {}", pipeline);
  let litres = pipeline.invoke_as::<f64>("10 x 20 x 5".to_string())? / 1000.0;
  info!("Volume: {} l", litres);
  assert_eq!(litres, 1.0);

  // Raw stages see keyword values and may forward them.
  let with_unit = Stage::<ChainError>::raw(|args: Argument| -> Result<StageOutput, ChainError> {
    let value = args.value_at::<f64>(0)?;
    let unit = args.keyword("unit").and_then(|u| u.downcast_ref::<&'static str>()).copied().unwrap_or("");
    Ok(StageOutput::single(format!("{:.1}{}", value, unit)))
  });
  let labelled = Pipeline::<ChainError>::construct(with_unit);
  let text = labelled.call(Argument::single(litres).with_keyword("unit", " l"))?.take::<String>()?;
  info!("Labelled: {}", text);

  Ok(())
}

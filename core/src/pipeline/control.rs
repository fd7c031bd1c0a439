// core/src/pipeline/control.rs

//! Flow signals returned by step handlers and by a whole run.

/// Returned by a handler: keep going, or halt the pipeline here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineControl {
  Continue,
  Stop,
}

/// Outcome of a run that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineResult {
  /// Every step ran.
  Completed,
  /// A handler returned [`PipelineControl::Stop`].
  Stopped,
}

// core/src/pipeline/definition.rs

//! `Pipeline<TData, Err>`: step declarations and handler registration.

use crate::error::ClinicError;
use crate::pipeline::context_data::ContextData;
use crate::pipeline::control::PipelineControl;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

/// A boxed step handler. It receives a clone of the shared context and
/// resolves to a flow signal or the pipeline's error type.
pub type Handler<TData, Err> = Box<
  dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<PipelineControl, Err>> + Send>>
    + Send
    + Sync,
>;

/// A named step. Optional steps without handlers are skipped instead of
/// failing the run.
#[derive(Debug, Clone)]
pub struct StepDef {
  pub name: String,
  pub optional: bool,
}

pub struct Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<ClinicError> + Send + Sync + 'static,
{
  pub(crate) name: &'static str,
  pub(crate) steps: Vec<StepDef>,
  pub(crate) handlers: HashMap<String, Vec<Handler<TData, Err>>>,
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<ClinicError> + Send + Sync + 'static,
{
  /// Declares the ordered steps as `(name, optional)` pairs.
  ///
  /// Panics on duplicate step names.
  pub fn new(name: &'static str, step_defs: &[(&str, bool)]) -> Self {
    let mut steps: Vec<StepDef> = Vec::with_capacity(step_defs.len());
    for (step_name, optional) in step_defs {
      if steps.iter().any(|s| s.name == *step_name) {
        panic!("Pipeline '{}': step '{}' declared twice.", name, step_name);
      }
      steps.push(StepDef {
        name: (*step_name).to_string(),
        optional: *optional,
      });
    }

    Self {
      name,
      steps,
      handlers: HashMap::new(),
    }
  }

  pub fn name(&self) -> &'static str {
    self.name
  }

  pub fn step_names(&self) -> impl Iterator<Item = &str> {
    self.steps.iter().map(|s| s.name.as_str())
  }

  /// Registers a handler for `step_name`. Handlers of the same step run in
  /// registration order.
  ///
  /// Panics if the step was not declared; that is a wiring bug, not a runtime
  /// condition.
  pub fn on_root<F>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, Err>> + Send + 'static,
  {
    if !self.steps.iter().any(|s| s.name == step_name) {
      panic!(
        "Pipeline '{}': step '{}' not found in pipeline definition.",
        self.name, step_name
      );
    }
    let boxed: Handler<TData, Err> = Box::new(move |ctx_data| Box::pin(handler_fn(ctx_data)));
    self.handlers.entry(step_name.to_string()).or_default().push(boxed);
  }
}

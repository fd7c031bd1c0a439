// core/src/pipeline/mod.rs

//! A small step-pipeline engine.
//!
//! Every multi-step flow of the clinic (booking, cancelling, status updates,
//! sign-up, sign-in) is an ordered list of named steps run against a shared
//! [`ContextData`]. Handlers return [`PipelineControl`] to continue or halt
//! and a typed error to fail the run.

pub mod context_data;
pub mod control;
pub mod definition;
pub mod execution;

pub use context_data::ContextData;
pub use control::{PipelineControl, PipelineResult};
pub use definition::{Handler, Pipeline, StepDef};

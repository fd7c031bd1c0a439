// app/src/pipelines/mod.rs

//! The sign-up and sign-in pipelines. Booking pipelines live in
//! `clinic_core::booking`.

use crate::errors::AppError;
use clinic_core::Pipeline;

pub mod contexts;
pub mod signin_pipeline;
pub mod signup_pipeline;

pub use contexts::{SigninCtxData, SignupCtxData};

/// Built once at startup and shared through `AppState`.
pub struct AuthPipelines {
  pub signup: Pipeline<SignupCtxData, AppError>,
  pub signin: Pipeline<SigninCtxData, AppError>,
}

impl AuthPipelines {
  pub fn new() -> Self {
    let pipelines = Self {
      signup: signup_pipeline::build_signup_pipeline(),
      signin: signin_pipeline::build_signin_pipeline(),
    };
    tracing::info!("Authentication pipelines built.");
    pipelines
  }
}

impl Default for AuthPipelines {
  fn default() -> Self {
    Self::new()
  }
}

// core/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

use crate::appointment::Slot;

#[derive(Debug, Error)]
pub enum ClinicError {
  #[error("Please login to access this page")]
  LoginRequired,

  #[error("Admin access required")]
  AdminRequired,

  #[error("This time slot is already booked ({0})")]
  SlotTaken(Slot),

  #[error("Validation error: {0}")]
  Validation(String),

  #[error("Not found: {0}")]
  NotFound(String),

  #[error("Unrecognized appointment status '{0}'")]
  InvalidStatus(String),

  #[error("Handler missing for non-optional step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("Store operation failed. Source: {source}")]
  Store {
    #[source]
    source: AnyhowError,
  },
}

impl ClinicError {
  /// Wraps any store-side failure (driver errors, I/O, ...).
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    ClinicError::Store {
      source: AnyhowError::new(err),
    }
  }

  /// Whether the error is caused by the caller rather than by the system.
  pub fn is_user_facing(&self) -> bool {
    !matches!(self, ClinicError::HandlerMissing { .. } | ClinicError::Store { .. })
  }
}

impl From<AnyhowError> for ClinicError {
  fn from(err: AnyhowError) -> Self {
    ClinicError::Store { source: err }
  }
}

pub type ClinicResult<T, E = ClinicError> = std::result::Result<T, E>;

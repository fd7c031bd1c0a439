// core/src/access.rs

//! The access control gate: who is calling, and what they may do.

use crate::error::{ClinicError, ClinicResult};
use serde::Serialize;

/// A logged-in user as seen by request handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
  pub user_id: i64,
  pub name: String,
}

/// The caller of an operation, resolved once per request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Caller {
  #[default]
  Anonymous,
  Patient(Identity),
  Admin(Identity),
}

impl Caller {
  /// Builds a caller from a stored user record.
  pub fn from_user(user_id: i64, name: impl Into<String>, is_admin: bool) -> Self {
    let identity = Identity {
      user_id,
      name: name.into(),
    };
    if is_admin {
      Caller::Admin(identity)
    } else {
      Caller::Patient(identity)
    }
  }

  pub fn identity(&self) -> Option<&Identity> {
    match self {
      Caller::Anonymous => None,
      Caller::Patient(identity) | Caller::Admin(identity) => Some(identity),
    }
  }

  pub fn is_authenticated(&self) -> bool {
    !matches!(self, Caller::Anonymous)
  }

  pub fn is_admin(&self) -> bool {
    matches!(self, Caller::Admin(_))
  }
}

/// Capability levels checked by the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
  /// Any logged-in user.
  Authenticated,
  /// Users carrying the admin flag.
  Admin,
}

pub struct AccessGate;

impl AccessGate {
  /// Returns the caller's identity when it holds `capability`.
  ///
  /// An anonymous caller asking for `Admin` gets `AdminRequired`, not
  /// `LoginRequired`: admin pages bounce to the home page either way.
  pub fn require(caller: &Caller, capability: Capability) -> ClinicResult<&Identity> {
    match (caller, capability) {
      (Caller::Admin(identity), _) => Ok(identity),
      (Caller::Patient(identity), Capability::Authenticated) => Ok(identity),
      (Caller::Patient(_), Capability::Admin) | (Caller::Anonymous, Capability::Admin) => {
        tracing::debug!(?capability, "Access denied: admin required.");
        Err(ClinicError::AdminRequired)
      }
      (Caller::Anonymous, Capability::Authenticated) => {
        tracing::debug!(?capability, "Access denied: login required.");
        Err(ClinicError::LoginRequired)
      }
    }
  }
}

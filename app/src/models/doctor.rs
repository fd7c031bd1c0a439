// app/src/models/doctor.rs

use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Doctor {
  pub id: i64,
  pub name: String,
  pub specialization: String,
  pub qualifications: Option<String>,
  pub experience: Option<i64>,
  pub email: Option<String>,
  pub phone: Option<String>,
  pub available: bool,
}

/// A doctor record as submitted by the admin form, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDoctor {
  pub name: String,
  pub specialization: String,
  pub qualifications: Option<String>,
  pub experience: Option<i64>,
  pub email: Option<String>,
  pub phone: Option<String>,
}

/// Filters of the patient-facing doctor listing. Empty strings mean "no
/// filter".
#[derive(Debug, Clone, Default)]
pub struct DoctorFilter {
  pub search: Option<String>,
  pub specialty: Option<String>,
}

impl DoctorFilter {
  pub fn new(search: Option<String>, specialty: Option<String>) -> Self {
    let clean = |value: Option<String>| value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
    Self {
      search: clean(search),
      specialty: clean(specialty),
    }
  }
}

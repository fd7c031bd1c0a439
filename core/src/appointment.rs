// core/src/appointment.rs

//! Appointment records, their status and the slot they occupy.

use crate::error::{ClinicError, ClinicResult};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
  Pending,
  Confirmed,
  Cancelled,
  Rejected,
}

impl AppointmentStatus {
  pub const ALL: [AppointmentStatus; 4] = [
    AppointmentStatus::Pending,
    AppointmentStatus::Confirmed,
    AppointmentStatus::Cancelled,
    AppointmentStatus::Rejected,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      AppointmentStatus::Pending => "pending",
      AppointmentStatus::Confirmed => "confirmed",
      AppointmentStatus::Cancelled => "cancelled",
      AppointmentStatus::Rejected => "rejected",
    }
  }

  /// Active appointments occupy their slot.
  pub fn is_active(&self) -> bool {
    !matches!(self, AppointmentStatus::Cancelled)
  }
}

impl fmt::Display for AppointmentStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for AppointmentStatus {
  type Err = ClinicError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    AppointmentStatus::ALL
      .into_iter()
      .find(|status| status.as_str() == s)
      .ok_or_else(|| ClinicError::InvalidStatus(s.to_string()))
  }
}

/// A `(doctor, date, time)` triple. Date and time are zero-padded
/// `YYYY-MM-DD` and `HH:MM` strings, so equal slots compare equal as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Slot {
  pub doctor_id: i64,
  pub date: String,
  pub time: String,
}

impl Slot {
  pub fn new(doctor_id: i64, date: &str, time: &str) -> ClinicResult<Self> {
    let date = date.trim();
    let time = time.trim();

    if date.is_empty() || time.is_empty() {
      return Err(ClinicError::Validation("Date and time are required.".to_string()));
    }
    // chrono accepts unpadded and signed fields, so only the canonical
    // rendering of the parsed value is a valid slot string.
    let canonical_date = NaiveDate::parse_from_str(date, DATE_FORMAT)
      .ok()
      .map(|d| d.format(DATE_FORMAT).to_string())
      .filter(|formatted| formatted == date)
      .ok_or_else(|| ClinicError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD.", date)))?;
    let canonical_time = NaiveTime::parse_from_str(time, TIME_FORMAT)
      .ok()
      .map(|t| t.format(TIME_FORMAT).to_string())
      .filter(|formatted| formatted == time)
      .ok_or_else(|| ClinicError::Validation(format!("Invalid time '{}', expected HH:MM.", time)))?;

    Ok(Slot {
      doctor_id,
      date: canonical_date,
      time: canonical_time,
    })
  }
}

impl fmt::Display for Slot {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "doctor {} on {} at {}", self.doctor_id, self.date, self.time)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Appointment {
  pub id: i64,
  pub patient_id: i64,
  pub slot: Slot,
  pub status: AppointmentStatus,
  pub notes: Option<String>,
}

/// A booking request that passed the gate and slot validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
  pub patient_id: i64,
  pub slot: Slot,
  pub notes: Option<String>,
}

impl NewAppointment {
  pub fn new(patient_id: i64, slot: Slot, notes: Option<String>) -> Self {
    let notes = notes
      .map(|n| n.trim().to_string())
      .filter(|n| !n.is_empty());
    Self { patient_id, slot, notes }
  }
}

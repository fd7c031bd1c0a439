// app/src/models/appointment.rs

use clinic_core::{Appointment, AppointmentStatus, ClinicError, ClinicResult, Slot};
use serde::Serialize;
use sqlx::FromRow;

/// Raw `appointments` row.
#[derive(Debug, Clone, FromRow)]
pub struct AppointmentRow {
  pub id: i64,
  pub patient_id: i64,
  pub doctor_id: i64,
  pub appointment_date: String,
  pub appointment_time: String,
  pub status: String,
  pub notes: Option<String>,
}

impl TryFrom<AppointmentRow> for Appointment {
  type Error = ClinicError;

  fn try_from(row: AppointmentRow) -> ClinicResult<Self> {
    Ok(Appointment {
      id: row.id,
      patient_id: row.patient_id,
      status: row.status.parse::<AppointmentStatus>()?,
      slot: Slot {
        doctor_id: row.doctor_id,
        date: row.appointment_date,
        time: row.appointment_time,
      },
      notes: row.notes,
    })
  }
}

/// An appointment on the patient dashboard.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PatientAppointment {
  pub id: i64,
  pub doctor_id: i64,
  pub appointment_date: String,
  pub appointment_time: String,
  pub status: String,
  pub notes: Option<String>,
  pub doctor_name: String,
  pub specialization: String,
}

/// An appointment on the admin dashboard.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AdminAppointment {
  pub id: i64,
  pub appointment_date: String,
  pub appointment_time: String,
  pub status: String,
  pub notes: Option<String>,
  pub patient_name: String,
  pub patient_email: String,
  pub doctor_name: String,
  pub specialization: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardCounts {
  pub pending_appointments: i64,
  pub available_doctors: i64,
  pub patients: i64,
}

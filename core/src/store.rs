// core/src/store.rs

//! The persistence seam for appointments.

use crate::appointment::{Appointment, AppointmentStatus, NewAppointment, Slot};
use crate::error::ClinicResult;
use async_trait::async_trait;

/// What the booking lifecycle needs from the persistent store.
///
/// Implementations own the slot invariant: at most one active appointment per
/// slot. `insert_pending` and `set_status` must enforce it atomically with the
/// write and report a violation as `ClinicError::SlotTaken`.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
  async fn doctor_exists(&self, doctor_id: i64) -> ClinicResult<bool>;

  /// Number of non-cancelled appointments occupying `slot`.
  async fn count_active_in_slot(&self, slot: &Slot) -> ClinicResult<i64>;

  /// Inserts a `pending` appointment.
  async fn insert_pending(&self, new_appointment: &NewAppointment) -> ClinicResult<Appointment>;

  async fn find_appointment(&self, appointment_id: i64) -> ClinicResult<Option<Appointment>>;

  /// Cancels the appointment if `patient_id` owns it. Returns whether a row
  /// matched.
  async fn cancel_owned(&self, appointment_id: i64, patient_id: i64) -> ClinicResult<bool>;

  /// Overwrites the status. Returns whether a row matched.
  async fn set_status(&self, appointment_id: i64, status: AppointmentStatus) -> ClinicResult<bool>;
}

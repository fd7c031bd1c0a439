// tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every helper.

use async_trait::async_trait;
use clinic_core::{
  Appointment, AppointmentLifecycle, AppointmentStatus, AppointmentStore, BookingRequest, Caller, ClinicError,
  ClinicResult, NewAppointment, Slot,
};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::Level;

// --- In-memory store ---

#[derive(Default)]
struct MemoryState {
  doctors: HashSet<i64>,
  appointments: Vec<Appointment>,
  next_id: i64,
}

/// Keeps everything behind one mutex so the check-and-write in
/// `insert_pending` and `set_status` is atomic, like the SQL store's unique
/// index.
#[derive(Default)]
pub struct MemoryStore {
  state: Mutex<MemoryState>,
}

impl MemoryStore {
  pub fn with_doctors(doctor_ids: &[i64]) -> Arc<Self> {
    let store = MemoryStore::default();
    store.state.lock().doctors.extend(doctor_ids.iter().copied());
    Arc::new(store)
  }

  pub fn appointments(&self) -> Vec<Appointment> {
    self.state.lock().appointments.clone()
  }

  pub fn status_of(&self, appointment_id: i64) -> Option<AppointmentStatus> {
    self
      .state
      .lock()
      .appointments
      .iter()
      .find(|a| a.id == appointment_id)
      .map(|a| a.status)
  }

  pub fn active_in(&self, slot: &Slot) -> usize {
    self
      .state
      .lock()
      .appointments
      .iter()
      .filter(|a| &a.slot == slot && a.status.is_active())
      .count()
  }
}

fn occupied_by_other(state: &MemoryState, slot: &Slot, except_id: Option<i64>) -> bool {
  state
    .appointments
    .iter()
    .any(|a| Some(a.id) != except_id && &a.slot == slot && a.status.is_active())
}

#[async_trait]
impl AppointmentStore for MemoryStore {
  async fn doctor_exists(&self, doctor_id: i64) -> ClinicResult<bool> {
    Ok(self.state.lock().doctors.contains(&doctor_id))
  }

  async fn count_active_in_slot(&self, slot: &Slot) -> ClinicResult<i64> {
    Ok(self.active_in(slot) as i64)
  }

  async fn insert_pending(&self, new_appointment: &NewAppointment) -> ClinicResult<Appointment> {
    let mut state = self.state.lock();
    if occupied_by_other(&state, &new_appointment.slot, None) {
      return Err(ClinicError::SlotTaken(new_appointment.slot.clone()));
    }
    state.next_id += 1;
    let appointment = Appointment {
      id: state.next_id,
      patient_id: new_appointment.patient_id,
      slot: new_appointment.slot.clone(),
      status: AppointmentStatus::Pending,
      notes: new_appointment.notes.clone(),
    };
    state.appointments.push(appointment.clone());
    Ok(appointment)
  }

  async fn find_appointment(&self, appointment_id: i64) -> ClinicResult<Option<Appointment>> {
    Ok(
      self
        .state
        .lock()
        .appointments
        .iter()
        .find(|a| a.id == appointment_id)
        .cloned(),
    )
  }

  async fn cancel_owned(&self, appointment_id: i64, patient_id: i64) -> ClinicResult<bool> {
    let mut state = self.state.lock();
    match state
      .appointments
      .iter_mut()
      .find(|a| a.id == appointment_id && a.patient_id == patient_id)
    {
      Some(appointment) => {
        appointment.status = AppointmentStatus::Cancelled;
        Ok(true)
      }
      None => Ok(false),
    }
  }

  async fn set_status(&self, appointment_id: i64, status: AppointmentStatus) -> ClinicResult<bool> {
    let mut state = self.state.lock();
    let Some(slot) = state
      .appointments
      .iter()
      .find(|a| a.id == appointment_id)
      .map(|a| a.slot.clone())
    else {
      return Ok(false);
    };
    if status.is_active() && occupied_by_other(&state, &slot, Some(appointment_id)) {
      return Err(ClinicError::SlotTaken(slot));
    }
    if let Some(appointment) = state.appointments.iter_mut().find(|a| a.id == appointment_id) {
      appointment.status = status;
    }
    Ok(true)
  }
}

// --- Fixtures ---

pub const DOCTOR_ID: i64 = 1;
pub const OTHER_DOCTOR_ID: i64 = 2;

pub fn lifecycle_with(store: &Arc<MemoryStore>) -> AppointmentLifecycle {
  AppointmentLifecycle::new(store.clone())
}

pub fn patient(user_id: i64) -> Caller {
  Caller::from_user(user_id, format!("Patient {}", user_id), false)
}

pub fn admin() -> Caller {
  Caller::from_user(100, "Admin User", true)
}

pub fn request(doctor_id: i64, date: &str, time: &str) -> BookingRequest {
  BookingRequest {
    doctor_id,
    date: date.to_string(),
    time: time.to_string(),
    notes: None,
  }
}

// --- Helper for Tracing Setup ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// core/src/booking/lifecycle.rs

//! The appointment lifecycle: booking, patient cancellation and admin status
//! updates, each run as a pipeline behind the access gate.

use crate::access::{AccessGate, Caller, Capability};
use crate::appointment::{Appointment, AppointmentStatus, NewAppointment, Slot};
use crate::booking::contexts::{BookingCtxData, BookingRequest, CancelCtxData, StatusCtxData};
use crate::booking::slot_checker::SlotChecker;
use crate::error::{ClinicError, ClinicResult};
use crate::pipeline::{ContextData, Pipeline, PipelineControl};
use crate::store::AppointmentStore;
use anyhow::anyhow;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

pub struct AppointmentLifecycle {
  slots: SlotChecker,
  book_pipeline: Pipeline<BookingCtxData, ClinicError>,
  cancel_pipeline: Pipeline<CancelCtxData, ClinicError>,
  status_pipeline: Pipeline<StatusCtxData, ClinicError>,
}

impl AppointmentLifecycle {
  pub fn new(store: Arc<dyn AppointmentStore>) -> Self {
    let slots = SlotChecker::new(store.clone());
    Self {
      book_pipeline: book_pipeline(store.clone(), slots.clone()),
      cancel_pipeline: cancel_pipeline(store.clone()),
      status_pipeline: status_pipeline(store),
      slots,
    }
  }

  pub fn slots(&self) -> &SlotChecker {
    &self.slots
  }

  /// Books `request` for the calling patient. The new appointment is
  /// `pending`.
  #[instrument(
    name = "lifecycle::book",
    skip(self, caller, request),
    fields(doctor_id = request.doctor_id, date = %request.date, time = %request.time),
    err(Display)
  )]
  pub async fn book(&self, caller: &Caller, request: BookingRequest) -> ClinicResult<Appointment> {
    let ctx_data = ContextData::new(BookingCtxData::new(caller.clone(), request));
    self.book_pipeline.run(ctx_data.clone()).await?;

    let appointment = ctx_data.read().appointment.clone();
    appointment.ok_or_else(|| ClinicError::from(anyhow!("booking finished without an appointment")))
  }

  /// Cancels an appointment owned by the caller. Returns `false`, leaving
  /// every record untouched, when the caller does not own it or it does not
  /// exist.
  #[instrument(name = "lifecycle::cancel", skip(self, caller), err(Display))]
  pub async fn cancel(&self, caller: &Caller, appointment_id: i64) -> ClinicResult<bool> {
    let ctx_data = ContextData::new(CancelCtxData::new(caller.clone(), appointment_id));
    self.cancel_pipeline.run(ctx_data.clone()).await?;
    let cancelled = ctx_data.read().cancelled;
    Ok(cancelled)
  }

  /// Admin-only status overwrite. Only the four known statuses are accepted.
  /// Returns the applied status, or `None` when the appointment does not exist.
  #[instrument(name = "lifecycle::update_status", skip(self, caller), err(Display))]
  pub async fn update_status(
    &self,
    caller: &Caller,
    appointment_id: i64,
    new_status: &str,
  ) -> ClinicResult<Option<AppointmentStatus>> {
    let ctx_data = ContextData::new(StatusCtxData::new(caller.clone(), appointment_id, new_status));
    self.status_pipeline.run(ctx_data.clone()).await?;
    let guard = ctx_data.read();
    Ok(guard.status.filter(|_| guard.updated))
  }
}

// --- book ---

fn book_pipeline(store: Arc<dyn AppointmentStore>, slots: SlotChecker) -> Pipeline<BookingCtxData, ClinicError> {
  let mut p = Pipeline::new(
    "book_appointment",
    &[
      ("authorize", false),
      ("validate_slot", false),
      ("check_doctor", false),
      ("check_slot", false),
      ("insert_appointment", false),
    ],
  );

  p.on_root("authorize", authorize_booking);
  p.on_root("validate_slot", validate_slot);
  let doctor_store = store.clone();
  p.on_root("check_doctor", move |ctx| check_doctor(ctx, doctor_store.clone()));
  p.on_root("check_slot", move |ctx| check_slot(ctx, slots.clone()));
  p.on_root("insert_appointment", move |ctx| insert_appointment(ctx, store.clone()));
  p
}

async fn authorize_booking(ctx_data: ContextData<BookingCtxData>) -> ClinicResult<PipelineControl> {
  let patient_id = {
    let guard = ctx_data.read();
    AccessGate::require(&guard.caller, Capability::Authenticated)?.user_id
  };
  ctx_data.write().patient_id = Some(patient_id);
  Ok(PipelineControl::Continue)
}

async fn validate_slot(ctx_data: ContextData<BookingCtxData>) -> ClinicResult<PipelineControl> {
  let slot = {
    let guard = ctx_data.read();
    Slot::new(guard.request.doctor_id, &guard.request.date, &guard.request.time)?
  };
  ctx_data.write().slot = Some(slot);
  Ok(PipelineControl::Continue)
}

async fn check_doctor(
  ctx_data: ContextData<BookingCtxData>,
  store: Arc<dyn AppointmentStore>,
) -> ClinicResult<PipelineControl> {
  let doctor_id = ctx_data.read().request.doctor_id;
  if !store.doctor_exists(doctor_id).await? {
    warn!(doctor_id, "Booking attempted for unknown doctor.");
    return Err(ClinicError::NotFound(format!("Doctor {} not found.", doctor_id)));
  }
  Ok(PipelineControl::Continue)
}

async fn check_slot(ctx_data: ContextData<BookingCtxData>, slots: SlotChecker) -> ClinicResult<PipelineControl> {
  let slot = validated_slot(&ctx_data)?;
  if slots.is_slot_taken(&slot).await? {
    info!(slot = %slot, "Slot already booked.");
    return Err(ClinicError::SlotTaken(slot));
  }
  Ok(PipelineControl::Continue)
}

async fn insert_appointment(
  ctx_data: ContextData<BookingCtxData>,
  store: Arc<dyn AppointmentStore>,
) -> ClinicResult<PipelineControl> {
  let new_appointment = {
    let guard = ctx_data.read();
    let patient_id = guard
      .patient_id
      .ok_or_else(|| ClinicError::from(anyhow!("patient id missing after authorize step")))?;
    let slot = guard
      .slot
      .clone()
      .ok_or_else(|| ClinicError::from(anyhow!("slot missing after validate step")))?;
    NewAppointment::new(patient_id, slot, guard.request.notes.clone())
  };

  // The store re-checks the slot on insert; a concurrent booking that slipped
  // past check_slot surfaces here as SlotTaken.
  let appointment = store.insert_pending(&new_appointment).await?;
  info!(appointment_id = appointment.id, patient_id = appointment.patient_id, "Appointment booked.");
  ctx_data.write().appointment = Some(appointment);
  Ok(PipelineControl::Continue)
}

fn validated_slot(ctx_data: &ContextData<BookingCtxData>) -> ClinicResult<Slot> {
  ctx_data
    .read()
    .slot
    .clone()
    .ok_or_else(|| ClinicError::from(anyhow!("slot missing after validate step")))
}

// --- cancel ---

fn cancel_pipeline(store: Arc<dyn AppointmentStore>) -> Pipeline<CancelCtxData, ClinicError> {
  let mut p = Pipeline::new("cancel_appointment", &[("authorize", false), ("cancel_owned", false)]);
  p.on_root("authorize", authorize_cancel);
  p.on_root("cancel_owned", move |ctx| cancel_owned(ctx, store.clone()));
  p
}

async fn authorize_cancel(ctx_data: ContextData<CancelCtxData>) -> ClinicResult<PipelineControl> {
  let patient_id = {
    let guard = ctx_data.read();
    AccessGate::require(&guard.caller, Capability::Authenticated)?.user_id
  };
  ctx_data.write().patient_id = Some(patient_id);
  Ok(PipelineControl::Continue)
}

async fn cancel_owned(
  ctx_data: ContextData<CancelCtxData>,
  store: Arc<dyn AppointmentStore>,
) -> ClinicResult<PipelineControl> {
  let (appointment_id, patient_id) = {
    let guard = ctx_data.read();
    let patient_id = guard
      .patient_id
      .ok_or_else(|| ClinicError::from(anyhow!("patient id missing after authorize step")))?;
    (guard.appointment_id, patient_id)
  };

  let cancelled = store.cancel_owned(appointment_id, patient_id).await?;
  if cancelled {
    info!(appointment_id, patient_id, "Appointment cancelled by patient.");
  } else {
    warn!(appointment_id, patient_id, "Cancel matched no appointment owned by the caller.");
  }
  ctx_data.write().cancelled = cancelled;
  Ok(PipelineControl::Continue)
}

// --- update_status ---

fn status_pipeline(store: Arc<dyn AppointmentStore>) -> Pipeline<StatusCtxData, ClinicError> {
  let mut p = Pipeline::new(
    "update_appointment_status",
    &[("authorize_admin", false), ("parse_status", false), ("apply_status", false)],
  );
  p.on_root("authorize_admin", authorize_admin);
  p.on_root("parse_status", parse_status);
  p.on_root("apply_status", move |ctx| apply_status(ctx, store.clone()));
  p
}

async fn authorize_admin(ctx_data: ContextData<StatusCtxData>) -> ClinicResult<PipelineControl> {
  let guard = ctx_data.read();
  AccessGate::require(&guard.caller, Capability::Admin)?;
  Ok(PipelineControl::Continue)
}

async fn parse_status(ctx_data: ContextData<StatusCtxData>) -> ClinicResult<PipelineControl> {
  let status: AppointmentStatus = {
    let guard = ctx_data.read();
    guard.requested_status.parse()?
  };
  ctx_data.write().status = Some(status);
  Ok(PipelineControl::Continue)
}

async fn apply_status(
  ctx_data: ContextData<StatusCtxData>,
  store: Arc<dyn AppointmentStore>,
) -> ClinicResult<PipelineControl> {
  let (appointment_id, status) = {
    let guard = ctx_data.read();
    let status = guard
      .status
      .ok_or_else(|| ClinicError::from(anyhow!("status missing after parse step")))?;
    (guard.appointment_id, status)
  };

  let updated = store.set_status(appointment_id, status).await?;
  if updated {
    info!(appointment_id, status = %status, "Appointment status updated.");
  } else {
    debug!(appointment_id, "Status update matched no appointment.");
  }
  ctx_data.write().updated = updated;
  Ok(PipelineControl::Continue)
}

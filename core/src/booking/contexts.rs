// core/src/booking/contexts.rs

//! Context data for the lifecycle pipelines.

use crate::access::Caller;
use crate::appointment::{Appointment, AppointmentStatus, Slot};

/// Raw booking input as submitted by a patient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
  pub doctor_id: i64,
  pub date: String,
  pub time: String,
  pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BookingCtxData {
  pub caller: Caller,
  pub request: BookingRequest,
  pub patient_id: Option<i64>,
  pub slot: Option<Slot>,
  pub appointment: Option<Appointment>,
}

impl BookingCtxData {
  pub fn new(caller: Caller, request: BookingRequest) -> Self {
    Self {
      caller,
      request,
      patient_id: None,
      slot: None,
      appointment: None,
    }
  }
}

#[derive(Debug, Clone)]
pub struct CancelCtxData {
  pub caller: Caller,
  pub appointment_id: i64,
  pub patient_id: Option<i64>,
  pub cancelled: bool,
}

impl CancelCtxData {
  pub fn new(caller: Caller, appointment_id: i64) -> Self {
    Self {
      caller,
      appointment_id,
      patient_id: None,
      cancelled: false,
    }
  }
}

#[derive(Debug, Clone)]
pub struct StatusCtxData {
  pub caller: Caller,
  pub appointment_id: i64,
  pub requested_status: String,
  pub status: Option<AppointmentStatus>,
  pub updated: bool,
}

impl StatusCtxData {
  pub fn new(caller: Caller, appointment_id: i64, requested_status: impl Into<String>) -> Self {
    Self {
      caller,
      appointment_id,
      requested_status: requested_status.into(),
      status: None,
      updated: false,
    }
  }
}

// src/lib.rs

//! Clinic core: the appointment-booking domain behind the clinic web app.
//!
//! This crate holds everything that does not depend on HTTP or on a concrete
//! database:
//!  - The access gate that decides what a caller may do.
//!  - Appointment records, statuses and the `(doctor, date, time)` slot.
//!  - The `AppointmentStore` seam implemented by the app's SQL layer.
//!  - A small async step pipeline used to run booking, cancellation and
//!    status updates as ordered, individually traced steps.

pub mod access;
pub mod appointment;
pub mod booking;
pub mod error;
pub mod pipeline;
pub mod store;

// --- Re-exports for the Public API ---

pub use crate::access::{AccessGate, Caller, Capability, Identity};
pub use crate::appointment::{Appointment, AppointmentStatus, NewAppointment, Slot};
pub use crate::booking::{AppointmentLifecycle, BookingRequest, SlotChecker};
pub use crate::error::{ClinicError, ClinicResult};
pub use crate::pipeline::{ContextData, Pipeline, PipelineControl, PipelineResult};
pub use crate::store::AppointmentStore;

// core/src/booking/mod.rs

//! Slot availability and the appointment lifecycle (book, cancel, status).

pub mod contexts;
pub mod lifecycle;
pub mod slot_checker;

pub use contexts::{BookingCtxData, BookingRequest, CancelCtxData, StatusCtxData};
pub use lifecycle::AppointmentLifecycle;
pub use slot_checker::SlotChecker;

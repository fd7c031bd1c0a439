// app/src/models/mod.rs

//! Rows and views read from the SQLite database.

pub mod appointment;
pub mod doctor;
pub mod schedule;
pub mod user;

pub use appointment::{AdminAppointment, AppointmentRow, DashboardCounts, PatientAppointment};
pub use doctor::{Doctor, DoctorFilter, NewDoctor};
pub use schedule::Schedule;
pub use user::{NewUser, User};

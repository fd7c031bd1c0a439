// app/src/web/handlers/mod.rs

pub mod admin_handlers;
pub mod auth_handlers;
pub mod doctor_handlers;
pub mod patient_handlers;

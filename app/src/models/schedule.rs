// app/src/models/schedule.rs

use serde::Serialize;
use sqlx::FromRow;

/// A recurring weekly availability window. Shown on the booking form only;
/// bookings are not checked against it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Schedule {
  pub id: i64,
  pub doctor_id: i64,
  pub day_of_week: String,
  pub start_time: String,
  pub end_time: String,
}

pub const WORKDAYS: [&str; 5] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

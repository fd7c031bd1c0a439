// app/src/web/handlers/doctor_handlers.rs

use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use clinic_core::{AccessGate, BookingRequest, Capability, ClinicError};
use serde::Deserialize;
use tera::Context;
use tracing::{info, instrument};

use crate::db::doctors;
use crate::errors::{AppError, Result as AppResult};
use crate::models::DoctorFilter;
use crate::state::AppState;
use crate::web::flash::{self, Flash};
use crate::web::render::render;
use crate::web::session::SessionCaller;

#[derive(Deserialize, Debug, Default)]
pub struct DoctorQuery {
  pub search: Option<String>,
  pub specialty: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct BookForm {
  pub date: String,
  pub time: String,
  pub notes: String,
}

pub async fn list_doctors(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  session: SessionCaller,
  query: web::Query<DoctorQuery>,
) -> AppResult<HttpResponse> {
  AccessGate::require(&session.caller, Capability::Authenticated)?;
  let query = query.into_inner();
  let filter = DoctorFilter::new(query.search, query.specialty);

  let doctors = doctors::list_available(&app_state.db_pool, &filter).await?;
  let specialties = doctors::specialties(&app_state.db_pool).await?;

  let mut context = Context::new();
  context.insert("doctors", &doctors);
  context.insert("specialties", &specialties);
  context.insert("search", &filter.search.unwrap_or_default());
  context.insert("specialty", &filter.specialty.unwrap_or_default());
  render(&app_state, &req, &session.caller, "doctors.html", context)
}

pub async fn book_form(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  session: SessionCaller,
  path: web::Path<i64>,
) -> AppResult<HttpResponse> {
  AccessGate::require(&session.caller, Capability::Authenticated)?;
  let doctor_id = path.into_inner();
  let doctor = doctors::get(&app_state.db_pool, doctor_id)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Doctor {}", doctor_id)))?;
  let schedules = doctors::schedules(&app_state.db_pool, doctor_id).await?;

  let mut context = Context::new();
  context.insert("doctor", &doctor);
  context.insert("schedules", &schedules);
  context.insert("today", &Utc::now().date_naive().format("%Y-%m-%d").to_string());
  render(&app_state, &req, &session.caller, "book_appointment.html", context)
}

#[instrument(name = "handler::book_appointment", skip(app_state, session, form))]
pub async fn book_submit(
  app_state: web::Data<AppState>,
  session: SessionCaller,
  path: web::Path<i64>,
  form: web::Form<BookForm>,
) -> AppResult<HttpResponse> {
  let doctor_id = path.into_inner();
  let form = form.into_inner();
  let request = BookingRequest {
    doctor_id,
    date: form.date,
    time: form.time,
    notes: Some(form.notes),
  };

  let back_to_form = format!("/book/{}", doctor_id);
  match app_state.lifecycle.book(&session.caller, request).await {
    Ok(appointment) => {
      info!(appointment_id = appointment.id, "Appointment booked.");
      Ok(flash::redirect("/patient/dashboard", Flash::AppointmentBooked))
    }
    Err(ClinicError::SlotTaken(_)) => Ok(flash::redirect(&back_to_form, Flash::SlotTaken)),
    Err(ClinicError::Validation(_)) => Ok(flash::redirect(&back_to_form, Flash::InvalidSlot)),
    Err(e) => Err(e.into()),
  }
}

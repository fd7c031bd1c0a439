// app/src/web/handlers/admin_handlers.rs

use actix_web::{web, HttpRequest, HttpResponse};
use clinic_core::{AccessGate, AppointmentStatus, Capability, ClinicError};
use serde::Deserialize;
use tera::Context;
use tracing::{info, instrument};

use crate::db::{appointments, doctors};
use crate::errors::Result as AppResult;
use crate::models::NewDoctor;
use crate::state::AppState;
use crate::web::flash::{self, Flash};
use crate::web::render::render;
use crate::web::session::SessionCaller;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default)]
pub struct DoctorForm {
  pub name: String,
  pub specialization: String,
  pub qualifications: String,
  pub experience: String,
  pub email: String,
  pub phone: String,
}

impl DoctorForm {
  /// Name and specialization are required; experience, when given, must be a
  /// non-negative whole number of years.
  pub fn validate(&self) -> Result<NewDoctor, String> {
    let optional = |value: &str| Some(value.trim().to_string()).filter(|v| !v.is_empty());

    let name = self.name.trim();
    let specialization = self.specialization.trim();
    if name.is_empty() || specialization.is_empty() {
      return Err("Name and specialization are required".to_string());
    }
    let experience = match optional(&self.experience) {
      None => None,
      Some(raw) => match raw.parse::<i64>() {
        Ok(years) if years >= 0 => Some(years),
        _ => return Err("Experience must be a whole number of years".to_string()),
      },
    };

    Ok(NewDoctor {
      name: name.to_string(),
      specialization: specialization.to_string(),
      qualifications: optional(&self.qualifications),
      experience,
      email: optional(&self.email),
      phone: optional(&self.phone),
    })
  }
}

pub async fn admin_dashboard(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  session: SessionCaller,
) -> AppResult<HttpResponse> {
  AccessGate::require(&session.caller, Capability::Admin)?;
  let appointments = appointments::all_for_admin(&app_state.db_pool).await?;
  let counts = appointments::dashboard_counts(&app_state.db_pool).await?;

  let mut context = Context::new();
  context.insert("appointments", &appointments);
  context.insert("counts", &counts);
  context.insert("statuses", &AppointmentStatus::ALL.map(|s| s.as_str()));
  render(&app_state, &req, &session.caller, "admin_dashboard.html", context)
}

#[instrument(name = "handler::update_appointment_status", skip(app_state, session))]
pub async fn update_appointment_status(
  app_state: web::Data<AppState>,
  session: SessionCaller,
  path: web::Path<(i64, String)>,
) -> AppResult<HttpResponse> {
  let (appointment_id, status) = path.into_inner();

  let flash = match app_state
    .lifecycle
    .update_status(&session.caller, appointment_id, &status)
    .await
  {
    Ok(Some(applied)) => Flash::StatusUpdated(applied),
    Ok(None) => Flash::AppointmentNotFound,
    Err(ClinicError::InvalidStatus(_)) => Flash::InvalidStatus,
    Err(ClinicError::SlotTaken(_)) => Flash::StatusConflict,
    Err(e) => return Err(e.into()),
  };
  Ok(flash::redirect("/admin/dashboard", flash))
}

pub async fn manage_doctors(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  session: SessionCaller,
) -> AppResult<HttpResponse> {
  AccessGate::require(&session.caller, Capability::Admin)?;
  let doctors = doctors::list_all(&app_state.db_pool).await?;

  let mut context = Context::new();
  context.insert("doctors", &doctors);
  render(&app_state, &req, &session.caller, "manage_doctors.html", context)
}

pub async fn add_doctor_form(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  session: SessionCaller,
) -> AppResult<HttpResponse> {
  AccessGate::require(&session.caller, Capability::Admin)?;
  let mut context = Context::new();
  context.insert("form", &DoctorFormView::default());
  render(&app_state, &req, &session.caller, "add_doctor.html", context)
}

#[instrument(name = "handler::add_doctor", skip(app_state, req, session, form), fields(name = %form.name))]
pub async fn add_doctor_submit(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  session: SessionCaller,
  form: web::Form<DoctorForm>,
) -> AppResult<HttpResponse> {
  AccessGate::require(&session.caller, Capability::Admin)?;
  let form = form.into_inner();

  match form.validate() {
    Ok(new_doctor) => {
      let doctor_id = doctors::insert(&app_state.db_pool, &new_doctor).await?;
      info!(doctor_id, "Doctor added.");
      Ok(flash::redirect("/admin/doctors", Flash::DoctorAdded))
    }
    Err(message) => {
      let mut context = Context::new();
      context.insert("form_error", &message);
      context.insert("form", &DoctorFormView::from(&form));
      render(&app_state, &req, &session.caller, "add_doctor.html", context)
    }
  }
}

#[instrument(name = "handler::toggle_doctor", skip(app_state, session))]
pub async fn toggle_doctor_availability(
  app_state: web::Data<AppState>,
  session: SessionCaller,
  path: web::Path<i64>,
) -> AppResult<HttpResponse> {
  AccessGate::require(&session.caller, Capability::Admin)?;
  let flash = match doctors::toggle_availability(&app_state.db_pool, path.into_inner()).await? {
    Some(available) => {
      info!(available, "Doctor availability toggled.");
      Flash::DoctorToggled
    }
    None => Flash::DoctorNotFound,
  };
  Ok(flash::redirect("/admin/doctors", flash))
}

/// Submitted values echoed back into the form after a validation error.
#[derive(serde::Serialize, Default)]
struct DoctorFormView<'a> {
  name: &'a str,
  specialization: &'a str,
  qualifications: &'a str,
  experience: &'a str,
  email: &'a str,
  phone: &'a str,
}

impl<'a> From<&'a DoctorForm> for DoctorFormView<'a> {
  fn from(form: &'a DoctorForm) -> Self {
    Self {
      name: &form.name,
      specialization: &form.specialization,
      qualifications: &form.qualifications,
      experience: &form.experience,
      email: &form.email,
      phone: &form.phone,
    }
  }
}

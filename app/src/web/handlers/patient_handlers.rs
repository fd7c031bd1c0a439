// app/src/web/handlers/patient_handlers.rs

use actix_web::{web, HttpRequest, HttpResponse};
use clinic_core::{AccessGate, Capability};
use tera::Context;
use tracing::instrument;

use crate::db::appointments;
use crate::errors::Result as AppResult;
use crate::state::AppState;
use crate::web::flash::{self, Flash};
use crate::web::render::render;
use crate::web::session::SessionCaller;

pub async fn patient_dashboard(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  session: SessionCaller,
) -> AppResult<HttpResponse> {
  let identity = AccessGate::require(&session.caller, Capability::Authenticated)?;
  let appointments = appointments::for_patient(&app_state.db_pool, identity.user_id).await?;

  let mut context = Context::new();
  context.insert("appointments", &appointments);
  render(&app_state, &req, &session.caller, "patient_dashboard.html", context)
}

#[instrument(name = "handler::cancel_appointment", skip(app_state, session))]
pub async fn cancel_appointment(
  app_state: web::Data<AppState>,
  session: SessionCaller,
  path: web::Path<i64>,
) -> AppResult<HttpResponse> {
  let appointment_id = path.into_inner();
  let cancelled = app_state.lifecycle.cancel(&session.caller, appointment_id).await?;

  let flash = if cancelled {
    Flash::AppointmentCancelled
  } else {
    Flash::AppointmentNotFound
  };
  Ok(flash::redirect("/patient/dashboard", flash))
}

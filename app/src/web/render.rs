// app/src/web/render.rs

//! HTML rendering with templates compiled into the binary.

use crate::errors::Result as AppResult;
use crate::state::AppState;
use crate::web::flash;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse};
use clinic_core::Caller;
use serde::Serialize;
use tera::{Context, Tera};

const TEMPLATES: [(&str, &str); 10] = [
  ("base.html", include_str!("../../templates/base.html")),
  ("index.html", include_str!("../../templates/index.html")),
  ("register.html", include_str!("../../templates/register.html")),
  ("login.html", include_str!("../../templates/login.html")),
  ("patient_dashboard.html", include_str!("../../templates/patient_dashboard.html")),
  ("doctors.html", include_str!("../../templates/doctors.html")),
  ("book_appointment.html", include_str!("../../templates/book_appointment.html")),
  ("admin_dashboard.html", include_str!("../../templates/admin_dashboard.html")),
  ("manage_doctors.html", include_str!("../../templates/manage_doctors.html")),
  ("add_doctor.html", include_str!("../../templates/add_doctor.html")),
];

pub fn load_templates() -> Result<Tera, tera::Error> {
  let mut tera = Tera::default();
  tera.add_raw_templates(TEMPLATES)?;
  tera.autoescape_on(vec![".html"]);
  Ok(tera)
}

#[derive(Debug, Serialize)]
struct CurrentUser<'a> {
  logged_in: bool,
  is_admin: bool,
  name: &'a str,
}

/// Renders `template` for `caller`. The pending flash is shown once and its
/// cookie cleared.
pub fn render(
  state: &AppState,
  req: &HttpRequest,
  caller: &Caller,
  template: &str,
  context: Context,
) -> AppResult<HttpResponse> {
  render_with_status(state, req, caller, template, context, StatusCode::OK)
}

pub fn render_with_status(
  state: &AppState,
  req: &HttpRequest,
  caller: &Caller,
  template: &str,
  mut context: Context,
  status: StatusCode,
) -> AppResult<HttpResponse> {
  context.insert(
    "current_user",
    &CurrentUser {
      logged_in: caller.is_authenticated(),
      is_admin: caller.is_admin(),
      name: caller.identity().map(|i| i.name.as_str()).unwrap_or(""),
    },
  );

  let pending = flash::pending(req);
  context.insert("flash", &pending.map(|f| f.view()));

  let html = state.templates.render(template, &context)?;
  let mut response = HttpResponse::build(status);
  response.content_type("text/html; charset=utf-8");
  if req.cookie(flash::FLASH_COOKIE).is_some() {
    response.cookie(flash::removal_cookie());
  }
  Ok(response.body(html))
}

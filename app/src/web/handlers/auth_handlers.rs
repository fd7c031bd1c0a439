// app/src/web/handlers/auth_handlers.rs

use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use clinic_core::{ContextData, PipelineResult};
use serde::Deserialize;
use tera::Context;
use tracing::{info, instrument, warn};

use crate::db::sessions;
use crate::errors::{AppError, Result as AppResult};
use crate::pipelines::signin_pipeline::INVALID_CREDENTIALS;
use crate::pipelines::{SigninCtxData, SignupCtxData};
use crate::state::AppState;
use crate::web::flash::{self, Flash};
use crate::web::render::render;
use crate::web::session::{session_cookie, session_removal_cookie, SessionCaller};

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct RegisterForm {
  pub name: String,
  pub email: String,
  pub password: String,
  pub phone: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct LoginForm {
  pub email: String,
  pub password: String,
}

pub async fn index(app_state: web::Data<AppState>, req: HttpRequest, session: SessionCaller) -> AppResult<HttpResponse> {
  render(&app_state, &req, &session.caller, "index.html", Context::new())
}

pub async fn register_form(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  session: SessionCaller,
) -> AppResult<HttpResponse> {
  render(&app_state, &req, &session.caller, "register.html", Context::new())
}

#[instrument(name = "handler::register", skip(app_state, req, session, form), fields(email = %form.email))]
pub async fn register_submit(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  session: SessionCaller,
  form: web::Form<RegisterForm>,
) -> AppResult<HttpResponse> {
  let form = form.into_inner();
  let ctx_data = ContextData::new(SignupCtxData::new(
    app_state.db_pool.clone(),
    &form.name,
    &form.email,
    &form.password,
    Some(&form.phone),
  ));

  match app_state.auth_pipelines.signup.run(ctx_data.clone()).await {
    Ok(PipelineResult::Completed) => {
      info!(user_id = ?ctx_data.read().created_user_id, "Registration complete.");
      Ok(flash::redirect("/login", Flash::RegistrationSuccessful))
    }
    Ok(PipelineResult::Stopped) => Err(AppError::Internal("Registration was halted by an internal step".to_string())),
    Err(AppError::EmailTaken) => Ok(flash::redirect("/register", Flash::EmailTaken)),
    Err(AppError::Validation(message)) => {
      let mut context = Context::new();
      context.insert("form_error", &message);
      context.insert("name", &form.name);
      context.insert("email", &form.email);
      context.insert("phone", &form.phone);
      render(&app_state, &req, &session.caller, "register.html", context)
    }
    Err(e) => Err(e),
  }
}

pub async fn login_form(app_state: web::Data<AppState>, req: HttpRequest, session: SessionCaller) -> AppResult<HttpResponse> {
  render(&app_state, &req, &session.caller, "login.html", Context::new())
}

#[instrument(name = "handler::login", skip(app_state, req, session, form), fields(email = %form.email))]
pub async fn login_submit(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  session: SessionCaller,
  form: web::Form<LoginForm>,
) -> AppResult<HttpResponse> {
  let ctx_data = ContextData::new(SigninCtxData::new(
    app_state.db_pool.clone(),
    app_state.config.session_ttl_hours,
    &form.email,
    &form.password,
  ));

  let message = match app_state.auth_pipelines.signin.run(ctx_data.clone()).await {
    Ok(PipelineResult::Completed) => {
      let (token, is_admin, user_id) = {
        let guard = ctx_data.read();
        (guard.session_token.clone(), guard.is_admin, guard.user_id)
      };
      let token = token.ok_or_else(|| AppError::Internal("Signin completed without a session token".to_string()))?;
      info!(?user_id, is_admin, "Login successful.");

      let location = if is_admin { "/admin/dashboard" } else { "/patient/dashboard" };
      return Ok(
        HttpResponse::SeeOther()
          .insert_header((header::LOCATION, location))
          .cookie(session_cookie(token, &app_state.config))
          .finish(),
      );
    }
    Ok(PipelineResult::Stopped) => return Err(AppError::Internal("Signin was halted by an internal step".to_string())),
    Err(AppError::Auth(_)) => INVALID_CREDENTIALS.to_string(),
    Err(AppError::Validation(message)) => message,
    Err(e) => return Err(e),
  };

  warn!("Login failed.");
  let mut context = Context::new();
  context.insert("form_error", &message);
  context.insert("email", &form.email);
  render(&app_state, &req, &session.caller, "login.html", context)
}

#[instrument(name = "handler::logout", skip_all)]
pub async fn logout(app_state: web::Data<AppState>, session: SessionCaller) -> AppResult<HttpResponse> {
  if let Some(token) = &session.token {
    sessions::delete(&app_state.db_pool, token).await?;
  }
  Ok(
    HttpResponse::SeeOther()
      .insert_header((header::LOCATION, "/"))
      .cookie(session_removal_cookie())
      .cookie(flash::cookie(&Flash::LoggedOut))
      .finish(),
  )
}

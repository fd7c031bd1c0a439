// app/src/errors.rs

use actix_web::http::{header, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use clinic_core::ClinicError;
use thiserror::Error;

use crate::web::flash::{self, Flash};

#[derive(Debug, Error)]
pub enum AppError {
  #[error(transparent)]
  Clinic(#[from] ClinicError),

  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Email already registered")]
  EmailTaken,

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Migration Error: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),

  #[error("Template Error: {0}")]
  Template(#[from] tera::Error),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<sqlx::Error>() {
      Ok(sqlx_err) => AppError::Sqlx(sqlx_err),
      Err(err) => AppError::Internal(err.to_string()),
    }
  }
}

impl AppError {
  /// The flash to carry across the redirect, for errors answered with one.
  fn redirect(&self) -> Option<(&'static str, Flash)> {
    match self {
      AppError::Clinic(ClinicError::LoginRequired) => Some(("/login", Flash::LoginRequired)),
      AppError::Clinic(ClinicError::AdminRequired) => Some(("/", Flash::AdminRequired)),
      _ => None,
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Clinic(ClinicError::LoginRequired) | AppError::Clinic(ClinicError::AdminRequired) => {
        StatusCode::SEE_OTHER
      }
      AppError::Clinic(ClinicError::NotFound(_)) | AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Clinic(ClinicError::Validation(_))
      | AppError::Clinic(ClinicError::InvalidStatus(_))
      | AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::Clinic(ClinicError::SlotTaken(_)) | AppError::EmailTaken => StatusCode::CONFLICT,
      AppError::Auth(_) => StatusCode::UNAUTHORIZED,
      _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    if let Some((location, flash)) = self.redirect() {
      tracing::warn!(application_error = %self, %location, "Access denied, redirecting.");
      return HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .cookie(flash::cookie(&flash))
        .finish();
    }

    let status = self.status_code();
    let detail = if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
      "Something went wrong on our side. Please try again later.".to_string()
    } else {
      tracing::warn!(application_error = %self, "Responding with error");
      self.to_string()
    };

    HttpResponse::build(status)
      .content_type("text/html; charset=utf-8")
      .body(error_page(status, &detail))
  }
}

fn error_page(status: StatusCode, detail: &str) -> String {
  format!(
    "<!DOCTYPE html><html><head><title>{code}</title></head><body><h1>{code} {reason}</h1><p>{detail}</p><p><a href=\"/\">Back to home</a></p></body></html>",
    code = status.as_u16(),
    reason = status.canonical_reason().unwrap_or("Error"),
    detail = tera::escape_html(detail),
  )
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;

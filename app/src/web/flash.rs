// app/src/web/flash.rs

//! One-shot messages carried across a redirect.
//!
//! The cookie only ever holds a fixed code, never free text, so nothing a
//! client sends back can end up rendered as a message.

use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse};
use clinic_core::AppointmentStatus;
use serde::Serialize;

pub const FLASH_COOKIE: &str = "clinic_flash";

const STATUS_UPDATED_PREFIX: &str = "status_updated-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
  LoginRequired,
  AdminRequired,
  RegistrationSuccessful,
  EmailTaken,
  LoggedOut,
  AppointmentBooked,
  SlotTaken,
  InvalidSlot,
  AppointmentCancelled,
  AppointmentNotFound,
  StatusUpdated(AppointmentStatus),
  InvalidStatus,
  StatusConflict,
  DoctorAdded,
  DoctorToggled,
  DoctorNotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
  Success,
  Error,
}

/// What templates see.
#[derive(Debug, Clone, Serialize)]
pub struct FlashView {
  pub kind: FlashKind,
  pub message: String,
}

impl Flash {
  const SIMPLE: [(Flash, &'static str); 15] = [
    (Flash::LoginRequired, "login_required"),
    (Flash::AdminRequired, "admin_required"),
    (Flash::RegistrationSuccessful, "registered"),
    (Flash::EmailTaken, "email_taken"),
    (Flash::LoggedOut, "logged_out"),
    (Flash::AppointmentBooked, "booked"),
    (Flash::SlotTaken, "slot_taken"),
    (Flash::InvalidSlot, "invalid_slot"),
    (Flash::AppointmentCancelled, "cancelled"),
    (Flash::AppointmentNotFound, "appointment_not_found"),
    (Flash::InvalidStatus, "invalid_status"),
    (Flash::StatusConflict, "status_conflict"),
    (Flash::DoctorAdded, "doctor_added"),
    (Flash::DoctorToggled, "doctor_toggled"),
    (Flash::DoctorNotFound, "doctor_not_found"),
  ];

  pub fn code(&self) -> String {
    if let Flash::StatusUpdated(status) = self {
      return format!("{}{}", STATUS_UPDATED_PREFIX, status);
    }
    Self::SIMPLE
      .iter()
      .find(|(flash, _)| flash == self)
      .map(|(_, code)| code.to_string())
      .unwrap_or_default()
  }

  pub fn from_code(code: &str) -> Option<Self> {
    if let Some(status) = code.strip_prefix(STATUS_UPDATED_PREFIX) {
      return status.parse().ok().map(Flash::StatusUpdated);
    }
    Self::SIMPLE.iter().find(|(_, c)| *c == code).map(|(flash, _)| *flash)
  }

  pub fn kind(&self) -> FlashKind {
    match self {
      Flash::RegistrationSuccessful
      | Flash::LoggedOut
      | Flash::AppointmentBooked
      | Flash::AppointmentCancelled
      | Flash::StatusUpdated(_)
      | Flash::DoctorAdded
      | Flash::DoctorToggled => FlashKind::Success,
      _ => FlashKind::Error,
    }
  }

  pub fn message(&self) -> String {
    match self {
      Flash::LoginRequired => "Please login to access this page".into(),
      Flash::AdminRequired => "Admin access required".into(),
      Flash::RegistrationSuccessful => "Registration successful! Please login.".into(),
      Flash::EmailTaken => "Email already registered".into(),
      Flash::LoggedOut => "Logged out successfully".into(),
      Flash::AppointmentBooked => "Appointment booked successfully!".into(),
      Flash::SlotTaken => "This time slot is already booked".into(),
      Flash::InvalidSlot => "Please choose a valid date (YYYY-MM-DD) and time (HH:MM)".into(),
      Flash::AppointmentCancelled => "Appointment cancelled successfully".into(),
      Flash::AppointmentNotFound => "Appointment not found".into(),
      Flash::StatusUpdated(status) => format!("Appointment {} successfully", status),
      Flash::InvalidStatus => "Unknown appointment status".into(),
      Flash::StatusConflict => "That time slot has since been booked by another patient".into(),
      Flash::DoctorAdded => "Doctor added successfully".into(),
      Flash::DoctorToggled => "Doctor availability updated".into(),
      Flash::DoctorNotFound => "Doctor not found".into(),
    }
  }

  pub fn view(&self) -> FlashView {
    FlashView {
      kind: self.kind(),
      message: self.message(),
    }
  }
}

pub fn cookie(flash: &Flash) -> Cookie<'static> {
  Cookie::build(FLASH_COOKIE, flash.code())
    .path("/")
    .http_only(true)
    .same_site(SameSite::Lax)
    .finish()
}

pub fn removal_cookie() -> Cookie<'static> {
  let mut cookie = Cookie::build(FLASH_COOKIE, "").path("/").finish();
  cookie.make_removal();
  cookie
}

/// The pending flash of this request, if its cookie holds a known code.
pub fn pending(req: &HttpRequest) -> Option<Flash> {
  req.cookie(FLASH_COOKIE).and_then(|c| Flash::from_code(c.value()))
}

/// `303 See Other` to `location`, carrying `flash`.
pub fn redirect(location: &str, flash: Flash) -> HttpResponse {
  HttpResponse::SeeOther()
    .insert_header((header::LOCATION, location))
    .cookie(cookie(&flash))
    .finish()
}

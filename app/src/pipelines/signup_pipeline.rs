// app/src/pipelines/signup_pipeline.rs

use crate::db::users;
use crate::errors::{AppError, Result as AppResult};
use crate::models::NewUser;
use crate::pipelines::contexts::SignupCtxData;
use crate::services::auth_service;
use clinic_core::{ContextData, Pipeline, PipelineControl};
use tracing::{event, info, warn, Level};

pub fn build_signup_pipeline() -> Pipeline<SignupCtxData, AppError> {
  let mut signup_p = Pipeline::new(
    "signup",
    &[
      ("validate_signup_input", false),
      ("check_existing_user", false),
      ("create_user", false),
    ],
  );

  signup_p.on_root("validate_signup_input", validate_signup_input);
  signup_p.on_root("check_existing_user", check_existing_user);
  signup_p.on_root("create_user", create_user);
  signup_p
}

/// Trims the text fields in place and rejects blank names, emails without an
/// `@` and empty passwords.
async fn validate_signup_input(ctx_data: ContextData<SignupCtxData>) -> AppResult<PipelineControl> {
  let mut guard = ctx_data.write();
  guard.name = guard.name.trim().to_string();
  guard.email = guard.email.trim().to_string();
  guard.phone = guard
    .phone
    .take()
    .map(|p| p.trim().to_string())
    .filter(|p| !p.is_empty());

  event!(Level::DEBUG, email = %guard.email, "Validating signup input.");
  if guard.name.is_empty() {
    return Err(AppError::Validation("Name is required".to_string()));
  }
  if !guard.email.contains('@') {
    warn!("Invalid email format provided for signup.");
    return Err(AppError::Validation("A valid email address is required".to_string()));
  }
  if guard.password.is_empty() {
    return Err(AppError::Validation("Password is required".to_string()));
  }
  Ok(PipelineControl::Continue)
}

async fn check_existing_user(ctx_data: ContextData<SignupCtxData>) -> AppResult<PipelineControl> {
  let (email, db_pool) = {
    let guard = ctx_data.read();
    (guard.email.clone(), guard.db_pool.clone())
  };

  if users::email_exists(&db_pool, &email).await? {
    warn!(%email, "Signup attempted with an existing email.");
    return Err(AppError::EmailTaken);
  }
  Ok(PipelineControl::Continue)
}

/// Hashes the password and inserts the patient. The unique email column
/// still guards against a concurrent signup with the same address.
async fn create_user(ctx_data: ContextData<SignupCtxData>) -> AppResult<PipelineControl> {
  let (new_user, db_pool) = {
    let guard = ctx_data.read();
    let new_user = NewUser {
      name: guard.name.clone(),
      email: guard.email.clone(),
      password_hash: auth_service::hash_password(&guard.password)?,
      phone: guard.phone.clone(),
      is_admin: false,
    };
    (new_user, guard.db_pool.clone())
  };

  let user = users::insert(&db_pool, &new_user).await?;
  ctx_data.write().created_user_id = Some(user.id);
  info!(user_id = user.id, email = %user.email, "Patient registered.");
  Ok(PipelineControl::Continue)
}

// app/src/pipelines/signin_pipeline.rs

use crate::db::{sessions, users};
use crate::errors::{AppError, Result as AppResult};
use crate::pipelines::contexts::SigninCtxData;
use crate::services::auth_service;
use clinic_core::{ContextData, Pipeline, PipelineControl};
use tracing::{event, warn, Level};

pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub fn build_signin_pipeline() -> Pipeline<SigninCtxData, AppError> {
  let mut signin_p = Pipeline::new(
    "signin",
    &[
      ("validate_signin_input", false),
      ("fetch_user", false),
      ("verify_password", false),
      ("open_session", false),
    ],
  );

  signin_p.on_root("validate_signin_input", validate_signin_input);
  signin_p.on_root("fetch_user", fetch_user);
  signin_p.on_root("verify_password", verify_password);
  signin_p.on_root("open_session", open_session);
  signin_p
}

async fn validate_signin_input(ctx_data: ContextData<SigninCtxData>) -> AppResult<PipelineControl> {
  let mut guard = ctx_data.write();
  guard.email = guard.email.trim().to_string();
  if guard.email.is_empty() || guard.password.is_empty() {
    return Err(AppError::Validation("Email and password are required".to_string()));
  }
  Ok(PipelineControl::Continue)
}

async fn fetch_user(ctx_data: ContextData<SigninCtxData>) -> AppResult<PipelineControl> {
  let (email, db_pool) = {
    let guard = ctx_data.read();
    (guard.email.clone(), guard.db_pool.clone())
  };

  event!(Level::DEBUG, %email, "Fetching user for signin.");
  match users::find_by_email(&db_pool, &email).await? {
    Some(user) => {
      let mut guard = ctx_data.write();
      guard.user_id = Some(user.id);
      guard.is_admin = user.is_admin;
      guard.temp_password_hash = Some(user.password);
      Ok(PipelineControl::Continue)
    }
    None => {
      warn!(%email, "Signin for unknown email.");
      Err(AppError::Auth(INVALID_CREDENTIALS.to_string()))
    }
  }
}

async fn verify_password(ctx_data: ContextData<SigninCtxData>) -> AppResult<PipelineControl> {
  let (stored_hash, password, user_id) = {
    let mut guard = ctx_data.write();
    (guard.temp_password_hash.take(), guard.password.clone(), guard.user_id)
  };
  let stored_hash = stored_hash.ok_or_else(|| AppError::Internal("Password hash missing after fetch_user".to_string()))?;

  if auth_service::verify_password(&stored_hash, &password)? {
    event!(Level::DEBUG, ?user_id, "Password verified.");
    Ok(PipelineControl::Continue)
  } else {
    warn!(?user_id, "Password mismatch on signin.");
    Err(AppError::Auth(INVALID_CREDENTIALS.to_string()))
  }
}

async fn open_session(ctx_data: ContextData<SigninCtxData>) -> AppResult<PipelineControl> {
  let (user_id, ttl_hours, db_pool) = {
    let guard = ctx_data.read();
    (guard.user_id, guard.session_ttl_hours, guard.db_pool.clone())
  };
  let user_id = user_id.ok_or_else(|| AppError::Internal("User id missing after fetch_user".to_string()))?;

  let token = sessions::create(&db_pool, user_id, ttl_hours).await?;
  ctx_data.write().session_token = Some(token);
  Ok(PipelineControl::Continue)
}

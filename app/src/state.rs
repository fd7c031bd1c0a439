// app/src/state.rs
use crate::config::AppConfig;
use crate::pipelines::AuthPipelines;
use clinic_core::AppointmentLifecycle;
use sqlx::SqlitePool;
use std::sync::Arc;
use tera::Tera;

#[derive(Clone)]
pub struct AppState {
  pub db_pool: SqlitePool,
  pub lifecycle: Arc<AppointmentLifecycle>,
  pub auth_pipelines: Arc<AuthPipelines>,
  pub templates: Arc<Tera>,
  pub config: Arc<AppConfig>,
}

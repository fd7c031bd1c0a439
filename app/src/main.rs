// app/src/main.rs

mod config;
mod db;
mod errors;
mod models;
mod pipelines;
mod services;
mod state;
mod web;

use crate::config::{AppConfig, LogFormat};
use crate::db::SqliteStore;
use crate::pipelines::AuthPipelines;
use crate::state::AppState;

use actix_web::{web as actix_data, App, HttpServer};
use clinic_core::AppointmentLifecycle;
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_span_events(FmtSpan::CLOSE);
  match format {
    LogFormat::Pretty => builder.init(),
    LogFormat::Json => builder.json().init(),
  }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      eprintln!("Configuration error: {}", e);
      std::process::exit(1);
    }
  };
  init_tracing(app_config.log_format);
  tracing::info!("Starting clinic application server...");

  let db_pool = match db::connect(&app_config).await {
    Ok(pool) => pool,
    Err(e) => {
      tracing::error!(error = %e, "Failed to open the database.");
      return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
    }
  };

  if app_config.seed_db {
    if let Err(e) = db::seed::seed_database(&db_pool, &app_config.admin).await {
      tracing::error!(error = %e, "Failed to seed database.");
      return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
    }
  }
  if let Err(e) = db::sessions::purge_expired(&db_pool).await {
    tracing::warn!(error = %e, "Could not purge expired sessions.");
  }

  let templates = match web::render::load_templates() {
    Ok(tera) => Arc::new(tera),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load templates.");
      return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
    }
  };

  let app_state = AppState {
    db_pool: db_pool.clone(),
    lifecycle: Arc::new(AppointmentLifecycle::new(Arc::new(SqliteStore::new(db_pool)))),
    auth_pipelines: Arc::new(AuthPipelines::new()),
    templates,
    config: app_config.clone(),
  };

  let server_address = app_config.server_address();
  tracing::info!("Binding server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}

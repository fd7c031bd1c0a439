// app/src/db/mod.rs

//! SQLite persistence: pool setup, migrations, seeding and queries.

pub mod appointments;
pub mod doctors;
pub mod seed;
pub mod sessions;
pub mod store;
pub mod users;

use crate::config::AppConfig;
use crate::errors::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::{info, instrument};

pub use store::SqliteStore;

/// Opens the pool (foreign keys on) and applies pending migrations.
#[instrument(name = "db::connect", skip(config), fields(max_connections = config.db_max_connections), err(Display))]
pub async fn connect(config: &AppConfig) -> Result<SqlitePool> {
  let options = SqliteConnectOptions::from_str(&config.database_url)?
    .create_if_missing(true)
    .foreign_keys(true);

  let pool = SqlitePoolOptions::new()
    .max_connections(config.db_max_connections)
    .connect_with(options)
    .await?;
  info!("Connected to the database.");

  migrate(&pool).await?;
  Ok(pool)
}

pub async fn migrate(pool: &SqlitePool) -> Result<()> {
  sqlx::migrate!("./migrations").run(pool).await?;
  info!("Database migrations applied.");
  Ok(())
}

/// Returns true when `err` is a UNIQUE constraint failure.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
  matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

// app/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

/// Ten years.
const MAX_SESSION_TTL_HOURS: i64 = 10 * 366 * 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Pretty,
  Json,
}

impl FromStr for LogFormat {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s.to_ascii_lowercase().as_str() {
      "pretty" => Ok(LogFormat::Pretty),
      "json" => Ok(LogFormat::Json),
      other => Err(AppError::Config(format!("Invalid LOG_FORMAT '{}', expected 'pretty' or 'json'", other))),
    }
  }
}

/// The administrator account created by the seeder when its email is absent.
#[derive(Clone)]
pub struct AdminSeed {
  pub name: String,
  pub email: String,
  pub password: String,
}

impl std::fmt::Debug for AdminSeed {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("AdminSeed")
      .field("name", &self.name)
      .field("email", &self.email)
      .field("password", &"[REDACTED]")
      .finish()
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub db_max_connections: u32,

  pub seed_db: bool,
  pub admin: AdminSeed,

  pub session_ttl_hours: i64,
  pub cookie_secure: bool,

  pub log_format: LogFormat,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|var_name| env::var(var_name).ok())
  }

  /// Builds the config from any variable lookup. Unset variables take their
  /// defaults; set but unparsable ones are errors.
  pub fn from_lookup<F>(lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let get_or = |var_name: &str, default: &str| lookup(var_name).unwrap_or_else(|| default.to_string());

    let server_host = get_or("SERVER_HOST", "127.0.0.1");
    let server_port = parse_var(&lookup, "SERVER_PORT", 8080u16)?;
    let database_url = get_or("DATABASE_URL", "sqlite://clinic.db?mode=rwc");
    let db_max_connections = parse_var(&lookup, "DB_MAX_CONNECTIONS", 5u32)?;
    if db_max_connections == 0 {
      return Err(AppError::Config("DB_MAX_CONNECTIONS must be at least 1".to_string()));
    }

    let seed_db = parse_var(&lookup, "SEED_DB", true)?;
    let admin = AdminSeed {
      name: get_or("ADMIN_NAME", "Admin User"),
      email: get_or("ADMIN_EMAIL", "admin@clinic.com"),
      password: get_or("ADMIN_PASSWORD", "admin123"),
    };

    let session_ttl_hours = parse_var(&lookup, "SESSION_TTL_HOURS", 336i64)?;
    if !(1..=MAX_SESSION_TTL_HOURS).contains(&session_ttl_hours) {
      return Err(AppError::Config(format!(
        "SESSION_TTL_HOURS must be between 1 and {}",
        MAX_SESSION_TTL_HOURS
      )));
    }
    let cookie_secure = parse_var(&lookup, "COOKIE_SECURE", false)?;
    let log_format = parse_var(&lookup, "LOG_FORMAT", LogFormat::Pretty)?;

    Ok(Self {
      server_host,
      server_port,
      database_url,
      db_max_connections,
      seed_db,
      admin,
      session_ttl_hours,
      cookie_secure,
      log_format,
    })
  }

  pub fn server_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}

fn parse_var<F, T>(lookup: &F, var_name: &str, default: T) -> Result<T>
where
  F: Fn(&str) -> Option<String>,
  T: FromStr,
  T::Err: std::fmt::Display,
{
  match lookup(var_name) {
    None => Ok(default),
    Some(raw) => raw
      .trim()
      .parse::<T>()
      .map_err(|e| AppError::Config(format!("Invalid {} value '{}': {}", var_name, raw, e))),
  }
}

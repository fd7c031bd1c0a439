// app/src/models/user.rs

use clinic_core::Caller;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct User {
  pub id: i64,
  pub name: String,
  pub email: String,
  /// Argon2 PHC string.
  pub password: String,
  pub phone: Option<String>,
  pub is_admin: bool,
}

impl User {
  pub fn caller(&self) -> Caller {
    Caller::from_user(self.id, self.name.clone(), self.is_admin)
  }
}

#[derive(Debug, Clone)]
pub struct NewUser {
  pub name: String,
  pub email: String,
  pub password_hash: String,
  pub phone: Option<String>,
  pub is_admin: bool,
}

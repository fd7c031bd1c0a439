// app/src/web/session.rs

//! Resolves the session cookie into the request's `Caller`.

use crate::config::AppConfig;
use crate::db::sessions;
use crate::errors::AppError;
use crate::state::AppState;
use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use clinic_core::Caller;
use futures_util::future::LocalBoxFuture;
use tracing::debug;

pub const SESSION_COOKIE: &str = "clinic_sid";

/// The caller behind the request. Missing, unknown and expired sessions all
/// resolve to `Caller::Anonymous`; gating is left to the handler.
#[derive(Debug, Clone)]
pub struct SessionCaller {
  pub caller: Caller,
  pub token: Option<String>,
}

impl FromRequest for SessionCaller {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let token = req.cookie(SESSION_COOKIE).map(|c| c.value().to_string());
    let app_state = req.app_data::<web::Data<AppState>>().cloned();

    Box::pin(async move {
      let app_state = app_state.ok_or_else(|| AppError::Internal("AppState is not registered".to_string()))?;
      let Some(token) = token.filter(|t| !t.is_empty()) else {
        return Ok(SessionCaller {
          caller: Caller::Anonymous,
          token: None,
        });
      };

      let caller = sessions::resolve(&app_state.db_pool, &token).await?;
      if !caller.is_authenticated() {
        debug!("Session cookie did not resolve to a live session.");
      }
      Ok(SessionCaller {
        caller,
        token: Some(token),
      })
    })
  }
}

pub fn session_cookie(token: String, config: &AppConfig) -> Cookie<'static> {
  Cookie::build(SESSION_COOKIE, token)
    .path("/")
    .http_only(true)
    .secure(config.cookie_secure)
    .same_site(SameSite::Lax)
    .max_age(CookieDuration::hours(config.session_ttl_hours))
    .finish()
}

pub fn session_removal_cookie() -> Cookie<'static> {
  let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
  cookie.make_removal();
  cookie
}

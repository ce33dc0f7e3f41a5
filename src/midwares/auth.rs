use axum::{
  extract::{Request, State},
  http::header,
  middleware::Next,
  response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::app_state::{AppError, AppState};

/// Authenticated user id, inserted as a request extension by [`require_auth`].
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
  pub user_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
  sub: String,
  exp: usize,
}

pub fn create_token(user_id: i64, secret: &str) -> Result<String, AppError> {
  // Token valid for 24 hours
  let expiration = Utc::now()
    .checked_add_signed(Duration::hours(24))
    .ok_or_else(|| AppError::Internal("token expiry overflowed".to_string()))?
    .timestamp() as usize;

  let claims = Claims {
    sub: user_id.to_string(),
    exp: expiration,
  };

  encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
    .map_err(|e| AppError::Internal(format!("token encoding failed: {e}")))
}

pub fn verify_token(token: &str, secret: &str) -> Result<i64, AppError> {
  let data = decode::<Claims>(
    token,
    &DecodingKey::from_secret(secret.as_bytes()),
    &Validation::default(),
  )
  .map_err(|_| AppError::Auth("Invalid or expired token".to_string()))?;

  data
    .claims
    .sub
    .parse()
    .map_err(|_| AppError::Auth("Invalid token subject".to_string()))
}

/// Resolves the bearer token to a user id before any protected handler runs.
pub async fn require_auth(
  State(state): State<AppState>,
  mut req: Request,
  next: Next,
) -> Result<Response, AppError> {
  let token = req
    .headers()
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .ok_or_else(|| AppError::Auth("Missing bearer token".to_string()))?
    .to_string();

  let user_id = verify_token(&token, &state.jwt_secret)?;

  req.extensions_mut().insert(AuthUser { user_id });

  Ok(next.run(req).await)
}

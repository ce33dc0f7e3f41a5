use axum::{extract::State, Extension, Json};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::midwares::app_state::{AppError, AppState};
use crate::midwares::auth::{create_token, AuthUser};
use crate::models::PublicUser;
use crate::store::users::NewUser;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
  pub username: String,
  pub email: String,
  pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
  pub email: String,
  pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
  pub token: String,
  pub user: PublicUser,
}

fn is_valid_email(email: &str) -> bool {
  if email.chars().any(|c| c.is_whitespace() || c.is_control()) {
    return false;
  }

  let Some((local, domain)) = email.split_once('@') else {
    return false;
  };

  !local.is_empty()
    && !domain.is_empty()
    && domain.contains('.')
    && !domain.starts_with('.')
    && !domain.ends_with('.')
}

pub async fn signup(
  State(state): State<AppState>,
  Json(body): Json<SignupRequest>,
) -> Result<Json<SessionResponse>, AppError> {
  let username = body.username.trim().to_string();
  let email = body.email.trim().to_lowercase();

  // validate before touching the store
  if username.chars().count() < 3 {
    return Err(AppError::Validation("Username must be at least 3 characters".to_string()));
  }
  if !is_valid_email(&email) {
    return Err(AppError::Validation("Email is invalid".to_string()));
  }
  if body.password.chars().count() < 6 {
    return Err(AppError::Validation("Password must be at least 6 characters".to_string()));
  }

  let password_hash = hash(&body.password, DEFAULT_COST)
    .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))?;

  let user = state
    .users
    .insert(&NewUser {
      username,
      email,
      password_hash,
      created_at: Utc::now(),
    })
    .await?;

  let token = create_token(user.id, &state.jwt_secret)?;

  Ok(Json(SessionResponse { token, user: user.public() }))
}

pub async fn login(
  State(state): State<AppState>,
  Json(body): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
  let email = body.email.trim().to_lowercase();

  let user = state
    .users
    .find_by_email(&email)
    .await?
    .ok_or_else(|| AppError::Auth("Invalid email or password".to_string()))?;

  if !verify(&body.password, &user.password_hash).unwrap_or(false) {
    return Err(AppError::Auth("Invalid email or password".to_string()));
  }

  let token = create_token(user.id, &state.jwt_secret)?;

  Ok(Json(SessionResponse { token, user: user.public() }))
}

pub async fn me(
  State(state): State<AppState>,
  Extension(auth): Extension<AuthUser>,
) -> Result<Json<PublicUser>, AppError> {
  let user = state
    .users
    .find_by_id(auth.user_id)
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

  Ok(Json(user.public()))
}

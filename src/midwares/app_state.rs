use axum::{http::StatusCode, response::IntoResponse, Json};
use log::error;
use serde_json::json;
use sqlx::AnyPool;

use crate::store::{CatalogStore, UserStore};

#[derive(Clone)]
pub struct AppState {
  pub users: UserStore,
  pub catalog: CatalogStore,
  pub jwt_secret: String,
}

impl AppState {
  pub fn new(pool: AnyPool, jwt_secret: String) -> Self {
    AppState {
      users: UserStore::new(pool.clone()),
      catalog: CatalogStore::new(pool),
      jwt_secret,
    }
  }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
  #[error("{0}")]
  Validation(String),
  #[error("{0}")]
  Auth(String),
  #[error("{0}")]
  NotFound(String),
  #[error("{0}")]
  Duplicate(String),
  #[error("{0}")]
  InsufficientQuantity(String),
  #[error("database error")]
  Database(#[from] sqlx::Error),
  #[error("{0}")]
  Internal(String),
}

impl IntoResponse for AppError {
  fn into_response(self) -> axum::response::Response {
    let (status, message) = match self {
      Self::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
      Self::Auth(msg) => (StatusCode::UNAUTHORIZED, msg),
      Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
      Self::Duplicate(msg) => (StatusCode::CONFLICT, msg),
      Self::InsufficientQuantity(msg) => (StatusCode::BAD_REQUEST, msg),
      // unexpected failures get a generic body, detail stays server-side
      Self::Database(e) => {
        error!("database failure: {e}");
        (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong!".to_string())
      }
      Self::Internal(msg) => {
        error!("internal failure: {msg}");
        (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong!".to_string())
      }
    };

    let body = Json(json!({"message": message}));

    (status, body).into_response()
  }
}

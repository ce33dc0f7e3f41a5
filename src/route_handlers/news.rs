use axum::{
  extract::{Query, State},
  Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::engine::progression::PREDICTION_XP;
use crate::midwares::app_state::{AppError, AppState};
use crate::midwares::auth::AuthUser;
use crate::models::NewsItem;

fn default_limit() -> i64 {
  10
}

#[derive(Debug, Deserialize)]
pub struct Paging {
  #[serde(default = "default_limit")]
  pub limit: i64,
  #[serde(default)]
  pub skip: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictRequest {
  pub news_id: i64,
  pub is_bullish: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictResponse {
  pub is_correct: bool,
  pub explanation: String,
  pub user: PredictUserStats,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictUserStats {
  pub level: i64,
  pub experience: i64,
  pub next_level: i64,
}

pub async fn list(
  State(state): State<AppState>,
  Query(paging): Query<Paging>,
) -> Result<Json<Vec<NewsItem>>, AppError> {
  Ok(Json(state.catalog.list_news(paging.limit, paging.skip).await?))
}

pub async fn predict(
  State(state): State<AppState>,
  Extension(auth): Extension<AuthUser>,
  Json(body): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, AppError> {
  let news = state
    .catalog
    .find_news(body.news_id)
    .await?
    .ok_or_else(|| AppError::NotFound("News item not found".to_string()))?;

  let is_correct = news.is_bullish == body.is_bullish;
  let now = Utc::now();

  let user = state
    .users
    .update_with(auth.user_id, |user| {
      let mut progression = user.progression();
      // a wrong prediction earns nothing, but the zero-delta award still
      // runs the threshold check so a pending level-up is not deferred
      progression.award(if is_correct { PREDICTION_XP } else { 0 });
      progression.touch_streak(now);
      user.set_progression(progression);
      Ok(())
    })
    .await?;

  Ok(Json(PredictResponse {
    is_correct,
    explanation: news.explanation,
    user: PredictUserStats {
      level: user.level,
      experience: user.experience,
      next_level: user.next_level,
    },
  }))
}

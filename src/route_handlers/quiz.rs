use axum::{
  extract::{Query, State},
  Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::engine::progression::QUIZ_XP_MULTIPLIER;
use crate::midwares::app_state::{AppError, AppState};
use crate::midwares::auth::AuthUser;
use crate::models::QuizQuestion;

#[derive(Debug, Deserialize)]
pub struct QuizFilter {
  pub category: Option<String>,
  pub difficulty: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAnswer {
  pub question_id: i64,
  pub selected_option: i64,
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
  pub answers: Vec<SubmittedAnswer>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
  pub correct_count: i64,
  pub total_questions: i64,
  pub experience_gained: i64,
  pub user: QuizUserStats,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizUserStats {
  pub level: i64,
  pub experience: i64,
  pub next_level: i64,
  pub streak: i64,
}

pub async fn list(
  State(state): State<AppState>,
  Query(filter): Query<QuizFilter>,
) -> Result<Json<Vec<QuizQuestion>>, AppError> {
  let questions = state
    .catalog
    .list_questions(filter.category.as_deref(), filter.difficulty.as_deref())
    .await?;

  Ok(Json(questions))
}

pub async fn submit(
  State(state): State<AppState>,
  Extension(auth): Extension<AuthUser>,
  Json(body): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, AppError> {
  let mut correct_count = 0i64;
  let mut experience_gained = 0i64;

  for answer in &body.answers {
    // unknown question ids are skipped, not failed; they still count as
    // incorrect in the aggregates below
    let Some(question) = state.catalog.find_question(answer.question_id).await? else {
      continue;
    };

    if answer.selected_option == question.correct_answer {
      correct_count += 1;
      experience_gained += question.experience_points * QUIZ_XP_MULTIPLIER;
    }
  }

  let total_questions = body.answers.len() as i64;
  let now = Utc::now();

  let user = state
    .users
    .update_with(auth.user_id, |user| {
      user.total_quizzes += 1;
      user.correct_answers += correct_count;
      user.incorrect_answers += total_questions - correct_count;

      let mut progression = user.progression();
      progression.award(experience_gained);
      progression.touch_streak(now);
      user.set_progression(progression);
      Ok(())
    })
    .await?;

  Ok(Json(SubmitResponse {
    correct_count,
    total_questions,
    experience_gained,
    user: QuizUserStats {
      level: user.level,
      experience: user.experience,
      next_level: user.next_level,
      streak: user.streak,
    },
  }))
}

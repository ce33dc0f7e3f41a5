use chrono::{DateTime, Utc};
use sqlx::AnyPool;

use super::{format_ts, parse_ts};
use crate::midwares::app_state::AppError;
use crate::models::User;

// Bounded retries for the optimistic-concurrency loop; buy/sell/quiz-submit
// are read-modify-write and must not lose updates under concurrent requests.
const CAS_RETRIES: u32 = 3;

const USER_COLUMNS: &str = "id, username, email, password, level, experience, next_level, \
  streak, last_quiz_date, total_quizzes, correct_answers, incorrect_answers, achievements, \
  portfolio, created_at, version";

pub struct NewUser {
  pub username: String,
  pub email: String,
  pub password_hash: String,
  pub created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct UserRow {
  id: i64,
  username: String,
  email: String,
  password: String,
  level: i64,
  experience: i64,
  next_level: i64,
  streak: i64,
  last_quiz_date: Option<String>,
  total_quizzes: i64,
  correct_answers: i64,
  incorrect_answers: i64,
  achievements: String,
  portfolio: String,
  created_at: String,
  version: i64,
}

fn row_to_user(row: UserRow) -> Result<User, AppError> {
  let achievements = serde_json::from_str(&row.achievements)
    .map_err(|e| AppError::Internal(format!("bad achievements json for user {}: {e}", row.id)))?;
  let portfolio = serde_json::from_str(&row.portfolio)
    .map_err(|e| AppError::Internal(format!("bad portfolio json for user {}: {e}", row.id)))?;
  let last_quiz_date = row.last_quiz_date.as_deref().map(parse_ts).transpose()?;
  let created_at = parse_ts(&row.created_at)?;

  Ok(User {
    id: row.id,
    username: row.username,
    email: row.email,
    password_hash: row.password,
    level: row.level,
    experience: row.experience,
    next_level: row.next_level,
    streak: row.streak,
    last_quiz_date,
    total_quizzes: row.total_quizzes,
    correct_answers: row.correct_answers,
    incorrect_answers: row.incorrect_answers,
    achievements,
    portfolio,
    created_at,
    version: row.version,
  })
}

#[derive(Clone)]
pub struct UserStore {
  pool: AnyPool,
}

impl UserStore {
  pub fn new(pool: AnyPool) -> Self {
    UserStore { pool }
  }

  /// Inserts a fresh account with the default progression state. A unique
  /// violation on username or email maps to `Duplicate`.
  pub async fn insert(&self, new_user: &NewUser) -> Result<User, AppError> {
    let created_at = format_ts(new_user.created_at);

    let row: (i64,) = sqlx::query_as(
      "INSERT INTO users (username, email, password, level, experience, next_level, streak, \
       last_quiz_date, total_quizzes, correct_answers, incorrect_answers, achievements, \
       portfolio, created_at, version) \
       VALUES ($1, $2, $3, 1, 0, 1000, 0, NULL, 0, 0, 0, '[]', '[]', $4, 0) \
       RETURNING id",
    )
    .bind(&new_user.username)
    .bind(&new_user.email)
    .bind(&new_user.password_hash)
    .bind(&created_at)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| match e {
      sqlx::Error::Database(err) if err.is_unique_violation() => {
        AppError::Duplicate("Username or email already in use".to_string())
      }
      e => AppError::Database(e),
    })?;

    Ok(User {
      id: row.0,
      username: new_user.username.clone(),
      email: new_user.email.clone(),
      password_hash: new_user.password_hash.clone(),
      level: 1,
      experience: 0,
      next_level: 1000,
      streak: 0,
      last_quiz_date: None,
      total_quizzes: 0,
      correct_answers: 0,
      incorrect_answers: 0,
      achievements: Vec::new(),
      portfolio: Vec::new(),
      created_at: new_user.created_at,
      version: 0,
    })
  }

  pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
    let row = sqlx::query_as::<_, UserRow>(&sql)
      .bind(email)
      .fetch_optional(&self.pool)
      .await?;

    row.map(row_to_user).transpose()
  }

  pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
    let row = sqlx::query_as::<_, UserRow>(&sql)
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;

    row.map(row_to_user).transpose()
  }

  /// Persists the mutable user state, guarded by the version token. Returns
  /// false when another writer got there first.
  pub async fn save_cas(&self, user: &User) -> Result<bool, AppError> {
    let achievements = serde_json::to_string(&user.achievements)
      .map_err(|e| AppError::Internal(format!("achievements encoding failed: {e}")))?;
    let portfolio = serde_json::to_string(&user.portfolio)
      .map_err(|e| AppError::Internal(format!("portfolio encoding failed: {e}")))?;
    let last_quiz_date = user.last_quiz_date.map(format_ts);

    let result = sqlx::query(
      "UPDATE users SET level = $1, experience = $2, next_level = $3, streak = $4, \
       last_quiz_date = $5, total_quizzes = $6, correct_answers = $7, incorrect_answers = $8, \
       achievements = $9, portfolio = $10, version = version + 1 \
       WHERE id = $11 AND version = $12",
    )
    .bind(user.level)
    .bind(user.experience)
    .bind(user.next_level)
    .bind(user.streak)
    .bind(last_quiz_date)
    .bind(user.total_quizzes)
    .bind(user.correct_answers)
    .bind(user.incorrect_answers)
    .bind(achievements)
    .bind(portfolio)
    .bind(user.id)
    .bind(user.version)
    .execute(&self.pool)
    .await?;

    Ok(result.rows_affected() == 1)
  }

  /// Load-mutate-save under the version guard, retrying on conflict. The
  /// closure sees a fresh snapshot on every attempt; an error from it aborts
  /// without persisting anything.
  pub async fn update_with<F>(&self, id: i64, mut apply: F) -> Result<User, AppError>
  where
    F: FnMut(&mut User) -> Result<(), AppError> + Send,
  {
    for _ in 0..CAS_RETRIES {
      let mut user = self
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

      apply(&mut user)?;

      if self.save_cas(&user).await? {
        user.version += 1;
        return Ok(user);
      }
    }

    Err(AppError::Internal(format!("user {id} update kept conflicting, retries exhausted")))
  }
}

pub mod catalog;
pub mod users;

pub use catalog::CatalogStore;
pub use users::UserStore;

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::AnyPool;

use crate::midwares::app_state::AppError;

// Fixed-width UTC timestamps so text columns sort lexicographically.
pub(crate) fn format_ts(t: DateTime<Utc>) -> String {
  t.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_ts(s: &str) -> Result<DateTime<Utc>, AppError> {
  DateTime::parse_from_rfc3339(s)
    .map(|t| t.with_timezone(&Utc))
    .map_err(|e| AppError::Internal(format!("bad timestamp in db: {e}")))
}

/// Creates the schema on startup. Production dialect; the test harness
/// creates its own sqlite tables.
pub async fn init_schema(pool: &AnyPool) -> Result<(), AppError> {
  sqlx::raw_sql(
    "
    CREATE TABLE IF NOT EXISTS users (
      id BIGSERIAL PRIMARY KEY,
      username TEXT NOT NULL UNIQUE,
      email TEXT NOT NULL UNIQUE,
      password TEXT NOT NULL,
      level BIGINT NOT NULL DEFAULT 1,
      experience BIGINT NOT NULL DEFAULT 0,
      next_level BIGINT NOT NULL DEFAULT 1000,
      streak BIGINT NOT NULL DEFAULT 0,
      last_quiz_date TEXT,
      total_quizzes BIGINT NOT NULL DEFAULT 0,
      correct_answers BIGINT NOT NULL DEFAULT 0,
      incorrect_answers BIGINT NOT NULL DEFAULT 0,
      achievements TEXT NOT NULL DEFAULT '[]',
      portfolio TEXT NOT NULL DEFAULT '[]',
      created_at TEXT NOT NULL,
      version BIGINT NOT NULL DEFAULT 0
    );
    CREATE TABLE IF NOT EXISTS stocks (
      id BIGSERIAL PRIMARY KEY,
      name TEXT NOT NULL,
      ticker TEXT NOT NULL UNIQUE,
      base_price DOUBLE PRECISION NOT NULL,
      trend TEXT NOT NULL,
      volatility DOUBLE PRECISION NOT NULL,
      description TEXT NOT NULL,
      sector TEXT NOT NULL,
      market_cap DOUBLE PRECISION NOT NULL
    );
    CREATE TABLE IF NOT EXISTS news (
      id BIGSERIAL PRIMARY KEY,
      stock_ticker TEXT NOT NULL,
      headline TEXT NOT NULL,
      details TEXT NOT NULL,
      is_bullish BIGINT NOT NULL,
      explanation TEXT NOT NULL,
      date TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS quiz_questions (
      id BIGSERIAL PRIMARY KEY,
      question TEXT NOT NULL,
      options TEXT NOT NULL,
      correct_answer BIGINT NOT NULL,
      explanation TEXT NOT NULL,
      category TEXT NOT NULL,
      difficulty TEXT NOT NULL,
      experience_points BIGINT NOT NULL
    );
    ",
  )
  .execute(pool)
  .await?;

  Ok(())
}

use rand::Rng;
use sqlx::{any::install_default_drivers, AnyPool};

/// Fresh in-memory sqlite database with the full schema. Each call gets a
/// uniquely named shared-cache db so tests stay isolated.
pub async fn setup_test_db() -> AnyPool {
  install_default_drivers();

  let tag: String = rand::rng()
    .sample_iter(rand::distr::Alphanumeric)
    .take(7)
    .map(char::from)
    .collect();
  let database_url = format!("sqlite:file:test_{}?mode=memory&cache=shared", tag);

  let pool = AnyPool::connect(&database_url)
    .await
    .expect("failed to create in-memory sqlite db");

  sqlx::raw_sql(
    "
    CREATE TABLE users (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      username TEXT NOT NULL UNIQUE,
      email TEXT NOT NULL UNIQUE,
      password TEXT NOT NULL,
      level INTEGER NOT NULL DEFAULT 1,
      experience INTEGER NOT NULL DEFAULT 0,
      next_level INTEGER NOT NULL DEFAULT 1000,
      streak INTEGER NOT NULL DEFAULT 0,
      last_quiz_date TEXT,
      total_quizzes INTEGER NOT NULL DEFAULT 0,
      correct_answers INTEGER NOT NULL DEFAULT 0,
      incorrect_answers INTEGER NOT NULL DEFAULT 0,
      achievements TEXT NOT NULL DEFAULT '[]',
      portfolio TEXT NOT NULL DEFAULT '[]',
      created_at TEXT NOT NULL,
      version INTEGER NOT NULL DEFAULT 0
    );
    CREATE TABLE stocks (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      name TEXT NOT NULL,
      ticker TEXT NOT NULL UNIQUE,
      base_price REAL NOT NULL,
      trend TEXT NOT NULL,
      volatility REAL NOT NULL,
      description TEXT NOT NULL,
      sector TEXT NOT NULL,
      market_cap REAL NOT NULL
    );
    CREATE TABLE news (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      stock_ticker TEXT NOT NULL,
      headline TEXT NOT NULL,
      details TEXT NOT NULL,
      is_bullish INTEGER NOT NULL,
      explanation TEXT NOT NULL,
      date TEXT NOT NULL
    );
    CREATE TABLE quiz_questions (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      question TEXT NOT NULL,
      options TEXT NOT NULL,
      correct_answer INTEGER NOT NULL,
      explanation TEXT NOT NULL,
      category TEXT NOT NULL,
      difficulty TEXT NOT NULL,
      experience_points INTEGER NOT NULL
    );
    ",
  )
  .execute(&pool)
  .await
  .expect("failed to create test schema");

  pool
}

#[allow(dead_code)]
pub async fn seed_stock(pool: &AnyPool, name: &str, ticker: &str, base_price: f64) -> i64 {
  let row: (i64,) = sqlx::query_as(
    "INSERT INTO stocks (name, ticker, base_price, trend, volatility, description, sector, market_cap) \
     VALUES ($1, $2, $3, 'up', 0.3, 'a test stock', 'Tech', 1000000.0) RETURNING id",
  )
  .bind(name)
  .bind(ticker)
  .bind(base_price)
  .fetch_one(pool)
  .await
  .expect("failed to seed stock");

  row.0
}

#[allow(dead_code)]
pub async fn seed_news(
  pool: &AnyPool,
  ticker: &str,
  headline: &str,
  is_bullish: bool,
  explanation: &str,
  date: &str,
) -> i64 {
  let row: (i64,) = sqlx::query_as(
    "INSERT INTO news (stock_ticker, headline, details, is_bullish, explanation, date) \
     VALUES ($1, $2, 'details', $3, $4, $5) RETURNING id",
  )
  .bind(ticker)
  .bind(headline)
  .bind(if is_bullish { 1i64 } else { 0i64 })
  .bind(explanation)
  .bind(date)
  .fetch_one(pool)
  .await
  .expect("failed to seed news");

  row.0
}

#[allow(dead_code)]
pub async fn seed_question(
  pool: &AnyPool,
  question: &str,
  correct_answer: i64,
  category: &str,
  difficulty: &str,
  experience_points: i64,
) -> i64 {
  let row: (i64,) = sqlx::query_as(
    "INSERT INTO quiz_questions (question, options, correct_answer, explanation, category, difficulty, experience_points) \
     VALUES ($1, '[\"a\",\"b\",\"c\",\"d\"]', $2, 'because', $3, $4, $5) RETURNING id",
  )
  .bind(question)
  .bind(correct_answer)
  .bind(category)
  .bind(difficulty)
  .bind(experience_points)
  .fetch_one(pool)
  .await
  .expect("failed to seed question");

  row.0
}

use sqlx::AnyPool;

use super::parse_ts;
use crate::midwares::app_state::AppError;
use crate::models::{NewsItem, QuizQuestion, Stock, Trend};

#[derive(sqlx::FromRow)]
struct StockRow {
  id: i64,
  name: String,
  ticker: String,
  base_price: f64,
  trend: String,
  volatility: f64,
  description: String,
  sector: String,
  market_cap: f64,
}

fn row_to_stock(row: StockRow) -> Result<Stock, AppError> {
  let trend = Trend::parse(&row.trend)
    .ok_or_else(|| AppError::Internal(format!("unknown trend '{}' for stock {}", row.trend, row.id)))?;

  Ok(Stock {
    id: row.id,
    name: row.name,
    ticker: row.ticker,
    base_price: row.base_price,
    trend,
    volatility: row.volatility,
    description: row.description,
    sector: row.sector,
    market_cap: row.market_cap,
  })
}

#[derive(sqlx::FromRow)]
struct NewsRow {
  id: i64,
  stock_ticker: String,
  headline: String,
  details: String,
  is_bullish: i64,
  explanation: String,
  date: String,
}

fn row_to_news(row: NewsRow) -> Result<NewsItem, AppError> {
  Ok(NewsItem {
    id: row.id,
    stock_ticker: row.stock_ticker,
    news_headline: row.headline,
    news_details: row.details,
    is_bullish: row.is_bullish != 0,
    explanation: row.explanation,
    date: parse_ts(&row.date)?,
  })
}

#[derive(sqlx::FromRow)]
struct QuestionRow {
  id: i64,
  question: String,
  options: String,
  correct_answer: i64,
  explanation: String,
  category: String,
  difficulty: String,
  experience_points: i64,
}

fn row_to_question(row: QuestionRow) -> Result<QuizQuestion, AppError> {
  let options = serde_json::from_str(&row.options)
    .map_err(|e| AppError::Internal(format!("bad options json for question {}: {e}", row.id)))?;

  Ok(QuizQuestion {
    id: row.id,
    question: row.question,
    options,
    correct_answer: row.correct_answer,
    explanation: row.explanation,
    category: row.category,
    difficulty: row.difficulty,
    experience_points: row.experience_points,
  })
}

/// Read-only reference data: stocks, news items, quiz questions. Seeded and
/// administered out of band.
#[derive(Clone)]
pub struct CatalogStore {
  pool: AnyPool,
}

const STOCK_COLUMNS: &str =
  "id, name, ticker, base_price, trend, volatility, description, sector, market_cap";
const NEWS_COLUMNS: &str = "id, stock_ticker, headline, details, is_bullish, explanation, date";
const QUESTION_COLUMNS: &str =
  "id, question, options, correct_answer, explanation, category, difficulty, experience_points";

impl CatalogStore {
  pub fn new(pool: AnyPool) -> Self {
    CatalogStore { pool }
  }

  // Unbounded read; the stock table is a small reference set.
  pub async fn list_stocks(&self) -> Result<Vec<Stock>, AppError> {
    let sql = format!("SELECT {STOCK_COLUMNS} FROM stocks");
    let rows = sqlx::query_as::<_, StockRow>(&sql).fetch_all(&self.pool).await?;

    rows.into_iter().map(row_to_stock).collect()
  }

  pub async fn find_stock(&self, id: i64) -> Result<Option<Stock>, AppError> {
    let sql = format!("SELECT {STOCK_COLUMNS} FROM stocks WHERE id = $1");
    let row = sqlx::query_as::<_, StockRow>(&sql)
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;

    row.map(row_to_stock).transpose()
  }

  pub async fn list_news(&self, limit: i64, skip: i64) -> Result<Vec<NewsItem>, AppError> {
    let sql = format!("SELECT {NEWS_COLUMNS} FROM news ORDER BY date DESC LIMIT $1 OFFSET $2");
    let rows = sqlx::query_as::<_, NewsRow>(&sql)
      .bind(limit.max(0))
      .bind(skip.max(0))
      .fetch_all(&self.pool)
      .await?;

    rows.into_iter().map(row_to_news).collect()
  }

  pub async fn find_news(&self, id: i64) -> Result<Option<NewsItem>, AppError> {
    let sql = format!("SELECT {NEWS_COLUMNS} FROM news WHERE id = $1");
    let row = sqlx::query_as::<_, NewsRow>(&sql)
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;

    row.map(row_to_news).transpose()
  }

  pub async fn list_questions(
    &self,
    category: Option<&str>,
    difficulty: Option<&str>,
  ) -> Result<Vec<QuizQuestion>, AppError> {
    let mut sql = format!("SELECT {QUESTION_COLUMNS} FROM quiz_questions");
    let mut binds = Vec::new();

    if let Some(category) = category {
      binds.push(category);
      sql.push_str(&format!(" WHERE category = ${}", binds.len()));
    }
    if let Some(difficulty) = difficulty {
      binds.push(difficulty);
      let keyword = if binds.len() == 1 { "WHERE" } else { "AND" };
      sql.push_str(&format!(" {keyword} difficulty = ${}", binds.len()));
    }

    let mut query = sqlx::query_as::<_, QuestionRow>(&sql);
    for bind in &binds {
      query = query.bind(*bind);
    }
    let rows = query.fetch_all(&self.pool).await?;

    rows.into_iter().map(row_to_question).collect()
  }

  pub async fn find_question(&self, id: i64) -> Result<Option<QuizQuestion>, AppError> {
    let sql = format!("SELECT {QUESTION_COLUMNS} FROM quiz_questions WHERE id = $1");
    let row = sqlx::query_as::<_, QuestionRow>(&sql)
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;

    row.map(row_to_question).transpose()
  }
}

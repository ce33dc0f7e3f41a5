use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::progression::Progression;

/// Price trend category of a reference stock. Also drives the drift of the
/// simulated price series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
  Up,
  Down,
  Volatile,
  Stable,
}

impl Trend {
  pub fn as_str(&self) -> &'static str {
    match self {
      Trend::Up => "up",
      Trend::Down => "down",
      Trend::Volatile => "volatile",
      Trend::Stable => "stable",
    }
  }

  pub fn parse(s: &str) -> Option<Trend> {
    match s {
      "up" => Some(Trend::Up),
      "down" => Some(Trend::Down),
      "volatile" => Some(Trend::Volatile),
      "stable" => Some(Trend::Stable),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
  pub stock_id: i64,
  pub name: String,
  pub ticker: String,
  pub current_price: f64,
  pub quantity: i64,
  pub purchase_price: f64,
  pub purchase_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
  pub id: String,
  pub name: String,
  pub description: String,
  pub earned: bool,
  pub icon: String,
  pub earned_at: Option<DateTime<Utc>>,
}

/// Full user document, including the credential hash and the optimistic
/// concurrency token. Never serialized as-is; responses go through
/// [`User::public`].
#[derive(Debug, Clone)]
pub struct User {
  pub id: i64,
  pub username: String,
  pub email: String,
  pub password_hash: String,
  pub level: i64,
  pub experience: i64,
  pub next_level: i64,
  pub streak: i64,
  pub last_quiz_date: Option<DateTime<Utc>>,
  pub total_quizzes: i64,
  pub correct_answers: i64,
  pub incorrect_answers: i64,
  pub achievements: Vec<Achievement>,
  pub portfolio: Vec<Holding>,
  pub created_at: DateTime<Utc>,
  pub version: i64,
}

impl User {
  pub fn progression(&self) -> Progression {
    Progression {
      level: self.level,
      experience: self.experience,
      next_level: self.next_level,
      streak: self.streak,
      last_activity: self.last_quiz_date,
    }
  }

  pub fn set_progression(&mut self, p: Progression) {
    self.level = p.level;
    self.experience = p.experience;
    self.next_level = p.next_level;
    self.streak = p.streak;
    self.last_quiz_date = p.last_activity;
  }

  pub fn public(&self) -> PublicUser {
    PublicUser {
      id: self.id,
      username: self.username.clone(),
      email: self.email.clone(),
      level: self.level,
      experience: self.experience,
      next_level: self.next_level,
      streak: self.streak,
      last_quiz_date: self.last_quiz_date,
      total_quizzes: self.total_quizzes,
      correct_answers: self.correct_answers,
      incorrect_answers: self.incorrect_answers,
      achievements: self.achievements.clone(),
      portfolio: self.portfolio.clone(),
      created_at: self.created_at,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
  pub id: i64,
  pub username: String,
  pub email: String,
  pub level: i64,
  pub experience: i64,
  pub next_level: i64,
  pub streak: i64,
  pub last_quiz_date: Option<DateTime<Utc>>,
  pub total_quizzes: i64,
  pub correct_answers: i64,
  pub incorrect_answers: i64,
  pub achievements: Vec<Achievement>,
  pub portfolio: Vec<Holding>,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
  pub id: i64,
  pub name: String,
  pub ticker: String,
  pub base_price: f64,
  pub trend: Trend,
  pub volatility: f64,
  pub description: String,
  pub sector: String,
  pub market_cap: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
  pub id: i64,
  pub stock_ticker: String,
  pub news_headline: String,
  pub news_details: String,
  pub is_bullish: bool,
  pub explanation: String,
  pub date: DateTime<Utc>,
}

/// Quiz question as served to clients. The correct-answer index and
/// explanation ship with the document; scoring happens on submit.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
  pub id: i64,
  pub question: String,
  pub options: Vec<String>,
  pub correct_answer: i64,
  pub explanation: String,
  pub category: String,
  pub difficulty: String,
  pub experience_points: i64,
}

use std::env;

use dotenvy::dotenv;

pub struct Config {
  pub database_url: String,
  pub jwt_secret: String,
  pub bind_addr: String,
}

impl Config {
  pub fn from_env() -> Self {
    dotenv().ok();

    Config {
      database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
      jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
      bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
    }
  }
}

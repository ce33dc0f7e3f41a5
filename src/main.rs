use env_logger::Builder;
use log::{info, LevelFilter};
use tokio::net::TcpListener;

use stonks_api::{app, config::Config, midwares::app_state::AppState, store};

#[tokio::main]
async fn main() {
  Builder::new()
    .filter_level(LevelFilter::Info)
    .format_timestamp_secs()
    .init();

  let config = Config::from_env();

  sqlx::any::install_default_drivers();
  let pool = sqlx::any::AnyPoolOptions::new()
    .max_connections(10)
    .connect(&config.database_url)
    .await
    .expect("failed to create db pool");

  store::init_schema(&pool).await.expect("failed to initialize schema");
  info!("Connected to database...");

  let state = AppState::new(pool, config.jwt_secret.clone());

  let listener = TcpListener::bind(&config.bind_addr)
    .await
    .expect("failed to start tcp listener");
  info!("Server running on http://{}", config.bind_addr);

  axum::serve(listener, app(state)).await.expect("failed to start server");
}

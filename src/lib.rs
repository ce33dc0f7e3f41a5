pub mod config;
pub mod engine;
pub mod midwares;
pub mod models;
pub mod route_handlers;
pub mod store;

use axum::{
  middleware,
  routing::{get, post},
  Router,
};
use tower_http::cors::CorsLayer;

use midwares::app_state::AppState;

/// Builds the full API router. CORS is fully open; the app is served to
/// browser clients on other origins.
pub fn app(state: AppState) -> Router {
  let protected = Router::new()
    .route("/api/auth/me", get(route_handlers::auth::me))
    .route("/api/stocks/buy", post(route_handlers::stocks::buy))
    .route("/api/stocks/sell", post(route_handlers::stocks::sell))
    .route("/api/quiz/submit", post(route_handlers::quiz::submit))
    .route("/api/news/predict", post(route_handlers::news::predict))
    .route_layer(middleware::from_fn_with_state(state.clone(), midwares::auth::require_auth));

  Router::new()
    .route("/", get(|| async { "API is running..." }))
    .route("/api/auth/signup", post(route_handlers::auth::signup))
    .route("/api/auth/login", post(route_handlers::auth::login))
    .route("/api/stocks", get(route_handlers::stocks::list))
    .route("/api/quiz", get(route_handlers::quiz::list))
    .route("/api/news", get(route_handlers::news::list))
    .merge(protected)
    .layer(CorsLayer::permissive())
    .with_state(state)
}

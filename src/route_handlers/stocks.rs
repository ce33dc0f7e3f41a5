use axum::{extract::State, Extension, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::midwares::app_state::{AppError, AppState};
use crate::midwares::auth::AuthUser;
use crate::models::{Holding, Stock};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRequest {
  pub stock_id: i64,
  pub quantity: i64,
}

#[derive(Debug, Serialize)]
pub struct PortfolioResponse {
  pub message: String,
  pub portfolio: Vec<Holding>,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Stock>>, AppError> {
  Ok(Json(state.catalog.list_stocks().await?))
}

/// Appends a holding priced at the stock's current base price. There is no
/// matching engine and no server-side cash check; the client wallet is
/// simulated and not reconciled here.
pub async fn buy(
  State(state): State<AppState>,
  Extension(auth): Extension<AuthUser>,
  Json(body): Json<TradeRequest>,
) -> Result<Json<PortfolioResponse>, AppError> {
  if body.quantity < 1 {
    return Err(AppError::Validation("Quantity must be at least 1".to_string()));
  }

  let stock = state
    .catalog
    .find_stock(body.stock_id)
    .await?
    .ok_or_else(|| AppError::NotFound("Stock not found".to_string()))?;

  let user = state
    .users
    .update_with(auth.user_id, |user| {
      user.portfolio.push(Holding {
        stock_id: stock.id,
        name: stock.name.clone(),
        ticker: stock.ticker.clone(),
        current_price: stock.base_price,
        quantity: body.quantity,
        purchase_price: stock.base_price,
        purchase_date: Utc::now(),
      });
      Ok(())
    })
    .await?;

  Ok(Json(PortfolioResponse {
    message: "Stock purchased successfully".to_string(),
    portfolio: user.portfolio,
  }))
}

pub async fn sell(
  State(state): State<AppState>,
  Extension(auth): Extension<AuthUser>,
  Json(body): Json<TradeRequest>,
) -> Result<Json<PortfolioResponse>, AppError> {
  if body.quantity < 1 {
    return Err(AppError::Validation("Quantity must be at least 1".to_string()));
  }

  let user = state
    .users
    .update_with(auth.user_id, |user| {
      let index = user
        .portfolio
        .iter()
        .position(|h| h.stock_id == body.stock_id)
        .ok_or_else(|| AppError::NotFound("Stock not found in portfolio".to_string()))?;

      if user.portfolio[index].quantity < body.quantity {
        return Err(AppError::InsufficientQuantity("Insufficient quantity to sell".to_string()));
      }

      user.portfolio[index].quantity -= body.quantity;
      if user.portfolio[index].quantity == 0 {
        user.portfolio.remove(index);
      }
      Ok(())
    })
    .await?;

  Ok(Json(PortfolioResponse {
    message: "Stock sold successfully".to_string(),
    portfolio: user.portfolio,
  }))
}

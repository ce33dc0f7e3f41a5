use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::models::Trend;

/// Simulated prices never fall below this.
pub const PRICE_FLOOR: f64 = 10.0;

/// One step of the trading-game random walk: a slightly upward-biased tick
/// with a uniformly drawn per-step movement, clamped just above the floor.
/// Stateless; given the same draws the output is deterministic.
pub fn next_price<R: Rng>(rng: &mut R, last_price: f64) -> f64 {
  let trend = if rng.random_bool(0.52) { 1.0 } else { -1.0 };
  let volatility = rng.random_range(0.1..0.4);

  let mut price = last_price + trend * volatility;
  if price < PRICE_FLOOR {
    price = PRICE_FLOOR + rng.random_range(0.0..2.0);
  }

  price
}

/// Chart series for the stock-selection screen: each point adds a
/// trend-category drift scaled by the previous price plus a
/// volatility-scaled random term, floored at one cent.
pub fn generate_price_series<R: Rng>(
  rng: &mut R,
  start_price: f64,
  trend: Trend,
  volatility: f64,
  points: usize,
) -> Vec<f64> {
  let trend_factor = match trend {
    Trend::Up => 0.005,
    Trend::Down => -0.005,
    Trend::Volatile => 0.0,
    // stable has a slight upward bias
    Trend::Stable => 0.001,
  };

  let mut prices = Vec::with_capacity(points);
  if points == 0 {
    return prices;
  }
  prices.push(start_price);

  for i in 1..points {
    let random_change = (rng.random::<f64>() - 0.5) * volatility * start_price * 0.02;
    let trend_change = prices[i - 1] * trend_factor;
    prices.push((prices[i - 1] + random_change + trend_change).max(0.01));
  }

  prices
}

/// Owned, cancellable price ticker. The interval task is tied to this handle
/// and aborted on drop, so a torn-down consumer never leaves a timer behind.
pub struct PriceFeed {
  rx: mpsc::Receiver<f64>,
  handle: JoinHandle<()>,
}

impl PriceFeed {
  pub fn spawn(start_price: f64, period: Duration) -> Self {
    let (tx, rx) = mpsc::channel(32);

    let handle = tokio::spawn(async move {
      let mut rng = StdRng::from_os_rng();
      let mut interval = tokio::time::interval(period);
      let mut price = start_price;

      loop {
        interval.tick().await;
        price = next_price(&mut rng, price);
        if tx.send(price).await.is_err() {
          break;
        }
      }
    });

    PriceFeed { rx, handle }
  }

  pub async fn recv(&mut self) -> Option<f64> {
    self.rx.recv().await
  }
}

impl Drop for PriceFeed {
  fn drop(&mut self) {
    self.handle.abort();
  }
}

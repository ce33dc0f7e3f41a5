use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use stonks_api::engine::matching::{MatchEvent, MatchRound, STARTING_HEARTS, STOCK_TERMS};
use stonks_api::engine::pricewalk::{generate_price_series, next_price, PriceFeed, PRICE_FLOOR};
use stonks_api::models::Trend;

#[test]
fn next_price_never_drops_below_the_floor() {
  let mut rng = StdRng::seed_from_u64(7);
  let mut price = 10.05;

  for _ in 0..10_000 {
    price = next_price(&mut rng, price);
    assert!(price >= PRICE_FLOOR, "price {price} fell below the floor");
  }
}

#[test]
fn next_price_is_deterministic_for_a_seed() {
  let mut a = StdRng::seed_from_u64(42);
  let mut b = StdRng::seed_from_u64(42);

  let mut price_a = 120.0;
  let mut price_b = 120.0;
  for _ in 0..100 {
    price_a = next_price(&mut a, price_a);
    price_b = next_price(&mut b, price_b);
    assert_eq!(price_a, price_b);
  }
}

#[test]
fn series_reduces_to_drift_without_volatility() {
  let mut rng = StdRng::seed_from_u64(1);

  let prices = generate_price_series(&mut rng, 100.0, Trend::Up, 0.0, 24);

  assert_eq!(prices.len(), 24);
  assert_eq!(prices[0], 100.0);
  for i in 1..prices.len() {
    let expected = prices[i - 1] * 1.005;
    assert!((prices[i] - expected).abs() < 1e-9, "point {i} deviated from pure drift");
  }
}

#[test]
fn series_down_trend_decays_without_volatility() {
  let mut rng = StdRng::seed_from_u64(1);

  let prices = generate_price_series(&mut rng, 50.0, Trend::Down, 0.0, 10);

  for i in 1..prices.len() {
    assert!(prices[i] < prices[i - 1]);
  }
}

#[test]
fn series_is_floored_at_a_cent() {
  let mut rng = StdRng::seed_from_u64(9);

  let prices = generate_price_series(&mut rng, 0.011, Trend::Down, 1.0, 500);

  assert!(prices.iter().all(|p| *p >= 0.01));
}

#[tokio::test]
async fn price_feed_ticks_and_stops_on_drop() {
  let mut feed = PriceFeed::spawn(100.0, Duration::from_millis(1));

  let first = feed.recv().await.expect("feed should produce a price");
  let second = feed.recv().await.expect("feed should keep producing");
  assert!(first >= PRICE_FLOOR);
  assert!(second >= PRICE_FLOOR);

  // dropping the handle aborts the interval task
  drop(feed);
}

fn two_pair_round(rng: &mut StdRng) -> MatchRound {
  MatchRound::with_terms(
    vec![
      ("Bull Market".to_string(), "prices rising".to_string()),
      ("Bear Market".to_string(), "prices falling".to_string()),
    ],
    rng,
  )
}

#[test]
fn level_one_deals_two_pairs_from_the_default_table() {
  let mut rng = StdRng::seed_from_u64(3);

  let round = MatchRound::new(&mut rng);

  assert_eq!(round.level(), 1);
  assert_eq!(round.term_options().len(), 2);
  assert_eq!(round.definition_options().len(), 2);
  assert!(round
    .term_options()
    .iter()
    .all(|t| STOCK_TERMS.iter().any(|(term, _)| term == t)));
}

#[test]
fn a_true_pair_scores_and_consumes_both_options() {
  let mut rng = StdRng::seed_from_u64(5);
  let mut round = two_pair_round(&mut rng);

  assert_eq!(round.select_term("Bull Market"), MatchEvent::Pending);
  assert_eq!(
    round.select_definition("prices rising"),
    MatchEvent::Matched { score: 10 }
  );

  // both sides consumed, never re-offered
  assert!(!round.term_options().contains(&"Bull Market".to_string()));
  assert!(!round.definition_options().contains(&"prices rising".to_string()));
  assert_eq!(round.select_term("Bull Market"), MatchEvent::Ignored);
}

#[test]
fn definition_first_selection_also_resolves() {
  let mut rng = StdRng::seed_from_u64(5);
  let mut round = two_pair_round(&mut rng);

  assert_eq!(round.select_definition("prices falling"), MatchEvent::Pending);
  assert_eq!(
    round.select_term("Bear Market"),
    MatchEvent::Matched { score: 10 }
  );
}

#[test]
fn matching_the_last_pair_completes_the_round() {
  let mut rng = StdRng::seed_from_u64(11);
  let mut round = two_pair_round(&mut rng);

  round.select_term("Bull Market");
  round.select_definition("prices rising");
  round.select_term("Bear Market");
  let event = round.select_definition("prices falling");

  assert_eq!(event, MatchEvent::RoundComplete { score: 20 });

  round.next_round(&mut rng);
  assert_eq!(round.level(), 2);
  assert_eq!(round.score(), 20);
  assert_eq!(round.term_options().len(), 2);
}

#[test]
fn three_mismatches_end_the_game() {
  let mut rng = StdRng::seed_from_u64(13);
  let mut round = two_pair_round(&mut rng);

  round.select_term("Bull Market");
  assert_eq!(
    round.select_definition("prices falling"),
    MatchEvent::Mismatch { hearts_left: 2 }
  );

  round.select_term("Bull Market");
  assert_eq!(
    round.select_definition("prices falling"),
    MatchEvent::Mismatch { hearts_left: 1 }
  );

  round.select_term("Bull Market");
  assert_eq!(
    round.select_definition("prices falling"),
    MatchEvent::GameOver { score: 0 }
  );
  assert_eq!(round.hearts(), 0);

  // dead rounds stay dead until restarted
  assert_eq!(round.select_term("Bear Market"), MatchEvent::GameOver { score: 0 });

  round.restart(&mut rng);
  assert_eq!(round.hearts(), STARTING_HEARTS);
  assert_eq!(round.score(), 0);
  assert_eq!(round.level(), 1);
}

#[test]
fn mismatch_after_a_match_keeps_the_score() {
  let mut rng = StdRng::seed_from_u64(17);
  let mut round = two_pair_round(&mut rng);

  round.select_term("Bull Market");
  round.select_definition("prices rising");

  round.select_term("Bear Market");
  // only "prices falling" is left, so force the mismatch via a stale pick
  assert_eq!(round.select_definition("prices rising"), MatchEvent::Ignored);

  assert_eq!(round.score(), 10);
  assert_eq!(round.hearts(), STARTING_HEARTS);
}

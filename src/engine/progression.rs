use chrono::{DateTime, Utc};

/// Experience awarded for a correct news-sentiment prediction.
pub const PREDICTION_XP: i64 = 50;
/// Each correct quiz answer is worth its question weight times this.
pub const QUIZ_XP_MULTIPLIER: i64 = 100;
/// Level-up threshold growth factor.
pub const LEVEL_GROWTH: f64 = 1.5;

/// Pure XP/level/streak state machine, applied after every XP-granting
/// event (quiz submission, news prediction).
#[derive(Debug, Clone, PartialEq)]
pub struct Progression {
  pub level: i64,
  pub experience: i64,
  pub next_level: i64,
  pub streak: i64,
  pub last_activity: Option<DateTime<Utc>>,
}

impl Progression {
  /// Applies an experience delta and at most ONE level-up, even when the
  /// delta overshoots several thresholds. Intentionally a single check, not
  /// a loop; intermediate levels are skipped on overshoot. Returns whether a
  /// level-up happened.
  pub fn award(&mut self, xp: i64) -> bool {
    self.experience += xp;

    if self.experience >= self.next_level {
      self.level += 1;
      self.next_level = (self.next_level as f64 * LEVEL_GROWTH).round() as i64;
      true
    } else {
      false
    }
  }

  /// Daily streak transition: one whole day since the last activity extends
  /// the streak, a longer gap resets it to 1, a same-day repeat leaves it
  /// untouched. A user with no prior activity counts as last active at the
  /// epoch, so the first event always sets the streak to 1.
  pub fn touch_streak(&mut self, now: DateTime<Utc>) {
    let last = self.last_activity.unwrap_or(DateTime::UNIX_EPOCH);
    let day_diff = (now - last).num_days();

    if day_diff == 1 {
      self.streak += 1;
    } else if day_diff > 1 {
      self.streak = 1;
    }

    self.last_activity = Some(now);
  }
}

use rand::seq::SliceRandom;
use rand::Rng;

pub const STARTING_HEARTS: u8 = 3;
pub const MATCH_SCORE: i64 = 10;

/// Built-in term/definition table for the matching mini-game.
pub const STOCK_TERMS: [(&str, &str); 8] = [
  ("Bull Market", "A market in which share prices are rising"),
  ("Bear Market", "A market in which share prices are falling"),
  ("Dividend", "A portion of company profits paid to shareholders"),
  ("Blue Chip", "Shares in large, well-established companies"),
  ("IPO", "Initial Public Offering when a company first sells stock"),
  ("Volume", "Number of shares traded during a given period"),
  ("Volatility", "Measure of price fluctuations of a security"),
  ("Market Cap", "Total value of a company's outstanding shares"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchEvent {
  /// One side selected, waiting for the other.
  Pending,
  /// A true pair; both options are consumed and never re-offered.
  Matched { score: i64 },
  /// The last pair of the round was matched.
  RoundComplete { score: i64 },
  /// Wrong pairing; one heart lost.
  Mismatch { hearts_left: u8 },
  /// Hearts exhausted; the round ends with the accumulated score.
  GameOver { score: i64 },
  /// Selection of a consumed or unknown option; no state change.
  Ignored,
}

/// Round state for the term-matching mini-game. Terms and definitions are
/// dealt from the pair table and shuffled independently; selecting a term
/// then a definition (or vice versa) resolves the attempt.
pub struct MatchRound {
  terms: Vec<(String, String)>,
  term_options: Vec<String>,
  definition_options: Vec<String>,
  selected_term: Option<String>,
  selected_definition: Option<String>,
  score: i64,
  hearts: u8,
  level: i64,
}

impl MatchRound {
  pub fn new<R: Rng>(rng: &mut R) -> Self {
    let terms = STOCK_TERMS
      .iter()
      .map(|(t, d)| (t.to_string(), d.to_string()))
      .collect();
    Self::with_terms(terms, rng)
  }

  pub fn with_terms<R: Rng>(terms: Vec<(String, String)>, rng: &mut R) -> Self {
    let mut round = MatchRound {
      terms,
      term_options: Vec::new(),
      definition_options: Vec::new(),
      selected_term: None,
      selected_definition: None,
      score: 0,
      hearts: STARTING_HEARTS,
      level: 1,
    };
    round.deal(rng);
    round
  }

  // 2 pairs at level 1, then one more per level, capped by the table size.
  fn deal<R: Rng>(&mut self, rng: &mut R) {
    let pairs_count = (self.level + 1).max(2).min(self.terms.len() as i64) as usize;

    let mut pool = self.terms.clone();
    pool.shuffle(rng);
    pool.truncate(pairs_count);

    let mut terms: Vec<String> = pool.iter().map(|(t, _)| t.clone()).collect();
    let mut definitions: Vec<String> = pool.iter().map(|(_, d)| d.clone()).collect();
    terms.shuffle(rng);
    definitions.shuffle(rng);

    self.term_options = terms;
    self.definition_options = definitions;
    self.selected_term = None;
    self.selected_definition = None;
  }

  pub fn select_term(&mut self, term: &str) -> MatchEvent {
    if self.hearts == 0 {
      return MatchEvent::GameOver { score: self.score };
    }
    if !self.term_options.iter().any(|t| t == term) {
      return MatchEvent::Ignored;
    }

    self.selected_term = Some(term.to_string());
    self.try_resolve()
  }

  pub fn select_definition(&mut self, definition: &str) -> MatchEvent {
    if self.hearts == 0 {
      return MatchEvent::GameOver { score: self.score };
    }
    if !self.definition_options.iter().any(|d| d == definition) {
      return MatchEvent::Ignored;
    }

    self.selected_definition = Some(definition.to_string());
    self.try_resolve()
  }

  fn try_resolve(&mut self) -> MatchEvent {
    let (Some(term), Some(definition)) =
      (self.selected_term.clone(), self.selected_definition.clone())
    else {
      return MatchEvent::Pending;
    };
    self.selected_term = None;
    self.selected_definition = None;

    let is_pair = self.terms.iter().any(|(t, d)| *t == term && *d == definition);

    if is_pair {
      self.score += MATCH_SCORE;
      self.term_options.retain(|t| *t != term);
      self.definition_options.retain(|d| *d != definition);

      if self.term_options.is_empty() {
        MatchEvent::RoundComplete { score: self.score }
      } else {
        MatchEvent::Matched { score: self.score }
      }
    } else {
      self.hearts -= 1;
      if self.hearts == 0 {
        MatchEvent::GameOver { score: self.score }
      } else {
        MatchEvent::Mismatch { hearts_left: self.hearts }
      }
    }
  }

  /// Advances to the next level and redeals after a completed round.
  pub fn next_round<R: Rng>(&mut self, rng: &mut R) {
    self.level += 1;
    self.deal(rng);
  }

  /// Fresh game: score, hearts and level all reset.
  pub fn restart<R: Rng>(&mut self, rng: &mut R) {
    self.score = 0;
    self.hearts = STARTING_HEARTS;
    self.level = 1;
    self.deal(rng);
  }

  pub fn score(&self) -> i64 {
    self.score
  }

  pub fn hearts(&self) -> u8 {
    self.hearts
  }

  pub fn level(&self) -> i64 {
    self.level
  }

  pub fn term_options(&self) -> &[String] {
    &self.term_options
  }

  pub fn definition_options(&self) -> &[String] {
    &self.definition_options
  }

  /// Ground-truth definition for a term in the table.
  pub fn definition_of(&self, term: &str) -> Option<&str> {
    self
      .terms
      .iter()
      .find(|(t, _)| t == term)
      .map(|(_, d)| d.as_str())
  }
}

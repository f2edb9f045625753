use serde::{Deserialize, Serialize};

use crate::srs::{Quality, ReviewState};

/// One graded review and the schedule it produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewLog {
  pub id: i64,
  pub card_id: i64,
  pub quality: u8,
  /// Epoch ms
  pub reviewed_at: i64,
  #[serde(flatten)]
  pub state: ReviewState,
}

impl ReviewLog {
  pub fn new(card_id: i64, quality: Quality, reviewed_at: i64, state: ReviewState) -> Self {
    Self {
      id: 0,
      card_id,
      quality: quality.value(),
      reviewed_at,
      state,
    }
  }

  pub fn is_correct(&self) -> bool {
    self.quality >= crate::srs::sm2::PASSING_QUALITY
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::srs::initialize_state;

  #[test]
  fn test_review_log_correctness() {
    let state = initialize_state(0);
    let pass = ReviewLog::new(1, Quality::new(3).unwrap(), 0, state);
    let fail = ReviewLog::new(1, Quality::new(2).unwrap(), 0, state);
    assert!(pass.is_correct());
    assert!(!fail.is_correct());
  }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::srs::{initialize_state, ReviewState};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flashcard {
  pub id: i64,
  pub library_id: i64,
  pub front: String,
  pub back: String,
  #[serde(flatten)]
  pub review: ReviewState,
  /// Bumped on every scheduling write, used to detect stale reviews
  pub version: i64,

  // Stats
  pub total_reviews: i64,
  pub correct_reviews: i64,
  pub created_at: DateTime<Utc>,
}

impl Flashcard {
  /// New card, due immediately at `now` (epoch ms).
  pub fn new(library_id: i64, sides: CardSides, now: i64) -> Self {
    Self {
      id: 0,
      library_id,
      front: sides.front,
      back: sides.back,
      review: initialize_state(now),
      version: 0,
      total_reviews: 0,
      correct_reviews: 0,
      created_at: DateTime::from_timestamp_millis(now).unwrap_or_else(Utc::now),
    }
  }
}

/// Trimmed, non-empty front and back text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSides {
  pub front: String,
  pub back: String,
}

impl CardSides {
  pub fn parse(front: &str, back: &str) -> Option<Self> {
    let front = front.trim();
    let back = back.trim();
    if front.is_empty() || back.is_empty() {
      return None;
    }
    Some(Self {
      front: front.to_string(),
      back: back.to_string(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_card_new_defaults() {
    let sides = CardSides::parse("hola", "hello").unwrap();
    let card = Flashcard::new(7, sides, 1_000);

    assert_eq!(card.id, 0);
    assert_eq!(card.library_id, 7);
    assert_eq!(card.front, "hola");
    assert_eq!(card.back, "hello");
    assert!((card.review.easiness - 2.5).abs() < f64::EPSILON);
    assert_eq!(card.review.interval, 0);
    assert_eq!(card.review.repetition, 0);
    assert_eq!(card.review.due_at, 1_000);
    assert_eq!(card.version, 0);
    assert_eq!(card.total_reviews, 0);
    assert_eq!(card.created_at.timestamp_millis(), 1_000);
  }

  #[test]
  fn test_sides_trimmed() {
    let sides = CardSides::parse("  front ", "\tback\n").unwrap();
    assert_eq!(sides.front, "front");
    assert_eq!(sides.back, "back");
  }

  #[test]
  fn test_sides_reject_blank() {
    assert!(CardSides::parse("", "back").is_none());
    assert!(CardSides::parse("front", "   ").is_none());
  }

  #[test]
  fn test_card_serializes_flat_schedule() {
    let card = Flashcard::new(1, CardSides::parse("a", "b").unwrap(), 5);
    let json = serde_json::to_value(&card).unwrap();
    assert_eq!(json["easiness"], 2.5);
    assert_eq!(json["due_at"], 5);
    assert!(json.get("review").is_none());
  }
}

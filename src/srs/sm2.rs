//! SM-2 review scheduler.
//!
//! `review` is a pure function of the previous [`ReviewState`], a validated
//! [`Quality`] grade and a reference time in epoch milliseconds. Callers
//! without a clock of their own pass [`now_millis`].

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const INITIAL_EASINESS: f64 = 2.5;
pub const MIN_EASINESS: f64 = 1.3;
pub const PASSING_QUALITY: u8 = 3;
pub const MAX_QUALITY: u8 = 5;
pub const MS_PER_DAY: i64 = 86_400_000;
/// Longest gap between reviews, about a century.
pub const MAX_INTERVAL_DAYS: i64 = 36_500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReviewError {
  #[error("quality must be between 0 and 5, got {0}")]
  QualityOutOfRange(i64),
}

/// Recall grade, 0 (blackout) to 5 (perfect).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quality(u8);

impl Quality {
  pub fn new(value: u8) -> Result<Self, ReviewError> {
    if value > MAX_QUALITY {
      return Err(ReviewError::QualityOutOfRange(value as i64));
    }
    Ok(Self(value))
  }

  pub fn value(self) -> u8 {
    self.0
  }

  pub fn is_passing(self) -> bool {
    self.0 >= PASSING_QUALITY
  }
}

impl TryFrom<i64> for Quality {
  type Error = ReviewError;

  fn try_from(value: i64) -> Result<Self, Self::Error> {
    u8::try_from(value)
      .map_err(|_| ReviewError::QualityOutOfRange(value))
      .and_then(Quality::new)
  }
}

/// Scheduling state of one card for one learner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReviewState {
  pub easiness: f64,
  /// Days until the next review.
  pub interval: i64,
  /// Consecutive passing reviews since the last failure.
  pub repetition: i64,
  /// Epoch milliseconds.
  pub due_at: i64,
}

pub fn now_millis() -> i64 {
  Utc::now().timestamp_millis()
}

pub fn initialize_state(now: i64) -> ReviewState {
  ReviewState {
    easiness: INITIAL_EASINESS,
    interval: 0,
    repetition: 0,
    due_at: now,
  }
}

/// Next schedule after grading `previous` with `quality` at `now`.
///
/// Intervals are capped at [`MAX_INTERVAL_DAYS`], so `due_at` only saturates
/// when `now` itself is near `i64::MAX`.
pub fn review(previous: &ReviewState, quality: Quality, now: i64) -> ReviewState {
  let (easiness, interval, repetition) = if quality.is_passing() {
    let interval = match previous.repetition {
      0 => 1,
      1 => 6,
      // `as` saturates, the cap keeps interval * MS_PER_DAY in range
      _ => ((previous.interval as f64 * previous.easiness).round() as i64).min(MAX_INTERVAL_DAYS),
    };

    // EF' = EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02))
    let miss = (MAX_QUALITY - quality.value()) as f64;
    let easiness = (previous.easiness + (0.1 - miss * (0.08 + miss * 0.02))).max(MIN_EASINESS);

    (easiness, interval, previous.repetition.saturating_add(1))
  } else {
    // Streak broken: show again tomorrow, ease untouched
    (previous.easiness, 1, 0)
  };

  ReviewState {
    easiness,
    interval,
    repetition,
    due_at: now.saturating_add(interval.saturating_mul(MS_PER_DAY)),
  }
}

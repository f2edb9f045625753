//! Study flow: due card selection and graded reviews.
//!
//! A review is a read-modify-write of the card's schedule. The write is a
//! compare-and-swap on the card version, so two reviews computed from the
//! same stale state cannot both land.

use rusqlite::Connection;

use crate::db;
use crate::domain::{Flashcard, ReviewLog};
use crate::error::{AppError, AppResult};
use crate::srs::{self, Quality};

/// Due cards of a library, most overdue first
pub fn due_cards(conn: &Connection, library_id: i64, now: i64, limit: usize) -> AppResult<Vec<Flashcard>> {
  if db::get_library(conn, library_id)?.is_none() {
    return Err(AppError::NotFound(format!("library {}", library_id)));
  }
  Ok(db::get_due_cards(conn, library_id, now, limit)?)
}

/// Grade a card and persist its next schedule.
///
/// `expected_version` is the card version the caller displayed; a mismatch
/// means the card was reviewed elsewhere in the meantime.
pub fn review_card(
  conn: &Connection,
  card_id: i64,
  quality: Quality,
  expected_version: Option<i64>,
  now: i64,
) -> AppResult<Flashcard> {
  let tx = conn.unchecked_transaction()?;

  let card = db::get_card_by_id(&tx, card_id)?
    .ok_or_else(|| AppError::NotFound(format!("card {}", card_id)))?;

  if let Some(expected) = expected_version {
    if expected != card.version {
      return Err(stale(card_id, expected));
    }
  }

  let next = srs::review(&card.review, quality, now);
  let log = ReviewLog::new(card_id, quality, now, next);
  if !db::apply_review(&tx, card_id, card.version, &next, log.is_correct())? {
    return Err(stale(card_id, card.version));
  }
  db::insert_review_log(&tx, &log)?;
  tx.commit()?;

  tracing::debug!(
    card_id,
    quality = quality.value(),
    interval = next.interval,
    repetition = next.repetition,
    easiness = next.easiness,
    "Scheduled next review"
  );

  Ok(Flashcard {
    review: next,
    version: card.version + 1,
    total_reviews: card.total_reviews + 1,
    correct_reviews: card.correct_reviews + i64::from(log.is_correct()),
    ..card
  })
}

fn stale(card_id: i64, expected: i64) -> AppError {
  tracing::warn!(card_id, expected, "Rejected review of stale card state");
  AppError::Conflict(format!(
    "card {} changed since version {}, reload before reviewing",
    card_id, expected
  ))
}

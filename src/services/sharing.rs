//! Library sharing via share codes.
//!
//! Sharing hands out a code; importing a code copies the card text into a
//! new library owned by the importer. Schedules are per learner, so copied
//! cards always start fresh.

use rand::Rng;
use rusqlite::Connection;

use crate::db;
use crate::domain::{CardSides, Flashcard, Library};
use crate::error::{AppError, AppResult};

pub const SHARE_CODE_LEN: usize = 10;

/// Attempts before giving up on finding an unused code
const MAX_CODE_ATTEMPTS: usize = 8;

pub fn generate_share_code() -> String {
  let mut rng = rand::rng();
  (0..SHARE_CODE_LEN)
    .map(|_| {
      let idx = rng.random_range(0..36u8);
      if idx < 10 {
        (b'0' + idx) as char
      } else {
        (b'a' + idx - 10) as char
      }
    })
    .collect()
}

/// Share code of the library, created on first call
pub fn share_library(conn: &Connection, library_id: i64) -> AppResult<String> {
  let library = db::get_library(conn, library_id)?
    .ok_or_else(|| AppError::NotFound(format!("library {}", library_id)))?;

  if let Some(code) = library.share_code {
    return Ok(code);
  }

  for _ in 0..MAX_CODE_ATTEMPTS {
    let code = generate_share_code();
    if db::get_library_by_share_code(conn, &code)?.is_none() {
      db::set_share_code(conn, library_id, &code)?;
      tracing::info!(library_id, "Shared library");
      return Ok(code);
    }
  }

  Err(AppError::Conflict("could not allocate a share code".to_string()))
}

/// Copy a shared library into a new one owned by `owner`, cards due at `now`
pub fn import_shared(conn: &Connection, code: &str, owner: &str, now: i64) -> AppResult<Library> {
  let source = db::get_library_by_share_code(conn, code.trim())?
    .ok_or_else(|| AppError::NotFound("shared library".to_string()))?;

  let tx = conn.unchecked_transaction()?;
  let mut copy = Library::new(source.name.clone(), source.description.clone(), owner.to_string());
  copy.id = db::insert_library(&tx, &copy)?;

  let cards = db::get_library_cards(&tx, source.id)?;
  for card in &cards {
    let sides = CardSides {
      front: card.front.clone(),
      back: card.back.clone(),
    };
    db::insert_card(&tx, &Flashcard::new(copy.id, sides, now))?;
  }
  tx.commit()?;

  tracing::info!(
    source_id = source.id,
    library_id = copy.id,
    cards = cards.len(),
    "Imported shared library"
  );
  Ok(copy)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::srs::{initialize_state, Quality};
  use crate::testing::TestEnv;

  #[test]
  fn test_share_code_format() {
    let code = generate_share_code();
    assert_eq!(code.len(), SHARE_CODE_LEN);
    assert!(code.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
  }

  #[test]
  fn test_share_is_stable() {
    let env = TestEnv::new().unwrap();
    let lib = env.library("ana", "Spanish");

    let first = share_library(&env.conn, lib).unwrap();
    let second = share_library(&env.conn, lib).unwrap();
    assert_eq!(first, second);
  }

  #[test]
  fn test_share_missing_library() {
    let env = TestEnv::new().unwrap();
    assert!(matches!(share_library(&env.conn, 3), Err(AppError::NotFound(_))));
  }

  #[test]
  fn test_import_copies_text_with_fresh_schedule() {
    let env = TestEnv::new().unwrap();
    let lib = env.library("ana", "Spanish");
    let card = env.card(lib, "sol", "sun", 0);
    crate::services::study::review_card(&env.conn, card, Quality::new(5).unwrap(), None, 0).unwrap();

    let code = share_library(&env.conn, lib).unwrap();
    let copy = import_shared(&env.conn, &code, "ben", 7_000).unwrap();
    assert_ne!(copy.id, lib);
    assert_eq!(copy.owner, "ben");
    assert_eq!(copy.name, "Spanish");
    assert!(copy.share_code.is_none());

    let cards = db::get_library_cards(&env.conn, copy.id).unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].front, "sol");
    assert_eq!(cards[0].review, initialize_state(7_000));

    // Original schedule untouched
    let original = db::get_card_by_id(&env.conn, card).unwrap().unwrap();
    assert_eq!(original.review.repetition, 1);
  }

  #[test]
  fn test_import_unknown_code() {
    let env = TestEnv::new().unwrap();
    assert!(matches!(import_shared(&env.conn, "zzz", "ben", 0), Err(AppError::NotFound(_))));
  }
}

//! Card CRUD, due queries and scheduling writes

use rusqlite::{params, Connection, OptionalExtension, Result};

use crate::domain::{Flashcard, LibraryStats};
use crate::srs::ReviewState;

use super::parse_timestamp;

const CARD_COLUMNS: &str = "id, library_id, front, back, easiness, interval_days, repetition, \
                            due_at, version, total_reviews, correct_reviews, created_at";

pub fn insert_card(conn: &Connection, card: &Flashcard) -> Result<i64> {
    conn.execute(
        r#"
    INSERT INTO cards (library_id, front, back, easiness, interval_days, repetition, due_at,
                       version, total_reviews, correct_reviews, created_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
    "#,
        params![
            card.library_id,
            card.front,
            card.back,
            card.review.easiness,
            card.review.interval,
            card.review.repetition,
            card.review.due_at,
            card.version,
            card.total_reviews,
            card.correct_reviews,
            card.created_at.to_rfc3339(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_card_by_id(conn: &Connection, id: i64) -> Result<Option<Flashcard>> {
    conn.query_row(
        &format!("SELECT {} FROM cards WHERE id = ?1", CARD_COLUMNS),
        params![id],
        row_to_card,
    )
    .optional()
}

pub fn get_library_cards(conn: &Connection, library_id: i64) -> Result<Vec<Flashcard>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM cards WHERE library_id = ?1 ORDER BY id ASC",
        CARD_COLUMNS
    ))?;

    let cards = stmt
        .query_map(params![library_id], row_to_card)?
        .collect::<Result<Vec<_>>>()?;
    Ok(cards)
}

/// Cards with `due_at <= now`, most overdue first
pub fn get_due_cards(
    conn: &Connection,
    library_id: i64,
    now: i64,
    limit: usize,
) -> Result<Vec<Flashcard>> {
    let mut stmt = conn.prepare(&format!(
        r#"
    SELECT {}
    FROM cards
    WHERE library_id = ?1 AND due_at <= ?2
    ORDER BY due_at ASC, id ASC
    LIMIT ?3
    "#,
        CARD_COLUMNS
    ))?;

    let cards = stmt
        .query_map(params![library_id, now, limit as i64], row_to_card)?
        .collect::<Result<Vec<_>>>()?;
    Ok(cards)
}

pub fn get_library_stats(conn: &Connection, library_id: i64, now: i64) -> Result<LibraryStats> {
    conn.query_row(
        r#"
    SELECT COUNT(*),
           COALESCE(SUM(CASE WHEN due_at <= ?2 THEN 1 ELSE 0 END), 0),
           COALESCE(SUM(CASE WHEN repetition > 0 THEN 1 ELSE 0 END), 0),
           MIN(CASE WHEN due_at > ?2 THEN due_at END)
    FROM cards WHERE library_id = ?1
    "#,
        params![library_id, now],
        |row| {
            Ok(LibraryStats {
                total_cards: row.get(0)?,
                due_now: row.get(1)?,
                learned: row.get(2)?,
                next_due_at: row.get(3)?,
            })
        },
    )
}

/// Edit card text; scheduling state is left as is
pub fn update_card_sides(conn: &Connection, id: i64, front: &str, back: &str) -> Result<bool> {
    let updated = conn.execute(
        "UPDATE cards SET front = ?1, back = ?2 WHERE id = ?3",
        params![front, back, id],
    )?;
    Ok(updated > 0)
}

pub fn delete_card(conn: &Connection, id: i64) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM cards WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}

/// Write a reviewed schedule if the row is still at `expected_version`.
///
/// Returns false when another review got there first.
pub fn apply_review(
    conn: &Connection,
    id: i64,
    expected_version: i64,
    state: &ReviewState,
    is_correct: bool,
) -> Result<bool> {
    let updated = conn.execute(
        r#"
    UPDATE cards
    SET easiness = ?1, interval_days = ?2, repetition = ?3, due_at = ?4,
        version = version + 1,
        total_reviews = total_reviews + 1,
        correct_reviews = correct_reviews + ?5
    WHERE id = ?6 AND version = ?7
    "#,
        params![
            state.easiness,
            state.interval,
            state.repetition,
            state.due_at,
            if is_correct { 1 } else { 0 },
            id,
            expected_version,
        ],
    )?;
    Ok(updated > 0)
}

/// Make every card in the library due at `now`
pub fn make_all_due(conn: &Connection, library_id: i64, now: i64) -> Result<usize> {
    conn.execute(
        "UPDATE cards SET due_at = ?1, version = version + 1 WHERE library_id = ?2",
        params![now, library_id],
    )
}

pub(crate) fn row_to_card(row: &rusqlite::Row) -> Result<Flashcard> {
    let created_at: String = row.get(11)?;

    Ok(Flashcard {
        id: row.get(0)?,
        library_id: row.get(1)?,
        front: row.get(2)?,
        back: row.get(3)?,
        review: ReviewState {
            easiness: row.get(4)?,
            interval: row.get(5)?,
            repetition: row.get(6)?,
            due_at: row.get(7)?,
        },
        version: row.get(8)?,
        total_reviews: row.get(9)?,
        correct_reviews: row.get(10)?,
        created_at: parse_timestamp(&created_at),
    })
}

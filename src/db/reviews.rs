//! Review history

use rusqlite::{params, Connection, Result};

use crate::domain::ReviewLog;
use crate::srs::ReviewState;

pub fn insert_review_log(conn: &Connection, log: &ReviewLog) -> Result<i64> {
    conn.execute(
        r#"
    INSERT INTO review_logs (card_id, quality, reviewed_at, easiness, interval_days, repetition, due_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
    "#,
        params![
            log.card_id,
            log.quality,
            log.reviewed_at,
            log.state.easiness,
            log.state.interval,
            log.state.repetition,
            log.state.due_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Reviews of a card, newest first
pub fn get_card_reviews(conn: &Connection, card_id: i64) -> Result<Vec<ReviewLog>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT id, card_id, quality, reviewed_at, easiness, interval_days, repetition, due_at
    FROM review_logs
    WHERE card_id = ?1
    ORDER BY reviewed_at DESC, id DESC
    "#,
    )?;

    let logs = stmt
        .query_map(params![card_id], |row| {
            Ok(ReviewLog {
                id: row.get(0)?,
                card_id: row.get(1)?,
                quality: row.get(2)?,
                reviewed_at: row.get(3)?,
                state: ReviewState {
                    easiness: row.get(4)?,
                    interval: row.get(5)?,
                    repetition: row.get(6)?,
                    due_at: row.get(7)?,
                },
            })
        })?
        .collect::<Result<Vec<_>>>()?;

    Ok(logs)
}

//! Test utilities for database setup.
//!
//! Opens a file-backed database in a temporary directory and runs the real
//! schema, so tests exercise the same migrations as production.

use rusqlite::Connection;
use tempfile::TempDir;

use crate::db;
use crate::domain::{CardSides, Flashcard, Library};

pub struct TestEnv {
    /// Temporary directory (kept alive for database file persistence)
    pub temp: TempDir,
    pub conn: Connection,
}

impl TestEnv {
    pub fn new() -> rusqlite::Result<Self> {
        let temp =
            TempDir::new().map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let conn = Connection::open(temp.path().join("cardwise.db"))?;
        db::run_migrations(&conn)?;

        Ok(Self { temp, conn })
    }

    /// Insert a library owned by `owner` and return its id
    pub fn library(&self, owner: &str, name: &str) -> i64 {
        let library = Library::new(name.to_string(), None, owner.to_string());
        db::insert_library(&self.conn, &library).expect("insert library")
    }

    /// Insert a card created at `now` (epoch ms) and return its id
    pub fn card(&self, library_id: i64, front: &str, back: &str, now: i64) -> i64 {
        let sides = CardSides::parse(front, back).expect("non-empty sides");
        db::insert_card(&self.conn, &Flashcard::new(library_id, sides, now)).expect("insert card")
    }
}

pub mod cards;
pub mod libraries;
pub mod reviews;
pub mod schema;

use rusqlite::{Connection, Result};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

// Re-export all public items from submodules
pub use cards::*;
pub use libraries::*;
pub use reviews::*;
pub use schema::run_migrations;

pub type DbPool = Arc<Mutex<Connection>>;

/// Extension trait for logging errors before discarding them
pub trait LogOnError<T> {
    /// Log the error at warn level and return None
    fn log_warn(self, context: &str) -> Option<T>;
    /// Log the error at warn level and return the default
    fn log_warn_default(self, context: &str) -> T
    where
        T: Default;
}

impl<T, E: std::fmt::Display> LogOnError<T> for std::result::Result<T, E> {
    fn log_warn(self, context: &str) -> Option<T> {
        match self {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("{}: {}", context, e);
                None
            }
        }
    }

    fn log_warn_default(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("{}: {}", context, e);
                T::default()
            }
        }
    }
}

/// Error returned when database lock cannot be acquired
#[derive(Debug)]
pub struct DbLockError;

impl std::fmt::Display for DbLockError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "Database unavailable")
  }
}

impl std::error::Error for DbLockError {}

/// Try to acquire the database lock, returning an error if poisoned
pub fn try_lock(pool: &DbPool) -> std::result::Result<MutexGuard<'_, Connection>, DbLockError> {
  pool.lock().map_err(|_: PoisonError<_>| {
    tracing::error!("Database mutex poisoned - a thread panicked while holding the lock");
    DbLockError
  })
}

pub fn init_db(path: &Path) -> Result<DbPool> {
  if let Some(parent) = path.parent() {
    if let Err(e) = std::fs::create_dir_all(parent) {
      tracing::warn!("Could not create database directory {}: {}", parent.display(), e);
    }
  }

  let conn = Connection::open(path)?;
  run_migrations(&conn)?;
  Ok(Arc::new(Mutex::new(conn)))
}

/// Parse a stored RFC 3339 timestamp, falling back to now for unreadable rows
pub(crate) fn parse_timestamp(value: &str) -> chrono::DateTime<chrono::Utc> {
  chrono::DateTime::parse_from_rfc3339(value)
    .map(|dt| dt.with_timezone(&chrono::Utc))
    .log_warn(&format!("Unreadable stored timestamp {:?}", value))
    .unwrap_or_else(chrono::Utc::now)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_log_warn_passes_ok_through() {
    let ok: std::result::Result<i32, String> = Ok(3);
    assert_eq!(ok.log_warn("unused"), Some(3));

    let err: std::result::Result<i32, String> = Err("boom".to_string());
    assert_eq!(err.log_warn("Reading value"), None);
  }

  #[test]
  fn test_log_warn_default_on_error() {
    let err: std::result::Result<Vec<u8>, &str> = Err("boom");
    assert!(err.log_warn_default("Reading bytes").is_empty());
  }

  #[test]
  fn test_parse_timestamp() {
    let parsed = parse_timestamp("2024-03-01T12:00:00+02:00");
    assert_eq!(parsed.to_rfc3339(), "2024-03-01T10:00:00+00:00");
  }

  #[test]
  fn test_parse_timestamp_unreadable_falls_back_to_now() {
    let before = chrono::Utc::now();
    let parsed = parse_timestamp("yesterday-ish");
    assert!(parsed >= before);
    assert!(parsed <= chrono::Utc::now());
  }
}

//! Application error type and its HTTP mapping.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use thiserror::Error;

use crate::db::DbLockError;
use crate::srs::ReviewError;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("{0} not found")]
  NotFound(String),

  #[error("{0}")]
  BadRequest(String),

  #[error(transparent)]
  InvalidQuality(#[from] ReviewError),

  #[error("{0}")]
  Conflict(String),

  #[error("database error: {0}")]
  Database(#[from] rusqlite::Error),

  #[error(transparent)]
  Unavailable(#[from] DbLockError),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
  pub fn status(&self) -> StatusCode {
    match self {
      Self::NotFound(_) => StatusCode::NOT_FOUND,
      Self::BadRequest(_) | Self::InvalidQuality(_) => StatusCode::BAD_REQUEST,
      Self::Conflict(_) => StatusCode::CONFLICT,
      Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
      Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
  }
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!("{}", self);
    }
    (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_status_mapping() {
    assert_eq!(AppError::NotFound("card 1".into()).status(), StatusCode::NOT_FOUND);
    assert_eq!(
      AppError::from(ReviewError::QualityOutOfRange(9)).status(),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(AppError::Conflict("stale".into()).status(), StatusCode::CONFLICT);
    assert_eq!(AppError::from(DbLockError).status(), StatusCode::SERVICE_UNAVAILABLE);
  }

  #[test]
  fn test_messages() {
    assert_eq!(AppError::NotFound("library 3".into()).to_string(), "library 3 not found");
    assert_eq!(
      AppError::from(ReviewError::QualityOutOfRange(7)).to_string(),
      "quality must be between 0 and 5, got 7"
    );
  }
}

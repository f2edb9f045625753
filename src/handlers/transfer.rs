use axum::{
  extract::{Path, State},
  http::header,
  response::IntoResponse,
  Json,
};

use crate::db;
use crate::error::{AppError, AppResult};
use crate::services::csv_transfer::{self, ImportSummary};
use crate::srs;
use crate::state::AppState;

/// GET /api/libraries/{id}/export
pub async fn export_library(
  State(state): State<AppState>,
  Path(library_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
  let conn = db::try_lock(&state.db)?;
  if db::get_library(&conn, library_id)?.is_none() {
    return Err(AppError::NotFound(format!("library {}", library_id)));
  }
  let body = csv_transfer::export_csv(&db::get_library_cards(&conn, library_id)?);

  Ok((
    [
      (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
      (
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"library-{}.csv\"", library_id),
      ),
    ],
    body,
  ))
}

/// POST /api/libraries/{id}/import (CSV body)
pub async fn import_library(
  State(state): State<AppState>,
  Path(library_id): Path<i64>,
  body: String,
) -> AppResult<Json<ImportSummary>> {
  let conn = db::try_lock(&state.db)?;
  if db::get_library(&conn, library_id)?.is_none() {
    return Err(AppError::NotFound(format!("library {}", library_id)));
  }
  let summary = csv_transfer::import_csv(&conn, library_id, &body, srs::now_millis())?;
  Ok(Json(summary))
}

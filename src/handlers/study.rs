use axum::{
  extract::{Path, Query, State},
  Json,
};
use serde::{Deserialize, Serialize};

use crate::db;
use crate::domain::{Flashcard, ReviewLog};
use crate::error::{AppError, AppResult};
use crate::services::study;
use crate::srs::{self, Quality};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DueQuery {
  pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
  /// 0-5; range is checked here rather than by the JSON decoder
  pub quality: i64,
  /// Card version the grade was given against
  #[serde(default)]
  pub expected_version: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct MakeDueResponse {
  pub updated: usize,
}

/// GET /api/libraries/{id}/due?limit=
pub async fn due_cards(
  State(state): State<AppState>,
  Path(library_id): Path<i64>,
  Query(query): Query<DueQuery>,
) -> AppResult<Json<Vec<Flashcard>>> {
  let max = state.config.due_limit;
  let limit = query.limit.unwrap_or(max).min(max);

  let conn = db::try_lock(&state.db)?;
  Ok(Json(study::due_cards(&conn, library_id, srs::now_millis(), limit)?))
}

/// POST /api/libraries/{id}/make-due
pub async fn make_all_due(
  State(state): State<AppState>,
  Path(library_id): Path<i64>,
) -> AppResult<Json<MakeDueResponse>> {
  let conn = db::try_lock(&state.db)?;
  if db::get_library(&conn, library_id)?.is_none() {
    return Err(AppError::NotFound(format!("library {}", library_id)));
  }
  let updated = db::make_all_due(&conn, library_id, srs::now_millis())?;
  tracing::info!(library_id, updated, "Made all cards due");
  Ok(Json(MakeDueResponse { updated }))
}

/// POST /api/cards/{id}/review
pub async fn submit_review(
  State(state): State<AppState>,
  Path(card_id): Path<i64>,
  Json(request): Json<ReviewRequest>,
) -> AppResult<Json<Flashcard>> {
  let quality = Quality::try_from(request.quality)?;

  let conn = db::try_lock(&state.db)?;
  let card = study::review_card(
    &conn,
    card_id,
    quality,
    request.expected_version,
    srs::now_millis(),
  )?;
  Ok(Json(card))
}

/// GET /api/cards/{id}/reviews
pub async fn review_history(
  State(state): State<AppState>,
  Path(card_id): Path<i64>,
) -> AppResult<Json<Vec<ReviewLog>>> {
  let conn = db::try_lock(&state.db)?;
  if db::get_card_by_id(&conn, card_id)?.is_none() {
    return Err(AppError::NotFound(format!("card {}", card_id)));
  }
  Ok(Json(db::get_card_reviews(&conn, card_id)?))
}

use axum::{
  extract::{Path, State},
  http::StatusCode,
  Json,
};
use serde::Deserialize;

use crate::db;
use crate::domain::{CardSides, Flashcard};
use crate::error::{AppError, AppResult};
use crate::srs;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CardRequest {
  pub front: String,
  pub back: String,
}

impl CardRequest {
  fn sides(&self) -> AppResult<CardSides> {
    CardSides::parse(&self.front, &self.back)
      .ok_or_else(|| AppError::BadRequest("front and back must not be empty".to_string()))
  }
}

/// GET /api/libraries/{id}/cards
pub async fn list_cards(
  State(state): State<AppState>,
  Path(library_id): Path<i64>,
) -> AppResult<Json<Vec<Flashcard>>> {
  let conn = db::try_lock(&state.db)?;
  if db::get_library(&conn, library_id)?.is_none() {
    return Err(AppError::NotFound(format!("library {}", library_id)));
  }
  Ok(Json(db::get_library_cards(&conn, library_id)?))
}

/// POST /api/libraries/{id}/cards
pub async fn create_card(
  State(state): State<AppState>,
  Path(library_id): Path<i64>,
  Json(request): Json<CardRequest>,
) -> AppResult<(StatusCode, Json<Flashcard>)> {
  let sides = request.sides()?;

  let conn = db::try_lock(&state.db)?;
  if db::get_library(&conn, library_id)?.is_none() {
    return Err(AppError::NotFound(format!("library {}", library_id)));
  }

  let mut card = Flashcard::new(library_id, sides, srs::now_millis());
  card.id = db::insert_card(&conn, &card)?;
  Ok((StatusCode::CREATED, Json(card)))
}

/// PUT /api/cards/{id}
pub async fn update_card(
  State(state): State<AppState>,
  Path(id): Path<i64>,
  Json(request): Json<CardRequest>,
) -> AppResult<Json<Flashcard>> {
  let sides = request.sides()?;

  let conn = db::try_lock(&state.db)?;
  if !db::update_card_sides(&conn, id, &sides.front, &sides.back)? {
    return Err(AppError::NotFound(format!("card {}", id)));
  }
  db::get_card_by_id(&conn, id)?
    .map(Json)
    .ok_or_else(|| AppError::NotFound(format!("card {}", id)))
}

/// DELETE /api/cards/{id}
pub async fn delete_card(
  State(state): State<AppState>,
  Path(id): Path<i64>,
) -> AppResult<StatusCode> {
  let conn = db::try_lock(&state.db)?;
  if !db::delete_card(&conn, id)? {
    return Err(AppError::NotFound(format!("card {}", id)));
  }
  Ok(StatusCode::NO_CONTENT)
}

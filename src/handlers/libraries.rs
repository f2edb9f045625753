use axum::{
  extract::{Path, Query, State},
  http::StatusCode,
  Json,
};
use serde::{Deserialize, Serialize};

use crate::db;
use crate::domain::{Library, LibraryStats};
use crate::error::{AppError, AppResult};
use crate::services::sharing;
use crate::srs;
use crate::state::AppState;

use super::required;

#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
  pub owner: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateLibraryRequest {
  pub name: String,
  pub owner: String,
  #[serde(default)]
  pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateLibraryRequest {
  pub name: String,
  #[serde(default)]
  pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ShareResponse {
  pub share_code: String,
}

#[derive(Debug, Deserialize)]
pub struct ImportSharedRequest {
  pub share_code: String,
  pub owner: String,
}

fn not_found(id: i64) -> AppError {
  AppError::NotFound(format!("library {}", id))
}

/// Blank descriptions are stored as NULL
fn clean_description(description: Option<String>) -> Option<String> {
  description
    .map(|d| d.trim().to_string())
    .filter(|d| !d.is_empty())
}

/// GET /api/libraries?owner=
pub async fn list_libraries(
  State(state): State<AppState>,
  Query(query): Query<OwnerQuery>,
) -> AppResult<Json<Vec<Library>>> {
  let conn = db::try_lock(&state.db)?;
  Ok(Json(db::list_libraries(&conn, query.owner.trim())?))
}

/// POST /api/libraries
pub async fn create_library(
  State(state): State<AppState>,
  Json(request): Json<CreateLibraryRequest>,
) -> AppResult<(StatusCode, Json<Library>)> {
  let name = required(&request.name, "name")?;
  let owner = required(&request.owner, "owner")?;

  let mut library = Library::new(name, clean_description(request.description), owner);
  let conn = db::try_lock(&state.db)?;
  library.id = db::insert_library(&conn, &library)?;

  tracing::info!(library_id = library.id, owner = %library.owner, "Created library");
  Ok((StatusCode::CREATED, Json(library)))
}

/// GET /api/libraries/{id}
pub async fn get_library(
  State(state): State<AppState>,
  Path(id): Path<i64>,
) -> AppResult<Json<Library>> {
  let conn = db::try_lock(&state.db)?;
  db::get_library(&conn, id)?
    .map(Json)
    .ok_or_else(|| not_found(id))
}

/// PUT /api/libraries/{id}
pub async fn update_library(
  State(state): State<AppState>,
  Path(id): Path<i64>,
  Json(request): Json<UpdateLibraryRequest>,
) -> AppResult<Json<Library>> {
  let name = required(&request.name, "name")?;
  let description = clean_description(request.description);

  let conn = db::try_lock(&state.db)?;
  if !db::update_library(&conn, id, &name, description.as_deref())? {
    return Err(not_found(id));
  }
  db::get_library(&conn, id)?
    .map(Json)
    .ok_or_else(|| not_found(id))
}

/// DELETE /api/libraries/{id}
pub async fn delete_library(
  State(state): State<AppState>,
  Path(id): Path<i64>,
) -> AppResult<StatusCode> {
  let conn = db::try_lock(&state.db)?;
  if !db::delete_library(&conn, id)? {
    return Err(not_found(id));
  }
  tracing::info!(library_id = id, "Deleted library");
  Ok(StatusCode::NO_CONTENT)
}

/// GET /api/libraries/{id}/stats
pub async fn library_stats(
  State(state): State<AppState>,
  Path(id): Path<i64>,
) -> AppResult<Json<LibraryStats>> {
  let conn = db::try_lock(&state.db)?;
  if db::get_library(&conn, id)?.is_none() {
    return Err(not_found(id));
  }
  Ok(Json(db::get_library_stats(&conn, id, srs::now_millis())?))
}

/// POST /api/libraries/{id}/share
pub async fn share_library(
  State(state): State<AppState>,
  Path(id): Path<i64>,
) -> AppResult<Json<ShareResponse>> {
  let conn = db::try_lock(&state.db)?;
  let share_code = sharing::share_library(&conn, id)?;
  Ok(Json(ShareResponse { share_code }))
}

/// POST /api/shared/import
pub async fn import_shared(
  State(state): State<AppState>,
  Json(request): Json<ImportSharedRequest>,
) -> AppResult<(StatusCode, Json<Library>)> {
  let owner = required(&request.owner, "owner")?;
  let conn = db::try_lock(&state.db)?;
  let library = sharing::import_shared(&conn, &request.share_code, &owner, srs::now_millis())?;
  Ok((StatusCode::CREATED, Json(library)))
}

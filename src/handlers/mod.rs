pub mod cards;
pub mod libraries;
pub mod study;
pub mod transfer;

use axum::{
  routing::{get, post, put},
  Json, Router,
};
use tower_http::trace::TraceLayer;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/api/health", get(health))
    .route(
      "/api/libraries",
      get(libraries::list_libraries).post(libraries::create_library),
    )
    .route(
      "/api/libraries/{id}",
      get(libraries::get_library)
        .put(libraries::update_library)
        .delete(libraries::delete_library),
    )
    .route("/api/libraries/{id}/stats", get(libraries::library_stats))
    .route("/api/libraries/{id}/share", post(libraries::share_library))
    .route("/api/shared/import", post(libraries::import_shared))
    .route(
      "/api/libraries/{id}/cards",
      get(cards::list_cards).post(cards::create_card),
    )
    .route("/api/cards/{id}", put(cards::update_card).delete(cards::delete_card))
    .route("/api/libraries/{id}/due", get(study::due_cards))
    .route("/api/libraries/{id}/make-due", post(study::make_all_due))
    .route("/api/cards/{id}/review", post(study::submit_review))
    .route("/api/cards/{id}/reviews", get(study::review_history))
    .route("/api/libraries/{id}/export", get(transfer::export_library))
    .route("/api/libraries/{id}/import", post(transfer::import_library))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

pub async fn health() -> Json<serde_json::Value> {
  Json(serde_json::json!({ "status": "ok" }))
}

/// Trimmed value, or a 400 naming the empty field
fn required(value: &str, field: &str) -> AppResult<String> {
  let value = value.trim();
  if value.is_empty() {
    return Err(AppError::BadRequest(format!("{} must not be empty", field)));
  }
  Ok(value.to_string())
}

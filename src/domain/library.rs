use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Library {
  pub id: i64,
  pub name: String,
  pub description: Option<String>,
  pub owner: String,
  /// Set once the library has been shared
  pub share_code: Option<String>,
  pub created_at: DateTime<Utc>,
}

impl Library {
  pub fn new(name: String, description: Option<String>, owner: String) -> Self {
    Self {
      id: 0,
      name,
      description,
      owner,
      share_code: None,
      created_at: Utc::now(),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryStats {
  pub total_cards: i64,
  pub due_now: i64,
  /// Cards with an unbroken streak of at least one passing review
  pub learned: i64,
  /// Earliest due time among cards not yet due (epoch ms)
  pub next_due_at: Option<i64>,
}

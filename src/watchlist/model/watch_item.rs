use chrono::{DateTime, Utc};
use nanoid::nanoid;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WatchStatus {
  Planned,
  #[default]
  Watching,
  Completed,
  Dropped,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WatchItem {
  pub id: String,
  pub user_id: String,
  pub movie_id: String,
  pub status: WatchStatus,
  pub notes: Option<String>,
  pub rating: Option<f32>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl WatchItem {
  pub fn new(
    user_id: String,
    movie_id: String,
    status: WatchStatus,
    notes: Option<String>,
    rating: Option<f32>,
  ) -> Self {
    let now = Utc::now();
    Self {
      id: nanoid!(),
      user_id,
      movie_id,
      status,
      notes,
      rating,
      created_at: now,
      updated_at: now,
    }
  }
}

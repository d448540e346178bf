use serde::Deserialize;
use utoipa::ToSchema;
use validator_derive::Validate;

use crate::watchlist::model::watch_item::WatchStatus;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddWatchItemDto {
  #[serde(default)]
  #[validate(length(min = 1, message = "movieId is required"))]
  pub movie_id: String,
  pub status: Option<WatchStatus>,
  #[validate(length(max = 2000, message = "Notes cannot exceed 2000 characters"))]
  pub notes: Option<String>,
  #[validate(range(min = 0.0, max = 10.0, message = "Rating must be between 0 and 10"))]
  pub rating: Option<f32>,
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
  pub id: String,
  pub title: String,
  pub overview: String,
  pub release_date: NaiveDate,
  pub poster_path: Option<String>,
  pub rating: f32,
  pub genres: Vec<String>,
  /// Owner of the record.
  pub user_id: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

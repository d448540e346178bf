use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use validator_derive::Validate;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovieDto {
  #[validate(length(min = 1, max = 200, message = "Title is required"))]
  pub title: String,
  #[validate(length(min = 1, message = "Overview is required"))]
  pub overview: String,
  pub release_date: NaiveDate,
  pub poster_path: Option<String>,
  #[validate(range(min = 0.0, max = 10.0, message = "Rating must be between 0 and 10"))]
  pub rating: Option<f32>,
  #[serde(default)]
  pub genres: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMovieDto {
  #[validate(length(min = 1, max = 200, message = "Title cannot be empty"))]
  pub title: Option<String>,
  #[validate(length(min = 1, message = "Overview cannot be empty"))]
  pub overview: Option<String>,
  pub release_date: Option<NaiveDate>,
  pub poster_path: Option<String>,
  #[validate(range(min = 0.0, max = 10.0, message = "Rating must be between 0 and 10"))]
  pub rating: Option<f32>,
  pub genres: Option<Vec<String>>,
}

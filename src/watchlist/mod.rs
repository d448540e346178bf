pub mod dto;
pub mod model;
pub mod repository;

use actix_web::{web, HttpResponse};
use dto::add_watch_item_dto::AddWatchItemDto;
use model::watch_item::WatchItem;
use validator::Validate;

use crate::shared::api_response::ApiResponse;
use crate::shared::error::AppError;
use crate::shared::middleware::auth_gate::AuthenticatedUser;
use crate::shared::store::{RepositoryError, Store};
use crate::AppState;

const ALREADY_LISTED: &str = "Movie is already in the watchlist";

#[utoipa::path(
  post,
  path = "/api/v1/watchlist",
  tag = "watchlist",
  security(("bearer" = [])),
  request_body = AddWatchItemDto,
  responses(
    (status = 201, description = "Movie added to the watchlist", body = ApiResponse<WatchItem>),
    (status = 400, description = "Invalid watchlist data"),
    (status = 404, description = "Movie not found"),
    (status = 409, description = "Movie is already in the watchlist"),
  )
)]
pub async fn add_to_watch_list<S: Store>(
  data: web::Data<AppState<S>>,
  user: web::ReqData<AuthenticatedUser>,
  dto: web::Json<AddWatchItemDto>,
) -> Result<HttpResponse, AppError> {
  let dto = dto.into_inner();
  dto.validate()?;
  let AuthenticatedUser(user) = user.into_inner();
  let expose = data.config.is_development();
  let failure = "Adding to watchlist failed";

  data
    .store
    .find_movie(&dto.movie_id)
    .await
    .map_err(|error| AppError::internal(failure, error, expose))?
    .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))?;

  let existing = data
    .store
    .find_watch_item(&user.id, &dto.movie_id)
    .await
    .map_err(|error| AppError::internal(failure, error, expose))?;
  if existing.is_some() {
    return Err(AppError::Conflict(ALREADY_LISTED.to_string()));
  }

  let item = WatchItem::new(
    user.id,
    dto.movie_id,
    dto.status.unwrap_or_default(),
    dto.notes,
    dto.rating,
  );
  let item = match data.store.add_watch_item(item).await {
    Ok(item) => item,
    Err(RepositoryError::Duplicate(_)) => {
      return Err(AppError::Conflict(ALREADY_LISTED.to_string()))
    }
    Err(error) => return Err(AppError::internal(failure, error, expose)),
  };
  tracing::info!(user_id = %item.user_id, movie_id = %item.movie_id, "Watchlist entry added");

  Ok(
    HttpResponse::Created()
      .json(ApiResponse::success("Movie successfully added to watchlist", item)),
  )
}

#[utoipa::path(
  get,
  path = "/api/v1/watchlist",
  tag = "watchlist",
  security(("bearer" = [])),
  responses((status = 200, description = "The caller's watchlist", body = ApiResponse<Vec<WatchItem>>))
)]
pub async fn list_watch_list<S: Store>(
  data: web::Data<AppState<S>>,
  user: web::ReqData<AuthenticatedUser>,
) -> Result<HttpResponse, AppError> {
  let items = data
    .store
    .list_watch_items(&user.0.id)
    .await
    .map_err(|error| {
      AppError::internal("Fetching watchlist failed", error, data.config.is_development())
    })?;
  Ok(HttpResponse::Ok().json(ApiResponse::success("Watchlist retrieved", items)))
}

pub mod dto;
pub mod model;
pub mod repository;

use actix_web::http::header;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use dto::movie_dto::{CreateMovieDto, UpdateMovieDto};
use model::movie::Movie;
use nanoid::nanoid;
use validator::Validate;

use crate::shared::api_response::ApiResponse;
use crate::shared::error::AppError;
use crate::shared::middleware::auth_gate::AuthenticatedUser;
use crate::shared::role::Role;
use crate::shared::store::Store;
use crate::users::model::user::User;
use crate::AppState;

fn movie_not_found() -> AppError {
  AppError::NotFound("Movie not found".to_string())
}

/// Owners manage their own movies; admins manage all of them.
fn ensure_can_modify(user: &User, movie: &Movie) -> Result<(), AppError> {
  if user.role == Role::Admin || movie.user_id == user.id {
    return Ok(());
  }
  tracing::warn!(user_id = %user.id, movie_id = %movie.id, "Movie change refused");
  Err(AppError::Forbidden)
}

async fn load_movie<S: Store>(
  state: &AppState<S>,
  id: &str,
  failure: &str,
) -> Result<Movie, AppError> {
  state
    .store
    .find_movie(id)
    .await
    .map_err(|error| {
      AppError::internal(failure, error, state.config.is_development())
    })?
    .ok_or_else(movie_not_found)
}

#[utoipa::path(
  get,
  path = "/api/v1/movies",
  tag = "movies",
  security(("bearer" = [])),
  responses((status = 200, description = "All movies", body = ApiResponse<Vec<Movie>>))
)]
pub async fn list_movies<S: Store>(
  data: web::Data<AppState<S>>,
) -> Result<HttpResponse, AppError> {
  let movies = data.store.list_movies().await.map_err(|error| {
    AppError::internal("Fetching movies failed", error, data.config.is_development())
  })?;
  Ok(HttpResponse::Ok().json(ApiResponse::success("Movies retrieved", movies)))
}

#[utoipa::path(
  get,
  path = "/api/v1/movies/{id}",
  tag = "movies",
  security(("bearer" = [])),
  params(("id" = String, Path, description = "Movie id")),
  responses(
    (status = 200, description = "The movie", body = ApiResponse<Movie>),
    (status = 404, description = "Movie not found"),
  )
)]
pub async fn find_movie<S: Store>(
  data: web::Data<AppState<S>>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let movie = load_movie(&data, &path, "Fetching movie failed").await?;
  Ok(HttpResponse::Ok().json(ApiResponse::success("Movie retrieved", movie)))
}

#[utoipa::path(
  post,
  path = "/api/v1/movies",
  tag = "movies",
  security(("bearer" = [])),
  request_body = CreateMovieDto,
  responses(
    (status = 201, description = "Movie created", body = ApiResponse<Movie>),
    (status = 400, description = "Invalid movie data"),
  )
)]
pub async fn create_movie<S: Store>(
  data: web::Data<AppState<S>>,
  user: web::ReqData<AuthenticatedUser>,
  dto: web::Json<CreateMovieDto>,
) -> Result<HttpResponse, AppError> {
  let dto = dto.into_inner();
  dto.validate()?;

  let now = Utc::now();
  let movie = Movie {
    id: nanoid!(),
    title: dto.title.trim().to_string(),
    overview: dto.overview,
    release_date: dto.release_date,
    poster_path: dto.poster_path,
    rating: dto.rating.unwrap_or_default(),
    genres: dto.genres,
    user_id: user.0.id.clone(),
    created_at: now,
    updated_at: now,
  };

  let movie = data.store.create_movie(movie).await.map_err(|error| {
    AppError::internal("Movie creation failed", error, data.config.is_development())
  })?;
  tracing::info!(movie_id = %movie.id, title = %movie.title, "Movie created");

  Ok(
    HttpResponse::Created()
      .append_header((header::LOCATION, format!("/api/v1/movies/{}", movie.id)))
      .json(ApiResponse::success("Movie created successfully", movie)),
  )
}

#[utoipa::path(
  put,
  path = "/api/v1/movies/{id}",
  tag = "movies",
  security(("bearer" = [])),
  params(("id" = String, Path, description = "Movie id")),
  request_body = UpdateMovieDto,
  responses(
    (status = 200, description = "Movie updated", body = ApiResponse<Movie>),
    (status = 403, description = "Not the owner of the movie"),
    (status = 404, description = "Movie not found"),
  )
)]
pub async fn update_movie<S: Store>(
  data: web::Data<AppState<S>>,
  user: web::ReqData<AuthenticatedUser>,
  path: web::Path<String>,
  dto: web::Json<UpdateMovieDto>,
) -> Result<HttpResponse, AppError> {
  let dto = dto.into_inner();
  dto.validate()?;

  let mut movie = load_movie(&data, &path, "Movie update failed").await?;
  ensure_can_modify(&user.0, &movie)?;

  if let Some(title) = dto.title {
    movie.title = title.trim().to_string();
  }
  if let Some(overview) = dto.overview {
    movie.overview = overview;
  }
  if let Some(release_date) = dto.release_date {
    movie.release_date = release_date;
  }
  if let Some(poster_path) = dto.poster_path {
    movie.poster_path = Some(poster_path);
  }
  if let Some(rating) = dto.rating {
    movie.rating = rating;
  }
  if let Some(genres) = dto.genres {
    movie.genres = genres;
  }
  movie.updated_at = Utc::now();

  let movie = data
    .store
    .update_movie(movie)
    .await
    .map_err(|error| {
      AppError::internal("Movie update failed", error, data.config.is_development())
    })?
    .ok_or_else(movie_not_found)?;
  tracing::info!(movie_id = %movie.id, title = %movie.title, "Movie updated");

  Ok(HttpResponse::Ok().json(ApiResponse::success("Movie updated successfully", movie)))
}

#[utoipa::path(
  delete,
  path = "/api/v1/movies/{id}",
  tag = "movies",
  security(("bearer" = [])),
  params(("id" = String, Path, description = "Movie id")),
  responses(
    (status = 200, description = "Movie deleted"),
    (status = 403, description = "Not the owner of the movie"),
    (status = 404, description = "Movie not found"),
  )
)]
pub async fn delete_movie<S: Store>(
  data: web::Data<AppState<S>>,
  user: web::ReqData<AuthenticatedUser>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let movie = load_movie(&data, &path, "Movie deletion failed").await?;
  ensure_can_modify(&user.0, &movie)?;

  let deleted = data.store.delete_movie(&movie.id).await.map_err(|error| {
    AppError::internal("Movie deletion failed", error, data.config.is_development())
  })?;
  if !deleted {
    return Err(movie_not_found());
  }
  tracing::info!(movie_id = %movie.id, "Movie deleted");

  Ok(HttpResponse::Ok().json(ApiResponse::acknowledged("Movie deleted successfully")))
}

#[cfg(test)]
mod tests {
  use actix_web::http::StatusCode;
  use chrono::NaiveDate;

  use super::*;
  use crate::helpers::tests::{
    app_state, as_request_user, http_request, parse_http_response, seed_user,
  };
  use crate::shared::store::InMemoryStore;
  use crate::watchlist::model::watch_item::{WatchItem, WatchStatus};

  fn create_dto(title: &str) -> CreateMovieDto {
    CreateMovieDto {
      title: title.to_string(),
      overview: "Exploration of space and time".to_string(),
      release_date: NaiveDate::from_ymd_opt(2014, 11, 7).unwrap(),
      poster_path: Some("/interstellar.jpg".to_string()),
      rating: Some(8.6),
      genres: vec!["Sci-Fi".to_string(), "Drama".to_string()],
    }
  }

  #[actix_web::test]
  async fn test_create_movie_owned_by_caller() {
    let store = InMemoryStore::new();
    let data = web::Data::new(app_state(store.clone()).await);
    let owner = seed_user(&data, "ann@x.com", "Str0ng!Pass", Role::User).await;

    let responder = create_movie(
      data.clone(),
      as_request_user(&owner).await,
      web::Json(create_dto("Interstellar")),
    )
    .await;
    let body: ApiResponse<Movie> =
      parse_http_response(responder, &http_request(), StatusCode::CREATED).await;

    let movie = body.data.unwrap();
    assert_eq!(movie.user_id, owner.id);
    assert_eq!(movie.rating, 8.6);
    assert_eq!(store.movies.read().unwrap().len(), 1);
  }

  #[actix_web::test]
  async fn test_create_movie_rejects_bad_rating() {
    let store = InMemoryStore::new();
    let data = web::Data::new(app_state(store.clone()).await);
    let owner = seed_user(&data, "ann@x.com", "Str0ng!Pass", Role::User).await;
    let dto = CreateMovieDto {
      rating: Some(11.0),
      ..create_dto("Interstellar")
    };

    let responder =
      create_movie(data, as_request_user(&owner).await, web::Json(dto)).await;
    let _: ApiResponse<()> =
      parse_http_response(responder, &http_request(), StatusCode::BAD_REQUEST)
        .await;

    assert!(store.movies.read().unwrap().is_empty());
  }

  #[actix_web::test]
  async fn test_update_movie_by_owner_and_stranger() {
    let store = InMemoryStore::new();
    let data = web::Data::new(app_state(store.clone()).await);
    let owner = seed_user(&data, "ann@x.com", "Str0ng!Pass", Role::User).await;
    let stranger = seed_user(&data, "bob@x.com", "Str0ng!Pass", Role::User).await;
    let created = create_movie(
      data.clone(),
      as_request_user(&owner).await,
      web::Json(create_dto("Interstellar")),
    )
    .await
    .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);
    let movie_id = store.movies.read().unwrap()[0].id.clone();

    let refused = update_movie(
      data.clone(),
      as_request_user(&stranger).await,
      web::Path::from(movie_id.clone()),
      web::Json(UpdateMovieDto {
        rating: Some(1.0),
        ..Default::default()
      }),
    )
    .await;
    let _: ApiResponse<()> =
      parse_http_response(refused, &http_request(), StatusCode::FORBIDDEN).await;

    let accepted = update_movie(
      data.clone(),
      as_request_user(&owner).await,
      web::Path::from(movie_id.clone()),
      web::Json(UpdateMovieDto {
        rating: Some(9.0),
        ..Default::default()
      }),
    )
    .await;
    let body: ApiResponse<Movie> =
      parse_http_response(accepted, &http_request(), StatusCode::OK).await;

    let movie = body.data.unwrap();
    assert_eq!(movie.rating, 9.0);
    assert_eq!(movie.title, "Interstellar");
  }

  #[actix_web::test]
  async fn test_admin_deletes_any_movie() {
    let store = InMemoryStore::new();
    let data = web::Data::new(app_state(store.clone()).await);
    let owner = seed_user(&data, "ann@x.com", "Str0ng!Pass", Role::User).await;
    let admin = seed_user(&data, "root@x.com", "Str0ng!Pass", Role::Admin).await;
    create_movie(
      data.clone(),
      as_request_user(&owner).await,
      web::Json(create_dto("Interstellar")),
    )
    .await
    .unwrap();
    let movie_id = store.movies.read().unwrap()[0].id.clone();
    store.watch_items.write().unwrap().push(WatchItem::new(
      owner.id.clone(),
      movie_id.clone(),
      WatchStatus::Planned,
      None,
      None,
    ));

    let responder = delete_movie(
      data.clone(),
      as_request_user(&admin).await,
      web::Path::from(movie_id.clone()),
    )
    .await;
    let body: ApiResponse<()> =
      parse_http_response(responder, &http_request(), StatusCode::OK).await;

    assert_eq!(body.message, "Movie deleted successfully");
    assert!(store.movies.read().unwrap().is_empty());
    assert!(store.watch_items.read().unwrap().is_empty());
  }

  #[actix_web::test]
  async fn test_find_missing_movie() {
    let data = web::Data::new(app_state(InMemoryStore::new()).await);

    let responder = find_movie(data, web::Path::from("missing".to_string())).await;
    let body: ApiResponse<()> =
      parse_http_response(responder, &http_request(), StatusCode::NOT_FOUND).await;

    assert_eq!(body.message, "Movie not found");
  }
}

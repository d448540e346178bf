mod auth;
mod movies;
mod seed;
mod shared;
mod users;
mod watchlist;

use std::sync::Arc;

use actix_web::middleware::{from_fn, Logger};
use actix_web::{web, App, HttpServer};
use nanoid::nanoid;
use shared::config::{Config, ConfigError, Environment};
use shared::handlers::{check_health, not_found};
use shared::hash_worker::{HashWorker, HashWorkerError, Hasher};
use shared::middleware::auth_gate::auth_gate;
use shared::store::{RepositoryError, Store};
use shared::token::TokenService;
use shared::validation::json_config;
use thiserror::Error;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_scalar::{Scalar, Servable};

#[cfg(feature = "mongodb")]
type AppStore = shared::database::MongoStore;
#[cfg(not(feature = "mongodb"))]
type AppStore = shared::store::InMemoryStore;

// This struct represents state
pub struct AppState<S: Store> {
  pub store: S,
  pub config: Config,
  pub hasher: Arc<dyn Hasher + Send + Sync>,
  pub tokens: TokenService,
  /// Verified against when a login names an unknown email.
  pub decoy_hash: String,
}

impl<S: Store> AppState<S> {
  pub async fn new(
    store: S,
    config: Config,
    hasher: Arc<dyn Hasher + Send + Sync>,
  ) -> Result<Self, HashWorkerError> {
    let decoy_hash = hasher.hash_password(&nanoid!()).await?;
    let tokens =
      TokenService::new(&config.jwt_secret, config.token_lifetime.duration);
    Ok(Self {
      store,
      config,
      hasher,
      tokens,
      decoy_hash,
    })
  }
}

#[derive(Debug, Error)]
enum StartupError {
  #[error(transparent)]
  Config(#[from] ConfigError),
  #[error("Server failed: {0}")]
  Io(#[from] std::io::Error),
  #[error("Hash worker failed: {0}")]
  Hash(#[from] HashWorkerError),
  #[error("Store unavailable: {0}")]
  Store(#[from] RepositoryError),
  #[error(transparent)]
  Seed(#[from] seed::SeedError),
}

#[cfg(feature = "mongodb")]
async fn open_store(config: &Config) -> Result<AppStore, StartupError> {
  let uri = config
    .database_url
    .as_deref()
    .ok_or(ConfigError::InvalidValue {
      key: "MONGODB_URI",
      value: String::new(),
    })?;
  Ok(shared::database::MongoStore::connect(uri, &config.database_name).await?)
}

#[cfg(not(feature = "mongodb"))]
async fn open_store(_config: &Config) -> Result<AppStore, StartupError> {
  tracing::warn!("Using the in-memory store, data is lost on restart");
  Ok(AppStore::new())
}

#[actix_web::main]
async fn main() -> Result<(), StartupError> {
  dotenv::dotenv().ok();
  shared::logging::init(Environment::from_env());

  let settings = Config::from_env()?;
  let hasher = HashWorker::with_threads(
    settings.hash_worker_threads,
    settings.bcrypt_cost,
  )?;
  let store = open_store(&settings).await?;
  let state =
    web::Data::new(AppState::new(store, settings, Arc::new(hasher)).await?);

  if let Some(password) = state.config.seed_user_password.as_deref() {
    seed::seed(&state, password).await?;
  }

  let server_address = state.config.bind_address();
  tracing::info!(
    environment = %state.config.environment,
    "Listening on http://{}:{}",
    server_address.0,
    server_address.1
  );
  HttpServer::new({
    let state = state.clone();
    move || {
      App::new()
        .wrap(Logger::default())
        .configure(|cfg| config(cfg, state.clone()))
    }
  })
  .bind(server_address)?
  .run()
  .await?;
  Ok(())
}

// Function to initialize the App
fn config<S: Store + 'static>(
  cfg: &mut web::ServiceConfig,
  state: web::Data<AppState<S>>,
) {
  cfg
    .app_data(state)
    .app_data(json_config())
    .route("/health", web::get().to(check_health))
    .service(Scalar::with_url("/scalar", ApiDoc::openapi()))
    .service(
      web::scope("/api/v1")
        .service(
          web::scope("/auth")
            .route("/register", web::post().to(auth::register::<S>))
            .route("/login", web::post().to(auth::login::<S>)),
        )
        .service(
          web::scope("/users")
            .wrap(from_fn(auth_gate::<S, _>))
            .route("/me", web::get().to(users::current_user)),
        )
        .service(
          web::scope("/movies")
            .wrap(from_fn(auth_gate::<S, _>))
            .route("", web::get().to(movies::list_movies::<S>))
            .route("", web::post().to(movies::create_movie::<S>))
            .route("/{id}", web::get().to(movies::find_movie::<S>))
            .route("/{id}", web::put().to(movies::update_movie::<S>))
            .route("/{id}", web::delete().to(movies::delete_movie::<S>)),
        )
        .service(
          web::scope("/watchlist")
            .wrap(from_fn(auth_gate::<S, _>))
            .route("", web::post().to(watchlist::add_to_watch_list::<S>))
            .route("", web::get().to(watchlist::list_watch_list::<S>)),
        ),
    )
    .default_service(web::to(not_found));
}

struct BearerSecurity;

impl Modify for BearerSecurity {
  fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
    openapi
      .components
      .get_or_insert_with(Default::default)
      .add_security_scheme(
        "bearer",
        SecurityScheme::Http(
          HttpBuilder::new()
            .scheme(HttpAuthScheme::Bearer)
            .bearer_format("JWT")
            .build(),
        ),
      );
  }
}

#[derive(OpenApi)]
#[openapi(
  paths(
    shared::handlers::check_health,
    auth::register,
    auth::login,
    users::current_user,
    movies::list_movies,
    movies::find_movie,
    movies::create_movie,
    movies::update_movie,
    movies::delete_movie,
    watchlist::add_to_watch_list,
    watchlist::list_watch_list,
  ),
  modifiers(&BearerSecurity),
  tags(
    (name = "auth", description = "Registration and login"),
    (name = "movies", description = "Movie catalogue"),
    (name = "watchlist", description = "Per-user watchlist"),
  )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
  use actix_web::http::{header, StatusCode};
  use actix_web::{test, App};
  use serde_json::{json, Value};

  use super::*;
  use crate::helpers::tests::app_state;
  use crate::shared::store::InMemoryStore;

  macro_rules! test_app {
    ($state:expr) => {
      test::init_service(App::new().configure(|cfg| config(cfg, $state.clone())))
        .await
    };
  }

  async fn read_json(response: actix_web::dev::ServiceResponse) -> Value {
    test::read_body_json(response).await
  }

  #[actix_rt::test]
  async fn test_register_login_and_use_token() {
    let state = web::Data::new(app_state(InMemoryStore::new()).await);
    let app = test_app!(state);

    // 1) Register
    let request = test::TestRequest::post()
      .uri("/api/v1/auth/register")
      .set_json(json!({
        "name": "Ann",
        "email": "ann@x.com",
        "password": "Str0ng!Pass"
      }))
      .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["user"]["email"], "ann@x.com");
    assert_eq!(body["data"]["user"]["role"], "USER");
    assert!(body["data"]["user"].get("passwordHash").is_none());
    assert!(body["data"]["user"].get("password").is_none());

    // 2) Login
    let request = test::TestRequest::post()
      .uri("/api/v1/auth/login")
      .set_json(json!({ "email": "ANN@x.com", "password": "Str0ng!Pass" }))
      .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
      .response()
      .cookies()
      .any(|cookie| cookie.name() == "jwt" && cookie.http_only() == Some(true)));
    let body = read_json(response).await;
    let token = body["data"]["token"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["tokenType"], "Bearer");
    assert_eq!(body["data"]["expiresIn"], "24h");

    // 3) Gated route
    let request = test::TestRequest::get()
      .uri("/api/v1/users/me")
      .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
      .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["user"]["email"], "ann@x.com");
  }

  #[actix_rt::test]
  async fn test_movie_and_watchlist_flow() {
    let state = web::Data::new(app_state(InMemoryStore::new()).await);
    let app = test_app!(state);

    let request = test::TestRequest::post()
      .uri("/api/v1/auth/register")
      .set_json(json!({
        "name": "Ann",
        "email": "ann@x.com",
        "password": "Str0ng!Pass"
      }))
      .to_request();
    assert_eq!(test::call_service(&app, request).await.status(), StatusCode::CREATED);
    let request = test::TestRequest::post()
      .uri("/api/v1/auth/login")
      .set_json(json!({ "email": "ann@x.com", "password": "Str0ng!Pass" }))
      .to_request();
    let body = read_json(test::call_service(&app, request).await).await;
    let bearer = format!("Bearer {}", body["data"]["token"].as_str().unwrap());

    let request = test::TestRequest::post()
      .uri("/api/v1/movies")
      .insert_header((header::AUTHORIZATION, bearer.clone()))
      .set_json(json!({
        "title": "Gladiator",
        "overview": "A Roman general becomes a gladiator",
        "releaseDate": "2000-05-05",
        "rating": 8.5,
        "genres": ["Action", "Drama"]
      }))
      .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let movie_id = read_json(response).await["data"]["id"]
      .as_str()
      .unwrap()
      .to_string();

    let request = test::TestRequest::post()
      .uri("/api/v1/watchlist")
      .insert_header((header::AUTHORIZATION, bearer.clone()))
      .set_json(json!({ "movieId": movie_id, "status": "PLANNED" }))
      .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let request = test::TestRequest::get()
      .uri("/api/v1/watchlist")
      .insert_header((header::AUTHORIZATION, bearer))
      .to_request();
    let body = read_json(test::call_service(&app, request).await).await;
    assert_eq!(body["data"][0]["movieId"], movie_id);
    assert_eq!(body["data"][0]["status"], "PLANNED");
  }

  #[actix_rt::test]
  async fn test_gated_routes_need_token() {
    let state = web::Data::new(app_state(InMemoryStore::new()).await);
    let app = test_app!(state);

    for uri in ["/api/v1/users/me", "/api/v1/movies", "/api/v1/watchlist"] {
      let request = test::TestRequest::get().uri(uri).to_request();
      let response = test::call_service(&app, request).await;
      assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri}");
    }
  }

  #[actix_rt::test]
  async fn test_malformed_json_body() {
    let state = web::Data::new(app_state(InMemoryStore::new()).await);
    let app = test_app!(state);

    let request = test::TestRequest::post()
      .uri("/api/v1/auth/register")
      .insert_header((header::CONTENT_TYPE, "application/json"))
      .set_payload("{not json")
      .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid request body");
  }

  #[actix_rt::test]
  async fn test_unknown_route_envelope() {
    let state = web::Data::new(app_state(InMemoryStore::new()).await);
    let app = test_app!(state);

    let request = test::TestRequest::get().uri("/api/v2/nothing").to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_json(response).await["success"], false);
  }

  #[actix_rt::test]
  async fn test_app_state_hashes_a_decoy() {
    let hasher = HashWorker::with_threads(1, 4).unwrap();
    let state = AppState::new(
      InMemoryStore::new(),
      crate::helpers::tests::test_config(),
      Arc::new(hasher),
    )
    .await
    .unwrap();

    assert!(state.decoy_hash.starts_with("$2"));
  }

  #[actix_web::test]
  async fn test_openapi_lists_routes() {
    let doc = ApiDoc::openapi();
    for path in [
      "/health",
      "/api/v1/auth/register",
      "/api/v1/auth/login",
      "/api/v1/movies/{id}",
      "/api/v1/watchlist",
    ] {
      assert!(doc.paths.paths.contains_key(path), "{path}");
    }
  }
}

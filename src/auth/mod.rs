use actix_web::cookie::{time, Cookie, SameSite};
use actix_web::http::header;
use actix_web::{web, HttpResponse};
use dto::login_dto::LoginDto;
use dto::register_dto::RegisterDto;
use rto::login_rto::{LoginRto, TOKEN_TYPE};
use validator::Validate;

use crate::shared::api_response::ApiResponse;
use crate::shared::error::AppError;
use crate::shared::middleware::auth_gate::TOKEN_COOKIE;
use crate::shared::store::{RepositoryError, Store};
use crate::shared::token::{Claims, IssuedToken};
use crate::users::model::user::User;
use crate::users::repository::user_repository::FindOneProperty;
use crate::users::rto::user_rto::{UserEnvelopeRto, UserRto};
use crate::AppState;

pub mod dto;
pub mod rto;

#[utoipa::path(
  post,
  path = "/api/v1/auth/register",
  tag = "auth",
  request_body = RegisterDto,
  responses(
    (status = 201, description = "User created", body = ApiResponse<UserEnvelopeRto>),
    (status = 400, description = "Invalid registration data"),
    (status = 409, description = "Email already registered"),
  )
)]
pub async fn register<S: Store>(
  data: web::Data<AppState<S>>,
  dto: web::Json<RegisterDto>,
) -> Result<HttpResponse, AppError> {
  let user = register_user(&data, dto.into_inner()).await?;

  Ok(
    HttpResponse::Created()
      .content_type("application/json")
      .append_header((header::LOCATION, format!("/api/v1/users/{}", user.id)))
      .json(ApiResponse::success(
        "User created successfully",
        UserEnvelopeRto {
          user: UserRto::from(user),
        },
      )),
  )
}

pub async fn register_user<S: Store>(
  state: &AppState<S>,
  dto: RegisterDto,
) -> Result<User, AppError> {
  let dto = dto.normalized();
  if let Err(validation_errors) = dto.validate() {
    tracing::warn!(email = %dto.email, "Registration rejected by validation");
    return Err(validation_errors.into());
  }
  let expose = state.config.is_development();

  let existing = state
    .store
    .find_user(FindOneProperty::Email(&dto.email))
    .await
    .map_err(|error| AppError::internal("User creation failed", error, expose))?;
  if existing.is_some() {
    tracing::warn!(email = %dto.email, "User already exists");
    return Err(AppError::DuplicateEmail);
  }

  let password_hash = state
    .hasher
    .hash_password(&dto.password)
    .await
    .map_err(|error| AppError::internal("User creation failed", error, expose))?;

  let user = User::new(
    dto.name,
    dto.email,
    password_hash,
    dto.role.unwrap_or_default(),
  );

  match state.store.create_user(user).await {
    Ok(user) => {
      tracing::info!(user_id = %user.id, email = %user.email, "User registered");
      Ok(user)
    }
    // Another request registered the same email after our pre-check.
    Err(RepositoryError::Duplicate(_)) => {
      tracing::warn!("User already exists, detected on insert");
      Err(AppError::DuplicateEmail)
    }
    Err(error) => Err(AppError::internal("User creation failed", error, expose)),
  }
}

#[utoipa::path(
  post,
  path = "/api/v1/auth/login",
  tag = "auth",
  request_body = LoginDto,
  responses(
    (status = 200, description = "Authenticated", body = ApiResponse<LoginRto>),
    (status = 400, description = "Invalid login data"),
    (status = 401, description = "Invalid credentials"),
  )
)]
pub async fn login<S: Store>(
  data: web::Data<AppState<S>>,
  dto: web::Json<LoginDto>,
) -> Result<HttpResponse, AppError> {
  let (user, issued) = login_user(&data, dto.into_inner()).await?;

  let max_age = i64::try_from(data.tokens.lifetime().as_secs()).unwrap_or(i64::MAX);
  let cookie = Cookie::build(TOKEN_COOKIE, issued.token.clone())
    .path("/")
    .http_only(true)
    .same_site(SameSite::Strict)
    .secure(!data.config.is_development())
    .max_age(time::Duration::seconds(max_age))
    .finish();

  Ok(
    HttpResponse::Ok()
      .content_type("application/json")
      .cookie(cookie)
      .json(ApiResponse::success(
        "Login successful",
        LoginRto {
          user: UserRto::from(user),
          token: issued.token,
          token_type: TOKEN_TYPE.to_string(),
          expires_in: data.config.token_lifetime.label.clone(),
          expires_at: issued.expires_at,
        },
      )),
  )
}

pub async fn login_user<S: Store>(
  state: &AppState<S>,
  dto: LoginDto,
) -> Result<(User, IssuedToken), AppError> {
  let dto = dto.normalized();
  dto.validate()?;
  let expose = state.config.is_development();

  let user = state
    .store
    .find_user(FindOneProperty::Email(&dto.email))
    .await
    .map_err(|error| AppError::internal("Login failed", error, expose))?;

  // Unknown emails are checked against the decoy hash so both failure
  // paths cost one bcrypt verification.
  let password_hash = user
    .as_ref()
    .map_or(state.decoy_hash.as_str(), |user| user.password_hash.as_str());
  let password_matches = state
    .hasher
    .verify_password(&dto.password, password_hash)
    .await
    .map_err(|error| AppError::internal("Login failed", error, expose))?;

  let user = match user {
    Some(user) if password_matches => user,
    Some(user) => {
      tracing::warn!(user_id = %user.id, "Invalid password attempt");
      return Err(AppError::InvalidCredentials);
    }
    None => {
      tracing::warn!(email = %dto.email, "Login attempt with unknown email");
      return Err(AppError::InvalidCredentials);
    }
  };

  let issued = state
    .tokens
    .issue(&Claims {
      id: user.id.clone(),
      role: user.role,
      email: user.email.clone(),
    })
    .map_err(|error| AppError::internal("Login failed", error, expose))?;

  tracing::info!(user_id = %user.id, "User logged in");
  Ok((user, issued))
}

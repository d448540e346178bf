use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::Header;
use actix_web::middleware::Next;
use actix_web::{web, Error, HttpMessage, HttpRequest};
use actix_web_httpauth::headers::authorization::{Authorization, Bearer};

use crate::shared::error::AppError;
use crate::shared::store::Store;
use crate::users::model::user::User;
use crate::users::repository::user_repository::FindOneProperty;
use crate::AppState;

pub const TOKEN_COOKIE: &str = "jwt";

/// The user resolved by [`auth_gate`], available to downstream handlers
/// through `web::ReqData<AuthenticatedUser>`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

/// Token from the `jwt` cookie, else from `Authorization: Bearer`.
pub fn extract_token(request: &HttpRequest) -> Option<String> {
  if let Some(cookie) = request.cookie(TOKEN_COOKIE) {
    if !cookie.value().is_empty() {
      return Some(cookie.value().to_string());
    }
  }
  Authorization::<Bearer>::parse(request)
    .ok()
    .map(|authorization| authorization.into_scheme().token().to_string())
    .filter(|token| !token.is_empty())
}

/// Verifies `token` and loads its user fresh from the store. Only the id
/// claim is trusted.
pub async fn authenticate<S: Store>(
  state: &AppState<S>,
  token: &str,
) -> Result<User, AppError> {
  let claims = state.tokens.verify(token).map_err(|error| {
    tracing::debug!(%error, "Rejected token");
    AppError::Unauthorized
  })?;

  state
    .store
    .find_user(FindOneProperty::Id(&claims.id))
    .await
    .map_err(|error| {
      AppError::internal(
        "Authentication failed",
        error,
        state.config.is_development(),
      )
    })?
    .ok_or_else(|| {
      tracing::debug!(user_id = %claims.id, "Token refers to a missing user");
      AppError::UserNotFound
    })
}

pub async fn auth_gate<S, B>(
  req: ServiceRequest,
  next: Next<B>,
) -> Result<ServiceResponse<EitherBody<B>>, Error>
where
  S: Store + 'static,
  B: MessageBody + 'static,
{
  let Some(state) = req.app_data::<web::Data<AppState<S>>>().cloned() else {
    let error = AppError::internal(
      "Authentication failed",
      "application state is not registered",
      false,
    );
    return Ok(req.error_response(error).map_into_right_body());
  };

  let Some(token) = extract_token(req.request()) else {
    tracing::debug!(path = %req.path(), "Rejected request without token");
    return Ok(req.error_response(AppError::NoToken).map_into_right_body());
  };

  match authenticate(&state, &token).await {
    Ok(user) => {
      req.extensions_mut().insert(AuthenticatedUser(user));
      next
        .call(req)
        .await
        .map(ServiceResponse::map_into_left_body)
    }
    Err(error) => Ok(req.error_response(error).map_into_right_body()),
  }
}

#[cfg(test)]
mod tests {
  use actix_web::cookie::Cookie;
  use actix_web::http::{header, StatusCode};
  use actix_web::middleware::from_fn;
  use actix_web::{test, App, HttpResponse};
  use chrono::{TimeDelta, Utc};

  use super::*;
  use crate::helpers::tests::{app_state, seed_user};
  use crate::shared::api_response::ApiResponse;
  use crate::shared::role::Role;
  use crate::shared::store::InMemoryStore;
  use crate::shared::token::{Claims, TokenService};

  async fn whoami(user: web::ReqData<AuthenticatedUser>) -> HttpResponse {
    HttpResponse::Ok().body(user.0.email.clone())
  }

  fn claims_for(user: &User) -> Claims {
    Claims {
      id: user.id.clone(),
      role: user.role,
      email: user.email.clone(),
    }
  }

  macro_rules! gated_app {
    ($state:expr) => {
      test::init_service(
        App::new().app_data($state.clone()).service(
          web::scope("/protected")
            .wrap(from_fn(auth_gate::<InMemoryStore, _>))
            .route("", web::get().to(whoami)),
        ),
      )
      .await
    };
  }

  #[actix_web::test]
  async fn test_extract_token_prefers_cookie() {
    let request = test::TestRequest::default()
      .cookie(Cookie::new(TOKEN_COOKIE, "from-cookie"))
      .insert_header((header::AUTHORIZATION, "Bearer from-header"))
      .to_http_request();

    assert_eq!(extract_token(&request).as_deref(), Some("from-cookie"));
  }

  #[actix_web::test]
  async fn test_extract_token_from_header() {
    let request = test::TestRequest::default()
      .cookie(Cookie::new(TOKEN_COOKIE, ""))
      .insert_header((header::AUTHORIZATION, "Bearer from-header"))
      .to_http_request();

    assert_eq!(extract_token(&request).as_deref(), Some("from-header"));
  }

  #[actix_web::test]
  async fn test_extract_token_ignores_other_schemes() {
    let request = test::TestRequest::default()
      .insert_header((header::AUTHORIZATION, "Basic dXNlcjpwYXNz"))
      .to_http_request();

    assert_eq!(extract_token(&request), None);
  }

  #[actix_web::test]
  async fn test_gate_admits_valid_token() {
    let state = web::Data::new(app_state(InMemoryStore::new()).await);
    let user = seed_user(&state, "ann@x.com", "Str0ng!Pass", Role::User).await;
    let token = state.tokens.issue(&claims_for(&user)).unwrap().token;
    let app = gated_app!(state);

    let request = test::TestRequest::get()
      .uri("/protected")
      .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
      .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(test::read_body(response).await, "ann@x.com");
  }

  #[actix_web::test]
  async fn test_gate_accepts_cookie_token() {
    let state = web::Data::new(app_state(InMemoryStore::new()).await);
    let user = seed_user(&state, "ann@x.com", "Str0ng!Pass", Role::User).await;
    let token = state.tokens.issue(&claims_for(&user)).unwrap().token;
    let app = gated_app!(state);

    let request = test::TestRequest::get()
      .uri("/protected")
      .cookie(Cookie::new(TOKEN_COOKIE, token))
      .insert_header((header::AUTHORIZATION, "Bearer garbage"))
      .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
  }

  #[actix_web::test]
  async fn test_gate_without_token() {
    let state = web::Data::new(app_state(InMemoryStore::new()).await);
    let app = gated_app!(state);

    let request = test::TestRequest::get().uri("/protected").to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: ApiResponse<()> = test::read_body_json(response).await;
    assert!(!body.success);
    assert_eq!(body.message, "No token provided");
  }

  #[actix_web::test]
  async fn test_gate_with_expired_token() {
    let state = web::Data::new(app_state(InMemoryStore::new()).await);
    let user = seed_user(&state, "ann@x.com", "Str0ng!Pass", Role::User).await;
    let token = state
      .tokens
      .issue_at(&claims_for(&user), Utc::now() - TimeDelta::days(2))
      .unwrap()
      .token;
    let app = gated_app!(state);

    let request = test::TestRequest::get()
      .uri("/protected")
      .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
      .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: ApiResponse<()> = test::read_body_json(response).await;
    assert_eq!(body.message, "Invalid or expired token");
  }

  #[actix_web::test]
  async fn test_gate_with_foreign_secret() {
    let state = web::Data::new(app_state(InMemoryStore::new()).await);
    let user = seed_user(&state, "ann@x.com", "Str0ng!Pass", Role::User).await;
    let foreign = TokenService::new("another-secret", state.tokens.lifetime());
    let token = foreign.issue(&claims_for(&user)).unwrap().token;
    let app = gated_app!(state);

    let request = test::TestRequest::get()
      .uri("/protected")
      .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
      .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
  }

  #[actix_web::test]
  async fn test_gate_with_deleted_user() {
    let store = InMemoryStore::new();
    let state = web::Data::new(app_state(store.clone()).await);
    let user = seed_user(&state, "ann@x.com", "Str0ng!Pass", Role::User).await;
    let token = state.tokens.issue(&claims_for(&user)).unwrap().token;
    store.users.write().unwrap().clear();
    let app = gated_app!(state);

    let request = test::TestRequest::get()
      .uri("/protected")
      .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
      .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: ApiResponse<()> = test::read_body_json(response).await;
    assert_eq!(body.message, "User not found");
  }
}

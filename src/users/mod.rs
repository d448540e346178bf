pub mod model;
pub mod repository;
pub mod rto;

use actix_web::{web, HttpResponse};
use rto::user_rto::{UserEnvelopeRto, UserRto};

use crate::shared::api_response::ApiResponse;
use crate::shared::middleware::auth_gate::AuthenticatedUser;

#[utoipa::path(
  get,
  path = "/api/v1/users/me",
  tag = "users",
  security(("bearer" = [])),
  responses(
    (status = 200, description = "The authenticated user", body = ApiResponse<UserEnvelopeRto>),
    (status = 401, description = "Invalid or expired token"),
    (status = 403, description = "No token provided"),
  )
)]
pub async fn current_user(user: web::ReqData<AuthenticatedUser>) -> HttpResponse {
  let AuthenticatedUser(user) = user.into_inner();
  HttpResponse::Ok().json(ApiResponse::success(
    "Current user",
    UserEnvelopeRto {
      user: UserRto::from(user),
    },
  ))
}

use actix_web::{HttpRequest, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::api_response::ApiResponse;
use super::error::AppError;

#[derive(ToSchema, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
  pub status: String,
  pub version: String,
}

#[utoipa::path(
  get,
  path = "/health",
  tag = "health",
  responses(
    (status = 200, description = "Check the service health", body = ApiResponse<HealthStatus>)
  )
)]
pub async fn check_health() -> impl Responder {
  HttpResponse::Ok().json(ApiResponse::success(
    "Service is healthy",
    HealthStatus {
      status: "ok".to_string(),
      version: env!("CARGO_PKG_VERSION").to_string(),
    },
  ))
}

/// Fallback for every unmatched route.
pub async fn not_found(request: HttpRequest) -> Result<HttpResponse, AppError> {
  tracing::debug!(method = %request.method(), path = %request.path(), "No route matched");
  Err(AppError::NotFound(format!(
    "Route {} {} not found",
    request.method(),
    request.path()
  )))
}

use std::fmt::Display;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::Value;
use thiserror::Error;
use validator::ValidationErrors;

use crate::shared::api_response::ApiResponse;

/// Every failure a handler or the auth gate can answer with.
#[derive(Debug, Error)]
pub enum AppError {
  #[error("{message}")]
  Validation {
    message: String,
    details: Option<Value>,
  },
  #[error("User already exists")]
  DuplicateEmail,
  #[error("Invalid credentials")]
  InvalidCredentials,
  #[error("No token provided")]
  NoToken,
  #[error("Invalid or expired token")]
  Unauthorized,
  #[error("User not found")]
  UserNotFound,
  #[error("Insufficient permissions")]
  Forbidden,
  #[error("{0}")]
  NotFound(String),
  #[error("{0}")]
  Conflict(String),
  #[error("{message}")]
  Internal {
    message: String,
    detail: Option<String>,
  },
}

impl AppError {
  pub fn validation(message: impl Into<String>, details: Option<Value>) -> Self {
    AppError::Validation {
      message: message.into(),
      details,
    }
  }

  /// Logs `source` and hides it from the client unless `expose` is set.
  pub fn internal(
    message: impl Into<String>,
    source: impl Display,
    expose: bool,
  ) -> Self {
    let message = message.into();
    tracing::error!(error = %source, "{message}");
    AppError::Internal {
      message,
      detail: expose.then(|| source.to_string()),
    }
  }
}

impl From<ValidationErrors> for AppError {
  fn from(errors: ValidationErrors) -> Self {
    AppError::validation("Validation failed", serde_json::to_value(errors).ok())
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation { .. } => StatusCode::BAD_REQUEST,
      AppError::DuplicateEmail | AppError::Conflict(_) => StatusCode::CONFLICT,
      AppError::InvalidCredentials
      | AppError::Unauthorized
      | AppError::UserNotFound => StatusCode::UNAUTHORIZED,
      AppError::NoToken | AppError::Forbidden => StatusCode::FORBIDDEN,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let error = match self {
      AppError::Validation { details, .. } => details.clone(),
      AppError::Internal { detail, .. } => detail.clone().map(Value::String),
      _ => None,
    };
    HttpResponse::build(self.status_code())
      .content_type("application/json")
      .json(ApiResponse::failure(self.to_string(), error))
  }
}

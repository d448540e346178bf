use std::borrow::Cow;

use actix_web::{error::JsonPayloadError, web, HttpRequest};
use serde_json::Value;
use validator::ValidationError;

use crate::shared::error::AppError;

pub const PASSWORD_MIN_LENGTH: usize = 8;

pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
  let rules: [(&'static str, &'static str, fn(char) -> bool); 4] = [
    (
      "password_lowercase",
      "Password must contain at least one lowercase letter",
      |c| c.is_ascii_lowercase(),
    ),
    (
      "password_uppercase",
      "Password must contain at least one uppercase letter",
      |c| c.is_ascii_uppercase(),
    ),
    (
      "password_digit",
      "Password must contain at least one number",
      |c| c.is_ascii_digit(),
    ),
    (
      "password_special",
      "Password must contain at least one special character",
      |c| !c.is_ascii_alphanumeric(),
    ),
  ];

  if password.chars().count() < PASSWORD_MIN_LENGTH {
    return Err(
      ValidationError::new("password_length").with_message(Cow::Borrowed(
        "Password must be at least 8 characters long",
      )),
    );
  }
  for (code, message, rule) in rules {
    if !password.chars().any(rule) {
      return Err(
        ValidationError::new(code).with_message(Cow::Borrowed(message)),
      );
    }
  }
  Ok(())
}

pub fn normalize_email(email: &str) -> String {
  email.trim().to_lowercase()
}

/// Turns body deserialization failures (malformed JSON, missing fields,
/// unknown enum values) into the API's 400 envelope.
pub fn json_config() -> web::JsonConfig {
  web::JsonConfig::default().error_handler(
    |error: JsonPayloadError, _request: &HttpRequest| {
      AppError::validation(
        "Invalid request body",
        Some(Value::String(error.to_string())),
      )
      .into()
    },
  )
}

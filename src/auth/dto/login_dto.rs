use serde::Deserialize;
use utoipa::ToSchema;
use validator_derive::Validate;

use crate::shared::validation::normalize_email;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginDto {
  #[validate(email(message = "Invalid email address"))]
  pub email: String,
  #[validate(length(min = 1, message = "Password is required"))]
  pub password: String,
}

impl LoginDto {
  pub fn normalized(self) -> Self {
    Self {
      email: normalize_email(&self.email),
      ..self
    }
  }
}

use serde::Deserialize;
use utoipa::ToSchema;
use validator_derive::Validate;

use crate::shared::role::Role;
use crate::shared::validation::{normalize_email, validate_password_strength};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterDto {
  #[validate(length(
    min = 3,
    max = 100,
    message = "Name must be between 3 and 100 characters long"
  ))]
  pub name: String,
  #[validate(email(message = "Invalid email address"))]
  pub email: String,
  #[validate(custom(function = "validate_password_strength"))]
  pub password: String,
  pub role: Option<Role>,
}

impl RegisterDto {
  pub fn normalized(self) -> Self {
    Self {
      name: self.name.trim().to_string(),
      email: normalize_email(&self.email),
      ..self
    }
  }
}

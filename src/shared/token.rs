use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{
  decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::role::Role;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
  #[error("Token expired")]
  Expired,
  #[error("Token invalid")]
  Invalid,
  #[error("Token lifetime out of range")]
  Lifetime,
  #[error("Token encoding failed: {0}")]
  Encoding(String),
}

/// Identity facts carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
  pub id: String,
  pub role: Role,
  pub email: String,
}

#[derive(Serialize, Deserialize)]
struct AccessTokenClaims {
  id: String,
  role: Role,
  email: String,
  iat: i64,
  exp: i64,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
  pub token: String,
  pub issued_at: DateTime<Utc>,
  pub expires_at: DateTime<Utc>,
}

/// Issues and verifies HS256 access tokens. The secret and lifetime are
/// fixed at construction; expiry travels inside the token.
#[derive(Clone)]
pub struct TokenService {
  encoding_key: EncodingKey,
  decoding_key: DecodingKey,
  validation: Validation,
  lifetime: Duration,
}

impl TokenService {
  pub fn new(secret: &str, lifetime: Duration) -> Self {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "iat"]);

    Self {
      encoding_key: EncodingKey::from_secret(secret.as_bytes()),
      decoding_key: DecodingKey::from_secret(secret.as_bytes()),
      validation,
      lifetime,
    }
  }

  pub fn lifetime(&self) -> Duration {
    self.lifetime
  }

  pub fn issue(&self, claims: &Claims) -> Result<IssuedToken, TokenError> {
    self.issue_at(claims, Utc::now())
  }

  pub fn issue_at(
    &self,
    claims: &Claims,
    issued_at: DateTime<Utc>,
  ) -> Result<IssuedToken, TokenError> {
    let lifetime =
      TimeDelta::from_std(self.lifetime).map_err(|_| TokenError::Lifetime)?;
    let expires_at = issued_at
      .checked_add_signed(lifetime)
      .ok_or(TokenError::Lifetime)?;

    let token = encode(
      &Header::new(Algorithm::HS256),
      &AccessTokenClaims {
        id: claims.id.clone(),
        role: claims.role,
        email: claims.email.clone(),
        iat: issued_at.timestamp(),
        exp: expires_at.timestamp(),
      },
      &self.encoding_key,
    )
    .map_err(|error| TokenError::Encoding(error.to_string()))?;

    Ok(IssuedToken {
      token,
      issued_at,
      expires_at,
    })
  }

  pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
    let token_data =
      decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)
        .map_err(|error| match error.kind() {
          ErrorKind::ExpiredSignature => TokenError::Expired,
          _ => TokenError::Invalid,
        })?;

    let AccessTokenClaims {
      id, role, email, ..
    } = token_data.claims;
    Ok(Claims { id, role, email })
  }
}

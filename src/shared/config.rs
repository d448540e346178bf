use std::env;
use std::fmt;
use std::thread;
use std::time::Duration;

use chrono::{TimeDelta, Utc};
use nanoid::nanoid;
use thiserror::Error;

use crate::shared::hash_worker::DEFAULT_HASH_COST;

const DEFAULT_TOKEN_LIFETIME: &str = "24h";
const DEFAULT_DATABASE_NAME: &str = "movie_tracker";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
  #[error("JWT_SECRET must be set outside of development")]
  MissingSecret,
  #[error("JWT_EXPIRES_IN is not a valid lifetime: {0:?}")]
  InvalidTokenLifetime(String),
  #[error("BCRYPT_COST must be between 4 and 31, got {0:?}")]
  InvalidBcryptCost(String),
  #[error("{key} is not valid: {value:?}")]
  InvalidValue { key: &'static str, value: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
  Development,
  Production,
}

impl Environment {
  pub fn from_env() -> Self {
    Self::parse(env::var("APP_ENV").ok().as_deref())
  }

  fn parse(value: Option<&str>) -> Self {
    match value.map(str::trim) {
      Some(value)
        if value.eq_ignore_ascii_case("development")
          || value.eq_ignore_ascii_case("dev") =>
      {
        Environment::Development
      }
      _ => Environment::Production,
    }
  }
}

impl fmt::Display for Environment {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Environment::Development => write!(f, "development"),
      Environment::Production => write!(f, "production"),
    }
  }
}

/// How long issued tokens stay valid, with the label echoed back to clients
/// in the login response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenLifetime {
  pub duration: Duration,
  pub label: String,
}

impl TokenLifetime {
  /// Accepts `30s`, `15m`, `24h`, `7d` or a bare number of seconds.
  pub fn parse(value: &str) -> Result<Self, ConfigError> {
    let invalid = || ConfigError::InvalidTokenLifetime(value.to_string());
    let trimmed = value.trim();
    let (digits, unit) = match trimmed.char_indices().last() {
      Some((index, c)) if c.is_ascii_alphabetic() => {
        (&trimmed[..index], Some(c.to_ascii_lowercase()))
      }
      Some(_) => (trimmed, None),
      None => return Err(invalid()),
    };
    let amount: u64 = digits.trim().parse().map_err(|_| invalid())?;
    let multiplier = match unit {
      None | Some('s') => 1,
      Some('m') => 60,
      Some('h') => 60 * 60,
      Some('d') => 24 * 60 * 60,
      Some(_) => return Err(invalid()),
    };
    let seconds = amount.checked_mul(multiplier).ok_or_else(invalid)?;
    if seconds == 0 {
      return Err(invalid());
    }
    let duration = Duration::from_secs(seconds);
    // Expiry must stay representable for every token issued from now on.
    TimeDelta::from_std(duration)
      .ok()
      .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
      .ok_or_else(invalid)?;
    Ok(Self {
      duration,
      label: trimmed.to_string(),
    })
  }
}

#[derive(Clone, Debug)]
pub struct Config {
  pub host: String,
  pub port: u16,
  pub environment: Environment,
  pub jwt_secret: String,
  pub token_lifetime: TokenLifetime,
  pub bcrypt_cost: u32,
  pub hash_worker_threads: usize,
  pub database_url: Option<String>,
  pub database_name: String,
  pub seed_user_password: Option<String>,
}

impl Config {
  pub fn from_env() -> Result<Self, ConfigError> {
    Self::from_lookup(|key| env::var(key).ok())
  }

  pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
  where
    F: Fn(&str) -> Option<String>,
  {
    let non_empty = |key: &str| {
      lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
    };

    let environment = Environment::parse(non_empty("APP_ENV").as_deref());

    let jwt_secret = match non_empty("JWT_SECRET") {
      Some(secret) => secret,
      None if environment == Environment::Development => {
        tracing::warn!(
          "JWT_SECRET is not set, using an ephemeral development secret"
        );
        nanoid!(64)
      }
      None => return Err(ConfigError::MissingSecret),
    };

    let token_lifetime = TokenLifetime::parse(
      &non_empty("JWT_EXPIRES_IN")
        .unwrap_or_else(|| DEFAULT_TOKEN_LIFETIME.to_string()),
    )?;

    let bcrypt_cost = match non_empty("BCRYPT_COST") {
      Some(value) => value
        .parse::<u32>()
        .ok()
        .filter(|cost| (4..=31).contains(cost))
        .ok_or(ConfigError::InvalidBcryptCost(value))?,
      None => DEFAULT_HASH_COST,
    };

    let hash_worker_threads = match non_empty("HASH_WORKER_THREADS") {
      Some(value) => value
        .parse::<usize>()
        .ok()
        .filter(|threads| *threads > 0)
        .ok_or(ConfigError::InvalidValue {
          key: "HASH_WORKER_THREADS",
          value,
        })?,
      None => thread::available_parallelism().map_or(1, |n| n.get()),
    };

    let port = match non_empty("PORT") {
      Some(value) => value
        .parse::<u16>()
        .map_err(|_| ConfigError::InvalidValue { key: "PORT", value })?,
      None => 3000,
    };

    Ok(Self {
      host: non_empty("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
      port,
      environment,
      jwt_secret,
      token_lifetime,
      bcrypt_cost,
      hash_worker_threads,
      database_url: non_empty("MONGODB_URI"),
      database_name: non_empty("MONGODB_DATABASE")
        .unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_string()),
      seed_user_password: non_empty("SEED_USER_PASSWORD"),
    })
  }

  pub fn is_development(&self) -> bool {
    self.environment == Environment::Development
  }

  pub fn bind_address(&self) -> (String, u16) {
    (self.host.clone(), self.port)
  }
}

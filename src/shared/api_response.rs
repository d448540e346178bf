use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Envelope shared by every JSON response of the API.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
  pub success: bool,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub data: Option<T>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  #[schema(value_type = Option<Object>)]
  pub error: Option<Value>,
  pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
  pub fn success(message: impl Into<String>, data: T) -> Self {
    Self {
      success: true,
      message: message.into(),
      data: Some(data),
      error: None,
      timestamp: Utc::now(),
    }
  }
}

impl ApiResponse<()> {
  pub fn acknowledged(message: impl Into<String>) -> Self {
    Self {
      success: true,
      message: message.into(),
      data: None,
      error: None,
      timestamp: Utc::now(),
    }
  }

  pub fn failure(message: impl Into<String>, error: Option<Value>) -> Self {
    Self {
      success: false,
      message: message.into(),
      data: None,
      error,
      timestamp: Utc::now(),
    }
  }
}

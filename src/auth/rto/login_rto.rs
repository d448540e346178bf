use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::users::rto::user_rto::UserRto;

pub const TOKEN_TYPE: &str = "Bearer";

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRto {
  pub user: UserRto,
  pub token: String,
  pub token_type: String,
  pub expires_in: String,
  pub expires_at: DateTime<Utc>,
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema,
)]
pub enum Role {
  #[default]
  #[serde(rename = "USER")]
  User,
  #[serde(rename = "ADMIN")]
  Admin,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_role_wire_names() {
    assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), r#""ADMIN""#);
    assert_eq!(
      serde_json::from_str::<Role>(r#""USER""#).unwrap(),
      Role::User
    );
    assert!(serde_json::from_str::<Role>(r#""driver""#).is_err());
    assert_eq!(Role::default(), Role::User);
  }
}

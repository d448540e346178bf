#[cfg(feature = "mongodb")]
use mongodb::bson::{doc, Document};

#[cfg(feature = "mongodb")]
use crate::shared::database::{is_duplicate_key, MongoStore};
#[cfg(any(test, not(feature = "mongodb")))]
use crate::shared::store::{read, write, InMemoryStore};
use crate::shared::store::RepositoryError;
use crate::users::model::user::User;

pub enum FindOneProperty<'a> {
  Id(&'a str),
  Email(&'a str),
}

impl FindOneProperty<'_> {
  #[cfg(any(test, not(feature = "mongodb")))]
  fn matches(&self, user: &User) -> bool {
    match self {
      FindOneProperty::Id(id) => user.id == *id,
      FindOneProperty::Email(email) => user.email == *email,
    }
  }

  #[cfg(feature = "mongodb")]
  fn to_mongo_key_value(&self) -> Document {
    match self {
      FindOneProperty::Id(id) => doc! { "id": *id },
      FindOneProperty::Email(email) => doc! { "email": *email },
    }
  }
}

pub trait UserRepository {
  async fn find_user(
    &self,
    property: FindOneProperty<'_>,
  ) -> Result<Option<User>, RepositoryError>;
  /// Fails with `RepositoryError::Duplicate` when the email is taken.
  async fn create_user(&self, user: User) -> Result<User, RepositoryError>;
}

// ### In-memory implementation ###

#[cfg(any(test, not(feature = "mongodb")))]
impl UserRepository for InMemoryStore {
  async fn find_user(
    &self,
    property: FindOneProperty<'_>,
  ) -> Result<Option<User>, RepositoryError> {
    let users = read(&self.users)?;
    Ok(users.iter().find(|user| property.matches(user)).cloned())
  }

  async fn create_user(&self, user: User) -> Result<User, RepositoryError> {
    let mut users = write(&self.users)?;
    if users.iter().any(|existing| existing.email == user.email) {
      return Err(RepositoryError::Duplicate("email"));
    }
    users.push(user.clone());
    Ok(user)
  }
}

// ### MongoDB implementation ###

#[cfg(feature = "mongodb")]
impl UserRepository for MongoStore {
  async fn find_user(
    &self,
    property: FindOneProperty<'_>,
  ) -> Result<Option<User>, RepositoryError> {
    Ok(self.users().find_one(property.to_mongo_key_value()).await?)
  }

  async fn create_user(&self, user: User) -> Result<User, RepositoryError> {
    match self.users().insert_one(&user).await {
      Ok(_) => Ok(user),
      Err(error) if is_duplicate_key(&error) => {
        Err(RepositoryError::Duplicate("email"))
      }
      Err(error) => Err(error.into()),
    }
  }
}

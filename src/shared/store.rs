#[cfg(any(test, not(feature = "mongodb")))]
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;

#[cfg(any(test, not(feature = "mongodb")))]
use crate::movies::model::movie::Movie;
use crate::movies::repository::movie_repository::MovieRepository;
#[cfg(any(test, not(feature = "mongodb")))]
use crate::users::model::user::User;
use crate::users::repository::user_repository::UserRepository;
#[cfg(any(test, not(feature = "mongodb")))]
use crate::watchlist::model::watch_item::WatchItem;
use crate::watchlist::repository::watch_list_repository::WatchListRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
  #[error("Duplicate {0}")]
  Duplicate(&'static str),

  #[cfg(any(test, not(feature = "mongodb")))]
  #[error("Storage lock poisoned")]
  Poisoned,

  #[cfg(feature = "mongodb")]
  #[error("MongoDB error: {0}")]
  Mongo(#[from] mongodb::error::Error),
}

/// Everything the handlers need from persistence.
pub trait Store: UserRepository + MovieRepository + WatchListRepository {}

impl<T> Store for T where
  T: UserRepository + MovieRepository + WatchListRepository
{
}

/// Process-local store. Clones share the same collections.
#[cfg(any(test, not(feature = "mongodb")))]
#[derive(Clone, Default)]
pub struct InMemoryStore {
  pub users: Arc<RwLock<Vec<User>>>,
  pub movies: Arc<RwLock<Vec<Movie>>>,
  pub watch_items: Arc<RwLock<Vec<WatchItem>>>,
}

#[cfg(any(test, not(feature = "mongodb")))]
impl InMemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

#[cfg(any(test, not(feature = "mongodb")))]
pub(crate) fn read<T>(
  lock: &RwLock<T>,
) -> Result<RwLockReadGuard<'_, T>, RepositoryError> {
  lock.read().map_err(|_| RepositoryError::Poisoned)
}

#[cfg(any(test, not(feature = "mongodb")))]
pub(crate) fn write<T>(
  lock: &RwLock<T>,
) -> Result<RwLockWriteGuard<'_, T>, RepositoryError> {
  lock.write().map_err(|_| RepositoryError::Poisoned)
}

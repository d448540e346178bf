#[cfg(feature = "mongodb")]
use mongodb::bson::doc;

#[cfg(feature = "mongodb")]
use crate::shared::database::{is_duplicate_key, MongoStore};
#[cfg(any(test, not(feature = "mongodb")))]
use crate::shared::store::{read, write, InMemoryStore};
use crate::shared::store::RepositoryError;
use crate::watchlist::model::watch_item::WatchItem;

pub trait WatchListRepository {
  async fn find_watch_item(
    &self,
    user_id: &str,
    movie_id: &str,
  ) -> Result<Option<WatchItem>, RepositoryError>;
  async fn list_watch_items(
    &self,
    user_id: &str,
  ) -> Result<Vec<WatchItem>, RepositoryError>;
  /// Fails with `RepositoryError::Duplicate` when the user already tracks
  /// the movie.
  async fn add_watch_item(
    &self,
    item: WatchItem,
  ) -> Result<WatchItem, RepositoryError>;
}

#[cfg(any(test, not(feature = "mongodb")))]
impl WatchListRepository for InMemoryStore {
  async fn find_watch_item(
    &self,
    user_id: &str,
    movie_id: &str,
  ) -> Result<Option<WatchItem>, RepositoryError> {
    let items = read(&self.watch_items)?;
    Ok(
      items
        .iter()
        .find(|item| item.user_id == user_id && item.movie_id == movie_id)
        .cloned(),
    )
  }

  async fn list_watch_items(
    &self,
    user_id: &str,
  ) -> Result<Vec<WatchItem>, RepositoryError> {
    let items = read(&self.watch_items)?;
    Ok(
      items
        .iter()
        .filter(|item| item.user_id == user_id)
        .cloned()
        .collect(),
    )
  }

  async fn add_watch_item(
    &self,
    item: WatchItem,
  ) -> Result<WatchItem, RepositoryError> {
    let mut items = write(&self.watch_items)?;
    if items.iter().any(|existing| {
      existing.user_id == item.user_id && existing.movie_id == item.movie_id
    }) {
      return Err(RepositoryError::Duplicate("watchlist entry"));
    }
    items.push(item.clone());
    Ok(item)
  }
}

#[cfg(feature = "mongodb")]
impl WatchListRepository for MongoStore {
  async fn find_watch_item(
    &self,
    user_id: &str,
    movie_id: &str,
  ) -> Result<Option<WatchItem>, RepositoryError> {
    Ok(
      self
        .watch_items()
        .find_one(doc! { "userId": user_id, "movieId": movie_id })
        .await?,
    )
  }

  async fn list_watch_items(
    &self,
    user_id: &str,
  ) -> Result<Vec<WatchItem>, RepositoryError> {
    let mut cursor = self
      .watch_items()
      .find(doc! { "userId": user_id })
      .await?;
    let mut items = Vec::new();
    while cursor.advance().await? {
      items.push(cursor.deserialize_current()?);
    }
    Ok(items)
  }

  async fn add_watch_item(
    &self,
    item: WatchItem,
  ) -> Result<WatchItem, RepositoryError> {
    match self.watch_items().insert_one(&item).await {
      Ok(_) => Ok(item),
      Err(error) if is_duplicate_key(&error) => {
        Err(RepositoryError::Duplicate("watchlist entry"))
      }
      Err(error) => Err(error.into()),
    }
  }
}

use mongodb::bson::doc;
use mongodb::error::{Error, ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};

use crate::movies::model::movie::Movie;
use crate::shared::store::RepositoryError;
use crate::users::model::user::User;
use crate::watchlist::model::watch_item::WatchItem;

const DUPLICATE_KEY: i32 = 11000;

#[derive(Clone)]
pub struct MongoStore {
  database: Database,
}

impl MongoStore {
  pub async fn connect(
    uri: &str,
    database_name: &str,
  ) -> Result<Self, RepositoryError> {
    let client = Client::with_uri_str(uri).await?;
    let store = Self {
      database: client.database(database_name),
    };
    store.database.run_command(doc! { "ping": 1 }).await?;
    store.ensure_indexes().await?;
    tracing::info!(database = database_name, "MongoDB connected");
    Ok(store)
  }

  async fn ensure_indexes(&self) -> Result<(), RepositoryError> {
    let unique = |keys| {
      IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
    };
    self.users().create_index(unique(doc! { "id": 1 })).await?;
    self.users().create_index(unique(doc! { "email": 1 })).await?;
    self.movies().create_index(unique(doc! { "id": 1 })).await?;
    self
      .watch_items()
      .create_index(unique(doc! { "userId": 1, "movieId": 1 }))
      .await?;
    Ok(())
  }

  pub(crate) fn users(&self) -> Collection<User> {
    self.database.collection("users")
  }

  pub(crate) fn movies(&self) -> Collection<Movie> {
    self.database.collection("movies")
  }

  pub(crate) fn watch_items(&self) -> Collection<WatchItem> {
    self.database.collection("watch_items")
  }
}

pub(crate) fn is_duplicate_key(error: &Error) -> bool {
  matches!(
    *error.kind,
    ErrorKind::Write(WriteFailure::WriteError(ref write_error))
      if write_error.code == DUPLICATE_KEY
  )
}

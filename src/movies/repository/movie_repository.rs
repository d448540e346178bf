#[cfg(feature = "mongodb")]
use mongodb::bson::doc;

use crate::movies::model::movie::Movie;
#[cfg(feature = "mongodb")]
use crate::shared::database::MongoStore;
#[cfg(any(test, not(feature = "mongodb")))]
use crate::shared::store::{read, write, InMemoryStore};
use crate::shared::store::RepositoryError;

pub trait MovieRepository {
  async fn list_movies(&self) -> Result<Vec<Movie>, RepositoryError>;
  async fn find_movie(&self, id: &str) -> Result<Option<Movie>, RepositoryError>;
  async fn create_movie(&self, movie: Movie) -> Result<Movie, RepositoryError>;
  /// Replaces the stored movie with the same id. `None` when it is gone.
  async fn update_movie(
    &self,
    movie: Movie,
  ) -> Result<Option<Movie>, RepositoryError>;
  /// Removes the movie and every watchlist entry pointing at it.
  async fn delete_movie(&self, id: &str) -> Result<bool, RepositoryError>;
}

// ### In-memory implementation ###

#[cfg(any(test, not(feature = "mongodb")))]
impl MovieRepository for InMemoryStore {
  async fn list_movies(&self) -> Result<Vec<Movie>, RepositoryError> {
    Ok(read(&self.movies)?.clone())
  }

  async fn find_movie(&self, id: &str) -> Result<Option<Movie>, RepositoryError> {
    let movies = read(&self.movies)?;
    Ok(movies.iter().find(|movie| movie.id == id).cloned())
  }

  async fn create_movie(&self, movie: Movie) -> Result<Movie, RepositoryError> {
    write(&self.movies)?.push(movie.clone());
    Ok(movie)
  }

  async fn update_movie(
    &self,
    movie: Movie,
  ) -> Result<Option<Movie>, RepositoryError> {
    let mut movies = write(&self.movies)?;
    Ok(
      movies
        .iter_mut()
        .find(|existing| existing.id == movie.id)
        .map(|existing| {
          *existing = movie;
          existing.clone()
        }),
    )
  }

  async fn delete_movie(&self, id: &str) -> Result<bool, RepositoryError> {
    let mut movies = write(&self.movies)?;
    let before = movies.len();
    movies.retain(|movie| movie.id != id);
    if movies.len() == before {
      return Ok(false);
    }
    write(&self.watch_items)?.retain(|item| item.movie_id != id);
    Ok(true)
  }
}

// ### MongoDB implementation ###

#[cfg(feature = "mongodb")]
impl MovieRepository for MongoStore {
  async fn list_movies(&self) -> Result<Vec<Movie>, RepositoryError> {
    let mut cursor = self.movies().find(doc! {}).await?;
    let mut movies = Vec::new();
    while cursor.advance().await? {
      movies.push(cursor.deserialize_current()?);
    }
    Ok(movies)
  }

  async fn find_movie(&self, id: &str) -> Result<Option<Movie>, RepositoryError> {
    Ok(self.movies().find_one(doc! { "id": id }).await?)
  }

  async fn create_movie(&self, movie: Movie) -> Result<Movie, RepositoryError> {
    self.movies().insert_one(&movie).await?;
    Ok(movie)
  }

  async fn update_movie(
    &self,
    movie: Movie,
  ) -> Result<Option<Movie>, RepositoryError> {
    let result = self
      .movies()
      .replace_one(doc! { "id": movie.id.as_str() }, &movie)
      .await?;
    Ok((result.matched_count > 0).then_some(movie))
  }

  async fn delete_movie(&self, id: &str) -> Result<bool, RepositoryError> {
    let result = self.movies().delete_one(doc! { "id": id }).await?;
    if result.deleted_count == 0 {
      return Ok(false);
    }
    self
      .watch_items()
      .delete_many(doc! { "movieId": id })
      .await?;
    Ok(true)
  }
}

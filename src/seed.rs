use chrono::{NaiveDate, Utc};
use nanoid::nanoid;
use thiserror::Error;
use validator::ValidationError;

use crate::movies::model::movie::Movie;
use crate::shared::hash_worker::HashWorkerError;
use crate::shared::role::Role;
use crate::shared::store::{RepositoryError, Store};
use crate::shared::validation::validate_password_strength;
use crate::users::model::user::User;
use crate::users::repository::user_repository::FindOneProperty;
use crate::AppState;

#[derive(Debug, Error)]
pub enum SeedError {
  #[error("Seeding storage failed: {0}")]
  Repository(#[from] RepositoryError),
  #[error("Hashing a seed password failed: {0}")]
  Hash(#[from] HashWorkerError),
  #[error("SEED_USER_PASSWORD is rejected: {0}")]
  WeakPassword(ValidationError),
  #[error("Invalid release date for {0}")]
  ReleaseDate(&'static str),
}

struct SeedMovie {
  title: &'static str,
  overview: &'static str,
  release_date: (i32, u32, u32),
  poster_path: &'static str,
  rating: f32,
  genres: &'static [&'static str],
}

struct SeedUser {
  name: &'static str,
  email: &'static str,
  role: Role,
  movies: &'static [SeedMovie],
}

const SEED_USERS: &[SeedUser] = &[
  SeedUser {
    name: "Admin",
    email: "admin@movietracker.dev",
    role: Role::Admin,
    movies: &[],
  },
  SeedUser {
    name: "Nora Lane",
    email: "nora@movietracker.dev",
    role: Role::User,
    movies: &[
      SeedMovie {
        title: "Inception",
        overview: "A mind-bending sci-fi thriller",
        release_date: (2010, 7, 16),
        poster_path: "/inception.jpg",
        rating: 8.8,
        genres: &["Sci-Fi", "Action"],
      },
      SeedMovie {
        title: "Interstellar",
        overview: "Exploration of space and time",
        release_date: (2014, 11, 7),
        poster_path: "/interstellar.jpg",
        rating: 8.6,
        genres: &["Sci-Fi", "Drama"],
      },
    ],
  },
  SeedUser {
    name: "Omar Reyes",
    email: "omar@movietracker.dev",
    role: Role::User,
    movies: &[
      SeedMovie {
        title: "The Matrix",
        overview: "Virtual reality and AI",
        release_date: (1999, 3, 31),
        poster_path: "/matrix.jpg",
        rating: 8.7,
        genres: &["Sci-Fi", "Action"],
      },
      SeedMovie {
        title: "Avatar",
        overview: "A journey to Pandora",
        release_date: (2009, 12, 18),
        poster_path: "/avatar.jpg",
        rating: 7.9,
        genres: &["Fantasy", "Sci-Fi"],
      },
    ],
  },
  SeedUser {
    name: "Priya Shah",
    email: "priya@movietracker.dev",
    role: Role::User,
    movies: &[SeedMovie {
      title: "Fight Club",
      overview: "An underground fight club",
      release_date: (1999, 10, 15),
      poster_path: "/fightclub.jpg",
      rating: 8.8,
      genres: &["Drama", "Thriller"],
    }],
  },
  SeedUser {
    name: "Leo Martin",
    email: "leo@movietracker.dev",
    role: Role::User,
    movies: &[SeedMovie {
      title: "Titanic",
      overview: "Romance on the Titanic ship",
      release_date: (1997, 12, 19),
      poster_path: "/titanic.jpg",
      rating: 7.8,
      genres: &["Romance", "Drama"],
    }],
  },
  SeedUser {
    name: "Ada Brooks",
    email: "ada@movietracker.dev",
    role: Role::User,
    movies: &[SeedMovie {
      title: "Gladiator",
      overview: "A Roman general becomes a gladiator",
      release_date: (2000, 5, 5),
      poster_path: "/gladiator.jpg",
      rating: 8.5,
      genres: &["Action", "Drama"],
    }],
  },
  SeedUser {
    name: "Sam Kito",
    email: "sam@movietracker.dev",
    role: Role::User,
    movies: &[SeedMovie {
      title: "The Lord of the Rings: The Fellowship of the Ring",
      overview: "A quest to destroy the One Ring",
      release_date: (2001, 12, 19),
      poster_path: "/lotr1.jpg",
      rating: 8.8,
      genres: &["Fantasy", "Adventure"],
    }],
  },
];

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
  pub users_created: usize,
  pub movies_created: usize,
}

impl SeedMovie {
  fn to_movie(&self, owner: &User) -> Result<Movie, SeedError> {
    let (year, month, day) = self.release_date;
    let release_date = NaiveDate::from_ymd_opt(year, month, day)
      .ok_or(SeedError::ReleaseDate(self.title))?;
    let now = Utc::now();
    Ok(Movie {
      id: nanoid!(),
      title: self.title.to_string(),
      overview: self.overview.to_string(),
      release_date,
      poster_path: Some(self.poster_path.to_string()),
      rating: self.rating,
      genres: self.genres.iter().map(|genre| genre.to_string()).collect(),
      user_id: owner.id.clone(),
      created_at: now,
      updated_at: now,
    })
  }
}

/// Creates the demo accounts, all sharing `password`, together with their
/// movies. Accounts that already exist are left alone, movies included, so
/// reruns add nothing.
pub async fn seed<S: Store>(
  state: &AppState<S>,
  password: &str,
) -> Result<SeedReport, SeedError> {
  validate_password_strength(password).map_err(SeedError::WeakPassword)?;
  let mut report = SeedReport::default();
  let password_hash = state.hasher.hash_password(password).await?;

  for seed_user in SEED_USERS {
    if state
      .store
      .find_user(FindOneProperty::Email(seed_user.email))
      .await?
      .is_some()
    {
      tracing::debug!(email = seed_user.email, "Seed user exists, skipping");
      continue;
    }

    let user = state
      .store
      .create_user(User::new(
        seed_user.name.to_string(),
        seed_user.email.to_string(),
        password_hash.clone(),
        seed_user.role,
      ))
      .await?;
    report.users_created += 1;

    for seed_movie in seed_user.movies {
      state.store.create_movie(seed_movie.to_movie(&user)?).await?;
      report.movies_created += 1;
    }
    tracing::info!(email = %user.email, movies = seed_user.movies.len(), "Seeded user");
  }

  tracing::info!(
    users = report.users_created,
    movies = report.movies_created,
    "Seeding completed"
  );
  Ok(report)
}

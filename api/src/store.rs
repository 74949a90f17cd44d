//! In-memory movie catalog
//!
//! `MovieStore` owns the ordered collection of movies behind a
//! `tokio::sync::RwLock`. Reads share the lock; create, update and delete
//! take it exclusively, so at most one mutation runs at a time.

use std::collections::HashSet;
use std::path::Path;

use movies_shared::{Movie, MoviePatch, NewMovie};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Dataset bundled into the binary and used when no override path is configured
const BUNDLED_MOVIES: &str = include_str!("../data/movies.json");

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Failed to read seed file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed seed dataset: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Duplicate movie id in seed dataset: {0}")]
    DuplicateId(String),
}

#[derive(Debug, Default)]
pub struct MovieStore {
    movies: RwLock<Vec<Movie>>,
}

impl MovieStore {
    /// Build a store from already-trusted records, refusing duplicate ids.
    pub fn from_movies(movies: Vec<Movie>) -> Result<Self, SeedError> {
        let mut seen = HashSet::with_capacity(movies.len());
        for movie in &movies {
            if !seen.insert(movie.id.as_str()) {
                return Err(SeedError::DuplicateId(movie.id.clone()));
            }
        }

        Ok(Self {
            movies: RwLock::new(movies),
        })
    }

    /// Parse a JSON array of movies. Records are deserialized, not re-validated.
    pub fn from_json(json: &str) -> Result<Self, SeedError> {
        let movies: Vec<Movie> = serde_json::from_str(json)?;
        Self::from_movies(movies)
    }

    /// The dataset shipped with the service
    pub fn bundled() -> Result<Self, SeedError> {
        Self::from_json(BUNDLED_MOVIES)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// All movies in insertion order, or those having a genre equal to
    /// `genre` ignoring case.
    pub async fn list(&self, genre: Option<&str>) -> Vec<Movie> {
        let movies = self.movies.read().await;
        match genre {
            Some(genre) => movies
                .iter()
                .filter(|movie| movie.has_genre(genre))
                .cloned()
                .collect(),
            None => movies.clone(),
        }
    }

    pub async fn get(&self, id: &str) -> Option<Movie> {
        let movies = self.movies.read().await;
        movies.iter().find(|movie| movie.id == id).cloned()
    }

    /// Append a new movie under a freshly generated id
    pub async fn create(&self, new_movie: NewMovie) -> Movie {
        let mut movies = self.movies.write().await;

        let id = loop {
            let candidate = Uuid::new_v4().to_string();
            if !movies.iter().any(|movie| movie.id == candidate) {
                break candidate;
            }
        };

        let movie = new_movie.into_movie(id);
        movies.push(movie.clone());
        movie
    }

    /// Merge `patch` into the movie with `id`. `None` if there is no such movie.
    pub async fn update(&self, id: &str, patch: MoviePatch) -> Option<Movie> {
        let mut movies = self.movies.write().await;
        let movie = movies.iter_mut().find(|movie| movie.id == id)?;
        movie.apply(patch);
        Some(movie.clone())
    }

    /// Remove the movie with `id`, returning it. Later movies keep their order.
    pub async fn delete(&self, id: &str) -> Option<Movie> {
        let mut movies = self.movies.write().await;
        let index = movies.iter().position(|movie| movie.id == id)?;
        Some(movies.remove(index))
    }

    pub async fn len(&self) -> usize {
        self.movies.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.movies.read().await.is_empty()
    }
}

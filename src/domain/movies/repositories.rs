//! Movie repository trait and filter parameters

use async_trait::async_trait;

use super::entities::{Movie, MovieChanges, NewMovie};
use super::errors::MovieError;

/// Filter predicate set for movie searches.
///
/// All set fields must match; results are ordered by popularity descending.
#[derive(Debug, Clone, Default)]
pub struct MovieFilter {
    /// Free-text match against title, overview, cast, and director
    pub query: Option<String>,
    /// Genres that must all be present
    pub genres: Vec<String>,
    /// Minimum vote average
    pub min_rating: Option<f64>,
    /// Maximum runtime in minutes
    pub max_runtime: Option<i32>,
    /// Earliest release year (inclusive)
    pub year_from: Option<i32>,
    /// Latest release year (inclusive)
    pub year_to: Option<i32>,
    /// Whether adult titles may be returned
    pub include_adult: bool,
    pub limit: i64,
    pub offset: i64,
}

/// Movie repository trait for catalog persistence
#[async_trait]
pub trait IMovieRepository: Send + Sync {
    /// Find a movie by id
    async fn find_by_id(&self, id: i64) -> Result<Option<Movie>, MovieError>;

    /// Search the catalog with the given filter, popularity-descending
    async fn search(&self, filter: &MovieFilter) -> Result<Vec<Movie>, MovieError>;

    /// Most popular non-adult movies
    async fn popular(&self, limit: i64, offset: i64) -> Result<Vec<Movie>, MovieError>;

    /// Non-adult movies with a known release date and popularity above the threshold
    async fn trending(&self, min_popularity: f64, limit: i64) -> Result<Vec<Movie>, MovieError>;

    /// Non-adult movies in a genre with at least `min_vote_count` votes
    async fn by_genre(
        &self,
        genre: &str,
        min_vote_count: i64,
        limit: i64,
    ) -> Result<Vec<Movie>, MovieError>;

    /// Non-adult movies by a director
    async fn by_director(&self, director: &str, limit: i64) -> Result<Vec<Movie>, MovieError>;

    /// Non-adult movies sharing any of the given genres, excluding one id
    async fn by_any_genre(
        &self,
        genres: &[String],
        exclude_id: i64,
        limit: i64,
    ) -> Result<Vec<Movie>, MovieError>;

    /// Insert a new movie and return the stored row
    async fn insert(&self, new_movie: &NewMovie) -> Result<Movie, MovieError>;

    /// Apply a partial update; returns None when the movie does not exist
    async fn update(&self, id: i64, changes: &MovieChanges) -> Result<Option<Movie>, MovieError>;
}

//! Movie catalog use cases

use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::domain::movies::{
    entities::{Movie, MovieChanges, NewMovie, ScoredMovie},
    errors::MovieError,
    repositories::{IMovieRepository, MovieFilter},
};
use crate::infrastructure::cache::CacheService;

/// TTL for cached popular listings
const POPULAR_CACHE_TTL: Duration = Duration::from_secs(1800);
/// TTL for cached genre recommendations
const GENRE_CACHE_TTL: Duration = Duration::from_secs(3600);
/// Minimum vote count for genre recommendations to filter out fringe titles
const GENRE_MIN_VOTE_COUNT: i64 = 100;
/// Popularity threshold for the trending listing
const TRENDING_MIN_POPULARITY: f64 = 10.0;
/// How many of a movie's genres feed the similarity query
const SIMILAR_GENRE_LIMIT: usize = 3;

/// Use case for fetching a single movie
pub struct GetMovieUseCase {
    movie_repository: Arc<dyn IMovieRepository>,
}

impl GetMovieUseCase {
    pub fn new(movie_repository: Arc<dyn IMovieRepository>) -> Self {
        Self { movie_repository }
    }

    pub async fn execute(&self, id: i64) -> Result<Movie, MovieError> {
        self.movie_repository
            .find_by_id(id)
            .await?
            .ok_or(MovieError::NotFound { id })
    }
}

/// Use case for filtered catalog search
pub struct SearchMoviesUseCase {
    movie_repository: Arc<dyn IMovieRepository>,
}

impl SearchMoviesUseCase {
    pub fn new(movie_repository: Arc<dyn IMovieRepository>) -> Self {
        Self { movie_repository }
    }

    pub async fn execute(&self, filter: MovieFilter) -> Result<Vec<Movie>, MovieError> {
        for year in [filter.year_from, filter.year_to].into_iter().flatten() {
            if !(1888..=2100).contains(&year) {
                return Err(MovieError::Validation {
                    reason: format!("Release year out of range: {}", year),
                });
            }
        }

        if let (Some(from), Some(to)) = (filter.year_from, filter.year_to) {
            if to < from {
                return Err(MovieError::Validation {
                    reason: "year_to must be greater than or equal to year_from".to_string(),
                });
            }
        }

        self.movie_repository.search(&filter).await
    }
}

/// Use case for the popular movies listing, cached as a whole page
pub struct PopularMoviesUseCase {
    movie_repository: Arc<dyn IMovieRepository>,
    cache: Arc<dyn CacheService>,
}

impl PopularMoviesUseCase {
    pub fn new(movie_repository: Arc<dyn IMovieRepository>, cache: Arc<dyn CacheService>) -> Self {
        Self {
            movie_repository,
            cache,
        }
    }

    pub async fn execute(&self, limit: i64, offset: i64) -> Result<Vec<Movie>, MovieError> {
        let cache_key = format!("popular_movies:{}:{}", limit, offset);

        if let Some(cached) = self.cache.get(&cache_key).await {
            match serde_json::from_str::<Vec<Movie>>(&cached) {
                Ok(movies) => return Ok(movies),
                Err(e) => warn!("Discarding undecodable cache entry {}: {}", cache_key, e),
            }
        }

        let movies = self.movie_repository.popular(limit, offset).await?;

        if !movies.is_empty() {
            if let Ok(serialized) = serde_json::to_string(&movies) {
                self.cache
                    .set(&cache_key, &serialized, POPULAR_CACHE_TTL)
                    .await;
            }
        }

        Ok(movies)
    }
}

/// Use case for the trending listing (popular and recently released)
pub struct TrendingMoviesUseCase {
    movie_repository: Arc<dyn IMovieRepository>,
}

impl TrendingMoviesUseCase {
    pub fn new(movie_repository: Arc<dyn IMovieRepository>) -> Self {
        Self { movie_repository }
    }

    pub async fn execute(&self, limit: i64) -> Result<Vec<Movie>, MovieError> {
        self.movie_repository
            .trending(TRENDING_MIN_POPULARITY, limit)
            .await
    }
}

/// Use case for genre recommendations, cached per genre
pub struct RecommendByGenreUseCase {
    movie_repository: Arc<dyn IMovieRepository>,
    cache: Arc<dyn CacheService>,
}

impl RecommendByGenreUseCase {
    pub fn new(movie_repository: Arc<dyn IMovieRepository>, cache: Arc<dyn CacheService>) -> Self {
        Self {
            movie_repository,
            cache,
        }
    }

    pub async fn execute(&self, genre: &str, limit: i64) -> Result<Vec<ScoredMovie>, MovieError> {
        let cache_key = format!("genre_recommendations:{}:{}", genre, limit);

        if let Some(cached) = self.cache.get(&cache_key).await {
            match serde_json::from_str::<Vec<ScoredMovie>>(&cached) {
                Ok(recommendations) => return Ok(recommendations),
                Err(e) => warn!("Discarding undecodable cache entry {}: {}", cache_key, e),
            }
        }

        let movies = self
            .movie_repository
            .by_genre(genre, GENRE_MIN_VOTE_COUNT, limit)
            .await?;

        let recommendations: Vec<ScoredMovie> = movies
            .into_iter()
            .map(|movie| {
                let reason = format!("Popular {} movie with high ratings", genre);
                ScoredMovie::new(movie, reason)
            })
            .collect();

        if !recommendations.is_empty() {
            if let Ok(serialized) = serde_json::to_string(&recommendations) {
                self.cache
                    .set(&cache_key, &serialized, GENRE_CACHE_TTL)
                    .await;
            }
        }

        Ok(recommendations)
    }
}

/// Use case for director recommendations
pub struct RecommendByDirectorUseCase {
    movie_repository: Arc<dyn IMovieRepository>,
}

impl RecommendByDirectorUseCase {
    pub fn new(movie_repository: Arc<dyn IMovieRepository>) -> Self {
        Self { movie_repository }
    }

    pub async fn execute(
        &self,
        director: &str,
        limit: i64,
    ) -> Result<Vec<ScoredMovie>, MovieError> {
        let movies = self.movie_repository.by_director(director, limit).await?;

        Ok(movies
            .into_iter()
            .map(|movie| {
                let reason = format!("Directed by {}", director);
                ScoredMovie::new(movie, reason)
            })
            .collect())
    }
}

/// Use case for genre-overlap similarity
pub struct SimilarMoviesUseCase {
    movie_repository: Arc<dyn IMovieRepository>,
}

impl SimilarMoviesUseCase {
    pub fn new(movie_repository: Arc<dyn IMovieRepository>) -> Self {
        Self { movie_repository }
    }

    /// Movies sharing any of the reference movie's top genres.
    ///
    /// An unknown movie id or a movie without genres yields an empty list,
    /// not an error.
    pub async fn execute(&self, movie_id: i64, limit: i64) -> Result<Vec<ScoredMovie>, MovieError> {
        let Some(movie) = self.movie_repository.find_by_id(movie_id).await? else {
            return Ok(Vec::new());
        };

        let mut genres = movie.genre_list();
        genres.truncate(SIMILAR_GENRE_LIMIT);
        if genres.is_empty() {
            return Ok(Vec::new());
        }

        let candidates = self
            .movie_repository
            .by_any_genre(&genres, movie_id, limit)
            .await?;

        Ok(candidates
            .into_iter()
            .map(|candidate| {
                let reason = format!("Similar to '{}' (same genres)", movie.title);
                ScoredMovie::new(candidate, reason)
            })
            .collect())
    }
}

/// Use case for adding a movie to the catalog
pub struct CreateMovieUseCase {
    movie_repository: Arc<dyn IMovieRepository>,
}

impl CreateMovieUseCase {
    pub fn new(movie_repository: Arc<dyn IMovieRepository>) -> Self {
        Self { movie_repository }
    }

    pub async fn execute(&self, new_movie: NewMovie) -> Result<Movie, MovieError> {
        if new_movie.title.trim().is_empty() {
            return Err(MovieError::Validation {
                reason: "Title must not be empty".to_string(),
            });
        }
        if !(0.0..=10.0).contains(&new_movie.vote_average) {
            return Err(MovieError::Validation {
                reason: "vote_average must be between 0 and 10".to_string(),
            });
        }

        self.movie_repository.insert(&new_movie).await
    }
}

/// Use case for partially updating a movie
pub struct UpdateMovieUseCase {
    movie_repository: Arc<dyn IMovieRepository>,
}

impl UpdateMovieUseCase {
    pub fn new(movie_repository: Arc<dyn IMovieRepository>) -> Self {
        Self { movie_repository }
    }

    pub async fn execute(&self, id: i64, changes: MovieChanges) -> Result<Movie, MovieError> {
        if let Some(title) = &changes.title {
            if title.trim().is_empty() {
                return Err(MovieError::Validation {
                    reason: "Title must not be empty".to_string(),
                });
            }
        }
        if let Some(vote_average) = changes.vote_average {
            if !(0.0..=10.0).contains(&vote_average) {
                return Err(MovieError::Validation {
                    reason: "vote_average must be between 0 and 10".to_string(),
                });
            }
        }

        self.movie_repository
            .update(id, &changes)
            .await?
            .ok_or(MovieError::NotFound { id })
    }
}

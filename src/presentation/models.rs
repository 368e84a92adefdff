//! API request and response models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::movies::entities::{Movie, MovieChanges, NewMovie, ScoredMovie};
use crate::domain::ratings::UserRating;

/// Uniform error envelope returned by every failing endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Stable machine-readable error code
    #[schema(example = "VALIDATION_ERROR")]
    pub code: String,
    /// Human-readable description
    #[schema(example = "year_to must be greater than or equal to year_from")]
    pub message: String,
    /// Optional structured details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Correlates the response with server logs
    pub request_id: Uuid,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Build an error envelope with a fresh request id
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
            request_id: Uuid::new_v4(),
            timestamp: Utc::now(),
        }
    }
}

/// Movie representation returned by the API
#[derive(Debug, Serialize, ToSchema)]
pub struct MovieResponse {
    pub id: i64,
    #[schema(example = "Heat")]
    pub title: String,
    pub original_title: Option<String>,
    pub overview: Option<String>,
    pub tagline: Option<String>,
    pub release_date: Option<DateTime<Utc>>,
    pub runtime: Option<i32>,
    pub vote_average: f64,
    pub vote_count: i64,
    pub popularity: f64,
    pub budget: i64,
    pub revenue: i64,
    pub status: Option<String>,
    pub original_language: Option<String>,
    #[schema(example = "Action, Crime, Drama")]
    pub genres: Option<String>,
    pub production_companies: Option<String>,
    pub production_countries: Option<String>,
    pub director: Option<String>,
    pub cast: Option<String>,
    pub adult: bool,
    pub video: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Movie> for MovieResponse {
    fn from(movie: Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title,
            original_title: movie.original_title,
            overview: movie.overview,
            tagline: movie.tagline,
            release_date: movie.release_date,
            runtime: movie.runtime,
            vote_average: movie.vote_average,
            vote_count: movie.vote_count,
            popularity: movie.popularity,
            budget: movie.budget,
            revenue: movie.revenue,
            status: movie.status,
            original_language: movie.original_language,
            genres: movie.genres,
            production_companies: movie.production_companies,
            production_countries: movie.production_countries,
            director: movie.director,
            cast: movie.cast,
            adult: movie.adult,
            video: movie.video,
            created_at: movie.created_at,
            updated_at: movie.updated_at,
        }
    }
}

/// A scored recommendation with its rationale
#[derive(Debug, Serialize, ToSchema)]
pub struct MovieRecommendationResponse {
    pub movie: MovieResponse,
    /// Popularity-derived recommendation score
    #[schema(example = 42.7)]
    pub score: f64,
    /// Why this movie was recommended
    #[schema(example = "Popular Action movie with high ratings")]
    pub reason: String,
}

impl From<ScoredMovie> for MovieRecommendationResponse {
    fn from(scored: ScoredMovie) -> Self {
        Self {
            movie: MovieResponse::from(scored.movie),
            score: scored.score,
            reason: scored.reason,
        }
    }
}

/// Request model for creating a movie
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMovieRequest {
    #[schema(example = "Heat")]
    pub title: String,
    pub original_title: Option<String>,
    pub overview: Option<String>,
    pub tagline: Option<String>,
    pub release_date: Option<DateTime<Utc>>,
    pub runtime: Option<i32>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: i64,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub budget: i64,
    #[serde(default)]
    pub revenue: i64,
    pub status: Option<String>,
    pub original_language: Option<String>,
    pub genres: Option<String>,
    pub production_companies: Option<String>,
    pub production_countries: Option<String>,
    pub director: Option<String>,
    pub cast: Option<String>,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub video: bool,
}

impl From<CreateMovieRequest> for NewMovie {
    fn from(request: CreateMovieRequest) -> Self {
        NewMovie {
            title: request.title,
            original_title: request.original_title,
            overview: request.overview,
            tagline: request.tagline,
            release_date: request.release_date,
            runtime: request.runtime,
            vote_average: request.vote_average,
            vote_count: request.vote_count,
            popularity: request.popularity,
            budget: request.budget,
            revenue: request.revenue,
            status: request.status,
            original_language: request.original_language,
            genres: request.genres,
            production_companies: request.production_companies,
            production_countries: request.production_countries,
            director: request.director,
            cast: request.cast,
            adult: request.adult,
            video: request.video,
        }
    }
}

/// Request model for partially updating a movie
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateMovieRequest {
    pub title: Option<String>,
    pub original_title: Option<String>,
    pub overview: Option<String>,
    pub tagline: Option<String>,
    pub release_date: Option<DateTime<Utc>>,
    pub runtime: Option<i32>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
    pub popularity: Option<f64>,
    pub budget: Option<i64>,
    pub revenue: Option<i64>,
    pub status: Option<String>,
    pub original_language: Option<String>,
    pub genres: Option<String>,
    pub production_companies: Option<String>,
    pub production_countries: Option<String>,
    pub director: Option<String>,
    pub cast: Option<String>,
    pub adult: Option<bool>,
    pub video: Option<bool>,
}

impl From<UpdateMovieRequest> for MovieChanges {
    fn from(request: UpdateMovieRequest) -> Self {
        MovieChanges {
            title: request.title,
            original_title: request.original_title,
            overview: request.overview,
            tagline: request.tagline,
            release_date: request.release_date,
            runtime: request.runtime,
            vote_average: request.vote_average,
            vote_count: request.vote_count,
            popularity: request.popularity,
            budget: request.budget,
            revenue: request.revenue,
            status: request.status,
            original_language: request.original_language,
            genres: request.genres,
            production_companies: request.production_companies,
            production_countries: request.production_countries,
            director: request.director,
            cast: request.cast,
            adult: request.adult,
            video: request.video,
        }
    }
}

/// Pagination parameters shared by listing endpoints
#[derive(Debug, Deserialize, IntoParams)]
pub struct PageParams {
    /// Number of results to return (1-100)
    pub limit: Option<i64>,
    /// Pagination offset
    pub offset: Option<i64>,
}

impl PageParams {
    /// Clamp to sane bounds with the given default page size
    pub fn clamped(&self, default_limit: i64) -> (i64, i64) {
        let limit = self.limit.unwrap_or(default_limit).clamp(1, 100);
        let offset = self.offset.unwrap_or(0).max(0);
        (limit, offset)
    }
}

/// Query parameters for movie search
#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Free-text search over title, overview, cast, and director
    pub query: Option<String>,
    /// Comma-separated genres that must all match
    pub genres: Option<String>,
    /// Minimum vote average (0-10)
    pub min_rating: Option<f64>,
    /// Maximum runtime in minutes
    pub max_runtime: Option<i32>,
    /// Earliest release year
    pub year_from: Option<i32>,
    /// Latest release year
    pub year_to: Option<i32>,
    /// Include adult titles
    pub include_adult: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Request model for rating a movie
#[derive(Debug, Deserialize, ToSchema)]
pub struct RateMovieRequest {
    pub movie_id: i64,
    /// Rating on a 1-10 scale
    #[schema(example = 8)]
    pub rating: i32,
    pub review: Option<String>,
}

/// Rating representation returned by the API
#[derive(Debug, Serialize, ToSchema)]
pub struct RatingResponse {
    pub id: i64,
    pub user_id: i64,
    pub movie_id: i64,
    pub rating: i32,
    pub review: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRating> for RatingResponse {
    fn from(rating: UserRating) -> Self {
        Self {
            id: rating.id,
            user_id: rating.user_id,
            movie_id: rating.movie_id,
            rating: rating.rating,
            review: rating.review,
            created_at: rating.created_at,
            updated_at: rating.updated_at,
        }
    }
}

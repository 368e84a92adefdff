//! User movie ratings: entity, errors, and persistence trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::auth::value_objects::UserId;

/// A user's rating of a movie on a 1-10 scale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRating {
    pub id: i64,
    pub user_id: i64,
    pub movie_id: i64,
    pub rating: i32,
    pub review: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for creating or replacing a rating
#[derive(Debug, Clone)]
pub struct NewRating {
    pub user_id: UserId,
    pub movie_id: i64,
    pub rating: i32,
    pub review: Option<String>,
}

/// Rating-specific domain errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RatingError {
    #[error("Rating not found for movie {movie_id}")]
    NotFound { movie_id: i64 },

    #[error("Invalid rating: {reason}")]
    Validation { reason: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

/// Rating repository trait.
///
/// One rating per (user, movie) pair; `upsert` replaces an existing rating.
#[async_trait]
pub trait IRatingRepository: Send + Sync {
    /// Create or update the rating for a (user, movie) pair
    async fn upsert(&self, rating: &NewRating) -> Result<UserRating, RatingError>;

    /// A user's ratings, newest first
    async fn list_for_user(
        &self,
        user_id: UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserRating>, RatingError>;

    /// Delete a rating; Ok(true) if one existed
    async fn delete(&self, user_id: UserId, movie_id: i64) -> Result<bool, RatingError>;
}

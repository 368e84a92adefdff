//! SQLx implementation of the rating repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::auth::value_objects::UserId;
use crate::domain::ratings::{IRatingRepository, NewRating, RatingError, UserRating};

/// SQLx implementation of the rating repository
pub struct PgRatingRepository {
    pool: Arc<PgPool>,
}

impl PgRatingRepository {
    /// Create a new SQLx rating repository
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

/// Raw database row for a rating
#[derive(sqlx::FromRow)]
struct RatingRow {
    id: i64,
    user_id: i64,
    movie_id: i64,
    rating: i32,
    review: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<RatingRow> for UserRating {
    fn from(row: RatingRow) -> Self {
        UserRating {
            id: row.id,
            user_id: row.user_id,
            movie_id: row.movie_id,
            rating: row.rating,
            review: row.review,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn database_error(context: &str, e: sqlx::Error) -> RatingError {
    tracing::error!("Database error {}: {}", context, e);
    RatingError::Database {
        message: e.to_string(),
    }
}

#[async_trait]
impl IRatingRepository for PgRatingRepository {
    async fn upsert(&self, rating: &NewRating) -> Result<UserRating, RatingError> {
        let row = sqlx::query_as::<_, RatingRow>(
            "INSERT INTO user_ratings (user_id, movie_id, rating, review) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id, movie_id) DO UPDATE \
             SET rating = EXCLUDED.rating, \
                 review = COALESCE(EXCLUDED.review, user_ratings.review), \
                 updated_at = now() \
             RETURNING id, user_id, movie_id, rating, review, created_at, updated_at",
        )
        .bind(rating.user_id.as_i64())
        .bind(rating.movie_id)
        .bind(rating.rating)
        .bind(&rating.review)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| database_error("upserting rating", e))?;

        Ok(UserRating::from(row))
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserRating>, RatingError> {
        let rows = sqlx::query_as::<_, RatingRow>(
            "SELECT id, user_id, movie_id, rating, review, created_at, updated_at \
             FROM user_ratings WHERE user_id = $1 \
             ORDER BY created_at DESC OFFSET $2 LIMIT $3",
        )
        .bind(user_id.as_i64())
        .bind(offset)
        .bind(limit)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| database_error("listing ratings", e))?;

        Ok(rows.into_iter().map(UserRating::from).collect())
    }

    async fn delete(&self, user_id: UserId, movie_id: i64) -> Result<bool, RatingError> {
        let result = sqlx::query("DELETE FROM user_ratings WHERE user_id = $1 AND movie_id = $2")
            .bind(user_id.as_i64())
            .bind(movie_id)
            .execute(&*self.pool)
            .await
            .map_err(|e| database_error("deleting rating", e))?;

        Ok(result.rows_affected() > 0)
    }
}

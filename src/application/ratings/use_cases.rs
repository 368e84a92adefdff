//! User rating use cases

use std::sync::Arc;

use crate::domain::auth::value_objects::UserId;
use crate::domain::ratings::{IRatingRepository, NewRating, RatingError, UserRating};

/// Use case for creating or replacing a user's rating of a movie
pub struct UpsertRatingUseCase {
    rating_repository: Arc<dyn IRatingRepository>,
}

impl UpsertRatingUseCase {
    pub fn new(rating_repository: Arc<dyn IRatingRepository>) -> Self {
        Self { rating_repository }
    }

    pub async fn execute(
        &self,
        user_id: UserId,
        movie_id: i64,
        rating: i32,
        review: Option<String>,
    ) -> Result<UserRating, RatingError> {
        if !(1..=10).contains(&rating) {
            return Err(RatingError::Validation {
                reason: "Rating must be between 1 and 10".to_string(),
            });
        }

        self.rating_repository
            .upsert(&NewRating {
                user_id,
                movie_id,
                rating,
                review,
            })
            .await
    }
}

/// Use case for listing a user's ratings, newest first
pub struct ListRatingsUseCase {
    rating_repository: Arc<dyn IRatingRepository>,
}

impl ListRatingsUseCase {
    pub fn new(rating_repository: Arc<dyn IRatingRepository>) -> Self {
        Self { rating_repository }
    }

    pub async fn execute(
        &self,
        user_id: UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserRating>, RatingError> {
        self.rating_repository
            .list_for_user(user_id, limit, offset)
            .await
    }
}

/// Use case for removing a user's rating of a movie
pub struct DeleteRatingUseCase {
    rating_repository: Arc<dyn IRatingRepository>,
}

impl DeleteRatingUseCase {
    pub fn new(rating_repository: Arc<dyn IRatingRepository>) -> Self {
        Self { rating_repository }
    }

    pub async fn execute(&self, user_id: UserId, movie_id: i64) -> Result<(), RatingError> {
        let deleted = self.rating_repository.delete(user_id, movie_id).await?;

        if !deleted {
            return Err(RatingError::NotFound { movie_id });
        }

        Ok(())
    }
}

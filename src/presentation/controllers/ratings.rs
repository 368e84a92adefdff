//! User rating endpoints (session-only: an API key cannot rate movies)

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::domain::ratings::RatingError;
use crate::presentation::auth::RequireActiveUser;
use crate::presentation::controllers::AppState;
use crate::presentation::models::{ErrorResponse, PageParams, RateMovieRequest, RatingResponse};

/// Default page size for the ratings listing
const DEFAULT_PAGE_SIZE: i64 = 20;

/// Map a rating domain error onto the HTTP error envelope
fn rating_error_response(error: RatingError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, code) = match &error {
        RatingError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        RatingError::Validation { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        RatingError::Database { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    };

    let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("Rating operation failed: {}", error);
        "An internal error occurred".to_string()
    } else {
        error.to_string()
    };

    (status, Json(ErrorResponse::new(code, message)))
}

/// PUT /api/v1/users/me/ratings create or replace a rating
#[utoipa::path(
    put,
    path = "/api/v1/users/me/ratings",
    tag = "ratings",
    request_body = RateMovieRequest,
    responses(
        (status = 200, description = "Rating stored", body = RatingResponse),
        (status = 400, description = "Invalid rating or inactive account", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse)
    )
)]
pub async fn upsert_rating(
    State(state): State<AppState>,
    RequireActiveUser(user): RequireActiveUser,
    Json(request): Json<RateMovieRequest>,
) -> Result<Json<RatingResponse>, (StatusCode, Json<ErrorResponse>)> {
    let rating = state
        .upsert_rating_use_case
        .execute(user.id, request.movie_id, request.rating, request.review)
        .await
        .map_err(rating_error_response)?;

    Ok(Json(RatingResponse::from(rating)))
}

/// GET /api/v1/users/me/ratings list own ratings, newest first
#[utoipa::path(
    get,
    path = "/api/v1/users/me/ratings",
    tag = "ratings",
    params(PageParams),
    responses(
        (status = 200, description = "The user's ratings", body = [RatingResponse]),
        (status = 401, description = "Authentication required", body = ErrorResponse)
    )
)]
pub async fn list_ratings(
    State(state): State<AppState>,
    RequireActiveUser(user): RequireActiveUser,
    Query(page): Query<PageParams>,
) -> Result<Json<Vec<RatingResponse>>, (StatusCode, Json<ErrorResponse>)> {
    let (limit, offset) = page.clamped(DEFAULT_PAGE_SIZE);

    let ratings = state
        .list_ratings_use_case
        .execute(user.id, limit, offset)
        .await
        .map_err(rating_error_response)?;

    Ok(Json(ratings.into_iter().map(RatingResponse::from).collect()))
}

/// DELETE /api/v1/users/me/ratings/{movie_id}
#[utoipa::path(
    delete,
    path = "/api/v1/users/me/ratings/{movie_id}",
    tag = "ratings",
    params(("movie_id" = i64, Path, description = "Rated movie id")),
    responses(
        (status = 204, description = "Rating deleted"),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 404, description = "No rating for this movie", body = ErrorResponse)
    )
)]
pub async fn delete_rating(
    State(state): State<AppState>,
    RequireActiveUser(user): RequireActiveUser,
    Path(movie_id): Path<i64>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    state
        .delete_rating_use_case
        .execute(user.id, movie_id)
        .await
        .map_err(rating_error_response)?;

    Ok(StatusCode::NO_CONTENT)
}

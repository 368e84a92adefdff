//! Movie catalog and recommendation endpoints

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::domain::movies::{MovieError, MovieFilter};
use crate::presentation::auth::{OptionalAuth, RequireAuth};
use crate::presentation::controllers::AppState;
use crate::presentation::models::{
    CreateMovieRequest, ErrorResponse, MovieRecommendationResponse, MovieResponse, PageParams,
    SearchParams, UpdateMovieRequest,
};

/// Default page size for listing endpoints
const DEFAULT_PAGE_SIZE: i64 = 20;
/// Default result count for recommendation endpoints
const DEFAULT_RECOMMENDATION_COUNT: i64 = 10;

/// Map a movie domain error onto the HTTP error envelope
fn movie_error_response(error: MovieError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, code) = match &error {
        MovieError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        MovieError::Validation { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        MovieError::Database { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    };

    let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("Movie operation failed: {}", error);
        "An internal error occurred".to_string()
    } else {
        error.to_string()
    };

    (status, Json(ErrorResponse::new(code, message)))
}

/// GET /api/v1/movies popular listing
#[utoipa::path(
    get,
    path = "/api/v1/movies",
    tag = "movies",
    params(PageParams),
    responses(
        (status = 200, description = "Popular movies, most popular first", body = [MovieResponse]),
        (status = 429, description = "Rate limit exceeded", body = ErrorResponse)
    )
)]
pub async fn popular_movies(
    State(state): State<AppState>,
    Query(page): Query<PageParams>,
) -> Result<Json<Vec<MovieResponse>>, (StatusCode, Json<ErrorResponse>)> {
    let (limit, offset) = page.clamped(DEFAULT_PAGE_SIZE);

    let movies = state
        .popular_movies_use_case
        .execute(limit, offset)
        .await
        .map_err(movie_error_response)?;

    Ok(Json(movies.into_iter().map(MovieResponse::from).collect()))
}

/// GET /api/v1/movies/search filtered catalog search
#[utoipa::path(
    get,
    path = "/api/v1/movies/search",
    tag = "movies",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching movies, most popular first", body = [MovieResponse]),
        (status = 400, description = "Invalid filter combination", body = ErrorResponse)
    )
)]
pub async fn search_movies(
    State(state): State<AppState>,
    OptionalAuth(identity): OptionalAuth,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<MovieResponse>>, (StatusCode, Json<ErrorResponse>)> {
    let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, 100);
    let offset = params.offset.unwrap_or(0).max(0);

    let genres = params
        .genres
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(|g| g.trim().to_string())
        .filter(|g| !g.is_empty())
        .collect();

    // An authenticated caller's stored preference fills in an absent filter
    let include_adult = params.include_adult.unwrap_or_else(|| {
        identity
            .as_ref()
            .map(|i| i.user.include_adult)
            .unwrap_or(false)
    });

    let filter = MovieFilter {
        query: params.query,
        genres,
        min_rating: params.min_rating,
        max_runtime: params.max_runtime,
        year_from: params.year_from,
        year_to: params.year_to,
        include_adult,
        limit,
        offset,
    };

    let movies = state
        .search_movies_use_case
        .execute(filter)
        .await
        .map_err(movie_error_response)?;

    Ok(Json(movies.into_iter().map(MovieResponse::from).collect()))
}

/// GET /api/v1/movies/trending
#[utoipa::path(
    get,
    path = "/api/v1/movies/trending",
    tag = "movies",
    params(PageParams),
    responses(
        (status = 200, description = "Trending movies", body = [MovieResponse])
    )
)]
pub async fn trending_movies(
    State(state): State<AppState>,
    Query(page): Query<PageParams>,
) -> Result<Json<Vec<MovieResponse>>, (StatusCode, Json<ErrorResponse>)> {
    let (limit, _) = page.clamped(DEFAULT_RECOMMENDATION_COUNT);

    let movies = state
        .trending_movies_use_case
        .execute(limit)
        .await
        .map_err(movie_error_response)?;

    Ok(Json(movies.into_iter().map(MovieResponse::from).collect()))
}

/// GET /api/v1/movies/{id}
#[utoipa::path(
    get,
    path = "/api/v1/movies/{id}",
    tag = "movies",
    params(("id" = i64, Path, description = "Movie id")),
    responses(
        (status = 200, description = "The movie", body = MovieResponse),
        (status = 404, description = "Movie not found", body = ErrorResponse)
    )
)]
pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MovieResponse>, (StatusCode, Json<ErrorResponse>)> {
    let movie = state
        .get_movie_use_case
        .execute(id)
        .await
        .map_err(movie_error_response)?;

    Ok(Json(MovieResponse::from(movie)))
}

/// GET /api/v1/movies/{id}/similar
#[utoipa::path(
    get,
    path = "/api/v1/movies/{id}/similar",
    tag = "movies",
    params(
        ("id" = i64, Path, description = "Reference movie id"),
        PageParams
    ),
    responses(
        (status = 200, description = "Movies sharing the reference movie's genres", body = [MovieRecommendationResponse])
    )
)]
pub async fn similar_movies(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(page): Query<PageParams>,
) -> Result<Json<Vec<MovieRecommendationResponse>>, (StatusCode, Json<ErrorResponse>)> {
    let (limit, _) = page.clamped(DEFAULT_RECOMMENDATION_COUNT);

    let recommendations = state
        .similar_movies_use_case
        .execute(id, limit)
        .await
        .map_err(movie_error_response)?;

    Ok(Json(
        recommendations
            .into_iter()
            .map(MovieRecommendationResponse::from)
            .collect(),
    ))
}

/// GET /api/v1/movies/recommendations/genre/{genre}
#[utoipa::path(
    get,
    path = "/api/v1/movies/recommendations/genre/{genre}",
    tag = "movies",
    params(
        ("genre" = String, Path, description = "Genre name"),
        PageParams
    ),
    responses(
        (status = 200, description = "Scored genre recommendations", body = [MovieRecommendationResponse])
    )
)]
pub async fn recommend_by_genre(
    State(state): State<AppState>,
    Path(genre): Path<String>,
    Query(page): Query<PageParams>,
) -> Result<Json<Vec<MovieRecommendationResponse>>, (StatusCode, Json<ErrorResponse>)> {
    let (limit, _) = page.clamped(DEFAULT_RECOMMENDATION_COUNT);

    let recommendations = state
        .recommend_by_genre_use_case
        .execute(&genre, limit)
        .await
        .map_err(movie_error_response)?;

    Ok(Json(
        recommendations
            .into_iter()
            .map(MovieRecommendationResponse::from)
            .collect(),
    ))
}

/// GET /api/v1/movies/recommendations/director/{director}
#[utoipa::path(
    get,
    path = "/api/v1/movies/recommendations/director/{director}",
    tag = "movies",
    params(
        ("director" = String, Path, description = "Director name"),
        PageParams
    ),
    responses(
        (status = 200, description = "Scored director recommendations", body = [MovieRecommendationResponse])
    )
)]
pub async fn recommend_by_director(
    State(state): State<AppState>,
    Path(director): Path<String>,
    Query(page): Query<PageParams>,
) -> Result<Json<Vec<MovieRecommendationResponse>>, (StatusCode, Json<ErrorResponse>)> {
    let (limit, _) = page.clamped(DEFAULT_RECOMMENDATION_COUNT);

    let recommendations = state
        .recommend_by_director_use_case
        .execute(&director, limit)
        .await
        .map_err(movie_error_response)?;

    Ok(Json(
        recommendations
            .into_iter()
            .map(MovieRecommendationResponse::from)
            .collect(),
    ))
}

/// POST /api/v1/movies
#[utoipa::path(
    post,
    path = "/api/v1/movies",
    tag = "movies",
    request_body = CreateMovieRequest,
    responses(
        (status = 201, description = "Movie created", body = MovieResponse),
        (status = 400, description = "Invalid movie data", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse)
    )
)]
pub async fn create_movie(
    State(state): State<AppState>,
    RequireAuth(_identity): RequireAuth,
    Json(request): Json<CreateMovieRequest>,
) -> Result<(StatusCode, Json<MovieResponse>), (StatusCode, Json<ErrorResponse>)> {
    let movie = state
        .create_movie_use_case
        .execute(request.into())
        .await
        .map_err(movie_error_response)?;

    Ok((StatusCode::CREATED, Json(MovieResponse::from(movie))))
}

/// PUT /api/v1/movies/{id}
#[utoipa::path(
    put,
    path = "/api/v1/movies/{id}",
    tag = "movies",
    params(("id" = i64, Path, description = "Movie id")),
    request_body = UpdateMovieRequest,
    responses(
        (status = 200, description = "Movie updated", body = MovieResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 404, description = "Movie not found", body = ErrorResponse)
    )
)]
pub async fn update_movie(
    State(state): State<AppState>,
    RequireAuth(_identity): RequireAuth,
    Path(id): Path<i64>,
    Json(request): Json<UpdateMovieRequest>,
) -> Result<Json<MovieResponse>, (StatusCode, Json<ErrorResponse>)> {
    let movie = state
        .update_movie_use_case
        .execute(id, request.into())
        .await
        .map_err(movie_error_response)?;

    Ok(Json(MovieResponse::from(movie)))
}

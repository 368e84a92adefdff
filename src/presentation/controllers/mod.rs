//! API controllers and shared application state

pub mod movies;
pub mod ratings;

use axum::{Json, response::IntoResponse};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::application::auth::{
    IssueApiKeyUseCase, LoginUseCase, RegisterUserUseCase, ResolveIdentityUseCase,
};
use crate::application::movies::{
    CreateMovieUseCase, GetMovieUseCase, PopularMoviesUseCase, RecommendByDirectorUseCase,
    RecommendByGenreUseCase, SearchMoviesUseCase, SimilarMoviesUseCase, TrendingMoviesUseCase,
    UpdateMovieUseCase,
};
use crate::application::ratings::{DeleteRatingUseCase, ListRatingsUseCase, UpsertRatingUseCase};
use crate::config::Config;
use crate::infrastructure::rate_limiter::RateLimiterService;

/// Shared application state injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    // Auth
    pub register_use_case: Arc<RegisterUserUseCase>,
    pub login_use_case: Arc<LoginUseCase>,
    pub issue_api_key_use_case: Arc<IssueApiKeyUseCase>,
    pub resolve_identity_use_case: Arc<ResolveIdentityUseCase>,

    // Movies
    pub get_movie_use_case: Arc<GetMovieUseCase>,
    pub search_movies_use_case: Arc<SearchMoviesUseCase>,
    pub popular_movies_use_case: Arc<PopularMoviesUseCase>,
    pub trending_movies_use_case: Arc<TrendingMoviesUseCase>,
    pub recommend_by_genre_use_case: Arc<RecommendByGenreUseCase>,
    pub recommend_by_director_use_case: Arc<RecommendByDirectorUseCase>,
    pub similar_movies_use_case: Arc<SimilarMoviesUseCase>,
    pub create_movie_use_case: Arc<CreateMovieUseCase>,
    pub update_movie_use_case: Arc<UpdateMovieUseCase>,

    // Ratings
    pub upsert_rating_use_case: Arc<UpsertRatingUseCase>,
    pub list_ratings_use_case: Arc<ListRatingsUseCase>,
    pub delete_rating_use_case: Arc<DeleteRatingUseCase>,

    pub rate_limiter: Arc<RateLimiterService>,
}

/// Health check response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    pub version: String,
}

/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET / service information
pub async fn root_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": "CineRec API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Movie recommendation API",
        "endpoints": {
            "health": "/health",
            "api": "/api/v1",
            "docs": "/docs"
        }
    }))
}

//! Route definitions and middleware stack

use axum::{
    Router, middleware,
    http::StatusCode,
    routing::{get, post, put},
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::presentation::{
    auth::controller::{create_api_key, login, logout, me, register},
    controllers::{
        AppState, health_check,
        movies::{
            create_movie, get_movie, popular_movies, recommend_by_director, recommend_by_genre,
            search_movies, similar_movies, trending_movies, update_movie,
        },
        ratings::{delete_rating, list_ratings, upsert_rating},
        root_handler,
    },
    middleware::{rate_limit_middleware, resolve_identity_middleware},
};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::auth::controller::register,
        crate::presentation::auth::controller::login,
        crate::presentation::auth::controller::create_api_key,
        crate::presentation::auth::controller::me,
        crate::presentation::auth::controller::logout,
        crate::presentation::controllers::movies::popular_movies,
        crate::presentation::controllers::movies::search_movies,
        crate::presentation::controllers::movies::trending_movies,
        crate::presentation::controllers::movies::get_movie,
        crate::presentation::controllers::movies::similar_movies,
        crate::presentation::controllers::movies::recommend_by_genre,
        crate::presentation::controllers::movies::recommend_by_director,
        crate::presentation::controllers::movies::create_movie,
        crate::presentation::controllers::movies::update_movie,
        crate::presentation::controllers::ratings::upsert_rating,
        crate::presentation::controllers::ratings::list_ratings,
        crate::presentation::controllers::ratings::delete_rating,
        crate::presentation::controllers::health_check
    ),
    components(
        schemas(
            crate::presentation::auth::models::RegisterRequest,
            crate::presentation::auth::models::LoginRequest,
            crate::presentation::auth::models::TokenResponse,
            crate::presentation::auth::models::UserResponse,
            crate::presentation::auth::models::ApiKeyResponse,
            crate::presentation::auth::models::LogoutResponse,
            crate::presentation::models::ErrorResponse,
            crate::presentation::models::MovieResponse,
            crate::presentation::models::MovieRecommendationResponse,
            crate::presentation::models::CreateMovieRequest,
            crate::presentation::models::UpdateMovieRequest,
            crate::presentation::models::RateMovieRequest,
            crate::presentation::models::RatingResponse,
            crate::presentation::controllers::HealthResponse
        )
    ),
    tags(
        (name = "auth", description = "Registration, login, and API key management"),
        (name = "movies", description = "Movie catalog and recommendation endpoints"),
        (name = "ratings", description = "Personal movie ratings (session authentication only)"),
        (name = "health", description = "Service health")
    ),
    info(
        title = "CineRec API",
        description = "Movie recommendation API with JWT/API-key authentication and per-identity rate limiting.",
        license(
            name = "AGPL-3.0",
            url = "https://www.gnu.org/licenses/agpl-3.0.html"
        )
    )
)]
pub struct ApiDoc;

/// Build the CORS layer from configured origins; `["*"]` allows any origin
fn cors_layer(config: &Config) -> CorsLayer {
    let allow_any =
        config.server.allowed_origins.len() == 1 && config.server.allowed_origins[0] == "*";

    let origin = if allow_any {
        tower_http::cors::AllowOrigin::any()
    } else {
        let origins: Vec<axum::http::HeaderValue> = config
            .server
            .allowed_origins
            .iter()
            .filter_map(|origin| {
                axum::http::HeaderValue::from_str(origin)
                    .map_err(|_| {
                        tracing::warn!(origin, "Invalid CORS origin in config; skipping");
                    })
                    .ok()
            })
            .collect();
        tower_http::cors::AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
            axum::http::header::AUTHORIZATION,
            axum::http::HeaderName::from_static("x-api-key"),
        ])
        .max_age(Duration::from_secs(3600))
}

/// Create the application router.
///
/// Every `/api/v1` route sits behind identity resolution and rate limiting;
/// infrastructure routes (`/`, `/health`, `/docs`) are outside both.
pub fn create_router(state: AppState, config: &Config) -> Router {
    let auth_routes = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/api-key", post(create_api_key))
        .route("/auth/me", get(me))
        .route("/auth/logout", post(logout));

    let movie_routes = Router::new()
        .route("/movies", get(popular_movies).post(create_movie))
        .route("/movies/search", get(search_movies))
        .route("/movies/trending", get(trending_movies))
        .route("/movies/{id}", get(get_movie).put(update_movie))
        .route("/movies/{id}/similar", get(similar_movies))
        .route(
            "/movies/recommendations/genre/{genre}",
            get(recommend_by_genre),
        )
        .route(
            "/movies/recommendations/director/{director}",
            get(recommend_by_director),
        );

    let rating_routes = Router::new()
        .route(
            "/users/me/ratings",
            put(upsert_rating).get(list_ratings),
        )
        .route(
            "/users/me/ratings/{movie_id}",
            axum::routing::delete(delete_rating),
        );

    // Layer order is reversed at runtime: identity resolution is added last
    // so it runs first and the rate limiter can read the resolved context
    let api_routes = Router::new()
        .merge(auth_routes)
        .merge(movie_routes)
        .merge(rating_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            resolve_identity_middleware,
        ));

    let infrastructure_routes = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check));

    let mut router = Router::new()
        .nest("/api/v1", api_routes)
        .merge(infrastructure_routes);

    // Avoid leaking interactive docs in hardened deployments
    if config.server.enable_docs {
        router =
            router.merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(config))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(config.server.request_timeout_seconds),
                )),
        )
        .with_state(state)
}

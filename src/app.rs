//! Application composition root
//!
//! Builds every dependency explicitly at startup (database pool, counter
//! store, use cases) and wires them into the router. Nothing is lazily
//! initialized on first use; substitutable stores make the whole stack
//! testable without a running Redis.

use axum::Router;
use redis::aio::ConnectionManager;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

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
use crate::domain::auth::repositories::IUserRepository;
use crate::domain::movies::repositories::IMovieRepository;
use crate::domain::ratings::IRatingRepository;
use crate::infrastructure::auth::{ApiKeyGenerator, JwtService, PasswordHasher, PgUserRepository};
use crate::infrastructure::cache::{CacheService, InMemoryCache, RedisCache};
use crate::infrastructure::movies::PgMovieRepository;
use crate::infrastructure::rate_limiter::{
    CounterStore, InMemoryCounterStore, RateLimiterService, RedisCounterStore,
};
use crate::infrastructure::ratings::PgRatingRepository;
use crate::presentation::{AppState, create_router};

/// Errors that prevent the application from starting
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database connection failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Build the fully wired application router from configuration
pub async fn create_app(config: Config) -> Result<Router, AppError> {
    let config = Arc::new(config);

    // Database pool with bounded connections and a short acquire timeout
    let pool = Arc::new(
        PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .acquire_timeout(Duration::from_secs(config.database.connect_timeout_seconds))
            .connect(&config.database.url)
            .await?,
    );

    sqlx::migrate!("./migrations").run(&*pool).await?;
    info!("Database ready, migrations applied");

    // Counter store and cache share one Redis connection; when Redis is not
    // reachable at startup the service still comes up on in-process stores
    let (counter_store, cache_service): (Arc<dyn CounterStore>, Arc<dyn CacheService>) =
        match connect_redis(&config.redis.url).await {
            Some(manager) => {
                let manager = Arc::new(manager);
                info!("Connected to Redis at {}", config.redis.url);
                (
                    Arc::new(RedisCounterStore::new(manager.clone())),
                    Arc::new(RedisCache::new(manager)),
                )
            }
            None => {
                warn!(
                    "Redis unavailable at {}; using in-memory counter store and cache",
                    config.redis.url
                );
                (
                    Arc::new(InMemoryCounterStore::new()),
                    Arc::new(InMemoryCache::new()),
                )
            }
        };

    let state = build_state(
        config.clone(),
        Arc::new(PgUserRepository::new(pool.clone())),
        Arc::new(PgMovieRepository::new(pool.clone())),
        Arc::new(PgRatingRepository::new(pool)),
        counter_store,
        cache_service,
    );

    Ok(create_router(state, &config))
}

/// Wire repositories and services into the shared application state.
///
/// Split out from [`create_app`] so tests can inject in-memory stores.
pub fn build_state(
    config: Arc<Config>,
    user_repository: Arc<dyn IUserRepository>,
    movie_repository: Arc<dyn IMovieRepository>,
    rating_repository: Arc<dyn IRatingRepository>,
    counter_store: Arc<dyn CounterStore>,
    cache_service: Arc<dyn CacheService>,
) -> AppState {
    let password_hasher = Arc::new(PasswordHasher::new());
    let jwt_service = Arc::new(JwtService::new(
        config.auth.jwt_secret.clone(),
        config.auth.access_token_ttl_minutes,
    ));
    let api_key_generator = Arc::new(ApiKeyGenerator::new());

    let rate_limiter = Arc::new(RateLimiterService::new(counter_store, &config.rate_limit));

    AppState {
        config: config.clone(),

        register_use_case: Arc::new(RegisterUserUseCase::new(
            user_repository.clone(),
            password_hasher.clone(),
        )),
        login_use_case: Arc::new(LoginUseCase::new(
            user_repository.clone(),
            password_hasher,
            jwt_service.clone(),
        )),
        issue_api_key_use_case: Arc::new(IssueApiKeyUseCase::new(
            user_repository.clone(),
            api_key_generator,
            config.auth.api_key_ttl_days,
        )),
        resolve_identity_use_case: Arc::new(ResolveIdentityUseCase::new(
            user_repository,
            jwt_service,
        )),

        get_movie_use_case: Arc::new(GetMovieUseCase::new(movie_repository.clone())),
        search_movies_use_case: Arc::new(SearchMoviesUseCase::new(movie_repository.clone())),
        popular_movies_use_case: Arc::new(PopularMoviesUseCase::new(
            movie_repository.clone(),
            cache_service.clone(),
        )),
        trending_movies_use_case: Arc::new(TrendingMoviesUseCase::new(movie_repository.clone())),
        recommend_by_genre_use_case: Arc::new(RecommendByGenreUseCase::new(
            movie_repository.clone(),
            cache_service,
        )),
        recommend_by_director_use_case: Arc::new(RecommendByDirectorUseCase::new(
            movie_repository.clone(),
        )),
        similar_movies_use_case: Arc::new(SimilarMoviesUseCase::new(movie_repository.clone())),
        create_movie_use_case: Arc::new(CreateMovieUseCase::new(movie_repository.clone())),
        update_movie_use_case: Arc::new(UpdateMovieUseCase::new(movie_repository)),

        upsert_rating_use_case: Arc::new(UpsertRatingUseCase::new(rating_repository.clone())),
        list_ratings_use_case: Arc::new(ListRatingsUseCase::new(rating_repository.clone())),
        delete_rating_use_case: Arc::new(DeleteRatingUseCase::new(rating_repository)),

        rate_limiter,
    }
}

/// Connect to Redis; None when the server cannot be reached
async fn connect_redis(url: &str) -> Option<ConnectionManager> {
    let client = match redis::Client::open(url) {
        Ok(client) => client,
        Err(e) => {
            warn!("Invalid Redis URL: {}", e);
            return None;
        }
    };

    match ConnectionManager::new(client).await {
        Ok(manager) => Some(manager),
        Err(e) => {
            warn!("Redis connection failed: {}", e);
            None
        }
    }
}

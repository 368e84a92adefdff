//! Shared test harness: an app wired over in-memory stores

pub mod mocks;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower::ServiceExt;

use cinerec::domain::movies::entities::NewMovie;
use cinerec::domain::movies::repositories::IMovieRepository;
use cinerec::infrastructure::cache::InMemoryCache;
use cinerec::infrastructure::rate_limiter::InMemoryCounterStore;
use cinerec::{Config, build_state, create_router};

use mocks::{InMemoryMovieRepository, InMemoryRatingRepository, InMemoryUserRepository};

pub const TEST_JWT_SECRET: &str = "integration-test-secret-at-least-32-chars";

/// Test application with handles into its in-memory stores
pub struct TestApp {
    pub router: Router,
    pub users: Arc<InMemoryUserRepository>,
    pub movies: Arc<InMemoryMovieRepository>,
    pub ratings: Arc<InMemoryRatingRepository>,
}

/// Default test configuration with a generous rate limit
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.auth.jwt_secret = TEST_JWT_SECRET.to_string();
    config.server.enable_docs = false;
    config.rate_limit.requests_per_minute = 1000;
    config
}

/// Build a test app over fresh in-memory stores
pub fn build_app(config: Config) -> TestApp {
    let users = Arc::new(InMemoryUserRepository::new());
    let movies = Arc::new(InMemoryMovieRepository::new());
    let ratings = Arc::new(InMemoryRatingRepository::new());

    let state = build_state(
        Arc::new(config.clone()),
        users.clone(),
        movies.clone(),
        ratings.clone(),
        Arc::new(InMemoryCounterStore::new()),
        Arc::new(InMemoryCache::new()),
    );

    TestApp {
        router: create_router(state, &config),
        users,
        movies,
        ratings,
    }
}

impl TestApp {
    /// Drive one request through the router
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Seed a movie directly into the store
    pub async fn seed_movie(&self, new_movie: NewMovie) -> i64 {
        self.movies.insert(&new_movie).await.unwrap().id
    }

    /// Register a user through the API and return their id
    pub async fn register_user(&self, username: &str, password: &str) -> i64 {
        let response = self
            .send(json_request(
                "POST",
                "/api/v1/auth/register",
                serde_json::json!({
                    "username": username,
                    "email": format!("{}@example.com", username),
                    "password": password,
                }),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        body_json(response).await["id"].as_i64().unwrap()
    }

    /// Log a user in through the API and return their access token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .send(json_request(
                "POST",
                "/api/v1/auth/login",
                serde_json::json!({ "username": username, "password": password }),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        body_json(response).await["access_token"]
            .as_str()
            .unwrap()
            .to_string()
    }
}

/// Build a JSON request
pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build a bare GET request
pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Build a GET request with a bearer token
pub fn get_with_token(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// Decode a response body as JSON
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// A minimal movie for seeding, tweakable via the returned struct
pub fn movie(title: &str, popularity: f64) -> NewMovie {
    NewMovie {
        title: title.to_string(),
        popularity,
        ..Default::default()
    }
}

/// A movie with a release date offset relative to now
pub fn released(new_movie: NewMovie, days_ago: i64) -> NewMovie {
    NewMovie {
        release_date: Some(release_date(days_ago)),
        ..new_movie
    }
}

pub fn release_date(days_ago: i64) -> DateTime<Utc> {
    Utc::now() - chrono::Duration::days(days_ago)
}

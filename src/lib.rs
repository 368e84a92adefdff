//! CineRec: a movie-recommendation web backend
//!
//! User registration/login, JWT and API-key authentication, per-identity
//! rate limiting, and filter-based recommendation endpoints over a
//! relational movie catalog.

pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;
pub mod presentation;

pub use app::{AppError, build_state, create_app};
pub use config::Config;
pub use logging::init_tracing;
pub use presentation::{AppState, create_router};

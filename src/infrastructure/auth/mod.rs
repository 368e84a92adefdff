//! Authentication infrastructure: JWT, password hashing, API keys, persistence

pub mod api_key_generator;
pub mod jwt_service;
pub mod password_hasher;
pub mod user_repository;

pub use api_key_generator::ApiKeyGenerator;
pub use jwt_service::{JwtService, TokenClaims};
pub use password_hasher::PasswordHasher;
pub use user_repository::PgUserRepository;

//! Authentication DTOs for API requests and responses

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::auth::entities::User;

/// Register new user request DTO
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// Login name (3-50 characters)
    #[schema(example = "moviefan42")]
    pub username: String,
    /// Email address
    #[schema(example = "moviefan42@example.com")]
    pub email: String,
    /// Password (minimum 8 characters, mixed case plus a digit)
    #[schema(example = "Secure-Password-123")]
    pub password: String,
    /// Preferred genres, comma-separated
    #[schema(example = "Action, Sci-Fi")]
    pub preferred_genres: Option<String>,
    /// Preferred language codes, comma-separated
    #[schema(example = "en,fr")]
    pub preferred_languages: Option<String>,
    /// Minimum vote average for recommendations (0-10)
    pub min_rating: Option<i32>,
    /// Maximum movie runtime in minutes
    pub max_runtime: Option<i32>,
    /// Whether adult titles may appear in results
    #[serde(default)]
    pub include_adult: bool,
}

/// Login request DTO
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "moviefan42")]
    pub username: String,
    #[schema(example = "Secure-Password-123")]
    pub password: String,
}

/// Access token response DTO
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// Signed bearer token
    pub access_token: String,
    /// Token type for the Authorization header
    #[schema(example = "bearer")]
    pub token_type: String,
    /// Token lifetime in seconds
    #[schema(example = 1800)]
    pub expires_in: u64,
    pub user_id: i64,
    #[schema(example = "moviefan42")]
    pub username: String,
}

/// User profile response DTO
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    #[schema(example = "moviefan42")]
    pub username: String,
    #[schema(example = "moviefan42@example.com")]
    pub email: String,
    pub preferred_genres: Option<String>,
    pub preferred_languages: Option<String>,
    pub min_rating: i32,
    pub max_runtime: Option<i32>,
    pub include_adult: bool,
    pub is_active: bool,
    pub is_verified: bool,
    /// Current API key, if one has been issued
    pub api_key: Option<String>,
    pub api_key_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.as_i64(),
            username: user.username.into_string(),
            email: user.email.into_string(),
            preferred_genres: user.preferred_genres,
            preferred_languages: user.preferred_languages,
            min_rating: user.min_rating,
            max_runtime: user.max_runtime,
            include_adult: user.include_adult,
            is_active: user.is_active,
            is_verified: user.is_verified,
            api_key: user.api_key,
            api_key_expires_at: user.api_key_expires_at,
            created_at: user.created_at,
            updated_at: user.updated_at,
            last_login: user.last_login,
        }
    }
}

/// API key response DTO (the key is only returned here)
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiKeyResponse {
    #[schema(example = "sk_a1b2c3d4e5f6...")]
    pub api_key: String,
    pub expires_at: DateTime<Utc>,
    #[schema(example = "API key generated successfully")]
    pub message: String,
}

/// Logout response DTO
#[derive(Debug, Serialize, ToSchema)]
pub struct LogoutResponse {
    #[schema(example = "Successfully logged out")]
    pub message: String,
}

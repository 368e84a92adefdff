//! Authentication domain entities

use chrono::{DateTime, Utc};

use super::value_objects::*;

/// User aggregate root
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user identifier
    pub id: UserId,
    /// Unique login name
    pub username: Username,
    /// User email address
    pub email: Email,
    /// Hashed password (never expose raw hash)
    pub password_hash: PasswordHash,
    /// Preferred genres, comma-separated
    pub preferred_genres: Option<String>,
    /// Preferred language codes, comma-separated
    pub preferred_languages: Option<String>,
    /// Minimum vote average for recommendations
    pub min_rating: i32,
    /// Maximum movie runtime in minutes
    pub max_runtime: Option<i32>,
    /// Whether adult titles may appear in results
    pub include_adult: bool,
    /// Whether the account is active
    pub is_active: bool,
    /// Whether the email address has been verified
    pub is_verified: bool,
    /// Long-lived API key for machine clients (None if never issued)
    pub api_key: Option<String>,
    /// When the API key expires (None if no key or no expiration)
    pub api_key_expires_at: Option<DateTime<Utc>>,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
    /// Last successful login (None if never logged in)
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// Check if the API key is present and not expired
    pub fn is_api_key_valid(&self) -> bool {
        if self.api_key.is_none() {
            return false;
        }
        match self.api_key_expires_at {
            Some(expires_at) => Utc::now() <= expires_at,
            None => true,
        }
    }
}

/// Data for creating a new user; the repository assigns the id
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: Username,
    pub email: Email,
    pub password_hash: PasswordHash,
    pub preferred_genres: Option<String>,
    pub preferred_languages: Option<String>,
    pub min_rating: i32,
    pub max_runtime: Option<i32>,
    pub include_adult: bool,
}

//! Authentication repository traits

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::entities::{NewUser, User};
use super::errors::AuthError;
use super::value_objects::{Email, UserId, Username};

/// User repository trait for user persistence
#[async_trait]
pub trait IUserRepository: Send + Sync {
    /// Find a user by id
    async fn find_by_id(&self, user_id: UserId) -> Result<Option<User>, AuthError>;

    /// Find a user by username
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, AuthError>;

    /// Find a user by email address
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError>;

    /// Find a user by exact API key match
    async fn find_by_api_key(&self, api_key: &str) -> Result<Option<User>, AuthError>;

    /// Create a new user and return the stored row
    async fn create(&self, new_user: &NewUser) -> Result<User, AuthError>;

    /// Record a successful login
    async fn update_last_login(
        &self,
        user_id: UserId,
        logged_in_at: DateTime<Utc>,
    ) -> Result<(), AuthError>;

    /// Attach a fresh API key (and its expiry) to a user
    async fn set_api_key(
        &self,
        user_id: UserId,
        api_key: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthError>;
}

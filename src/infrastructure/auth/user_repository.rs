//! SQLx implementation of the user repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::auth::{
    entities::{NewUser, User},
    errors::AuthError,
    repositories::IUserRepository,
    value_objects::{Email, PasswordHash, UserId, Username},
};

const USER_COLUMNS: &str = "id, username, email, hashed_password, preferred_genres, \
     preferred_languages, min_rating, max_runtime, include_adult, is_active, is_verified, \
     api_key, api_key_expires_at, created_at, updated_at, last_login";

/// SQLx implementation of the user repository
pub struct PgUserRepository {
    pool: Arc<PgPool>,
}

impl PgUserRepository {
    /// Create a new SQLx user repository
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

/// Raw database row for a user
#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    hashed_password: String,
    preferred_genres: Option<String>,
    preferred_languages: Option<String>,
    min_rating: i32,
    max_runtime: Option<i32>,
    include_adult: bool,
    is_active: bool,
    is_verified: bool,
    api_key: Option<String>,
    api_key_expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    last_login: Option<DateTime<Utc>>,
}

impl TryFrom<UserRow> for User {
    type Error = AuthError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let username = Username::new(row.username).map_err(|e| AuthError::Database {
            message: format!("Corrupt username in users row {}: {}", row.id, e),
        })?;
        let email = Email::new(row.email).map_err(|e| AuthError::Database {
            message: format!("Corrupt email in users row {}: {}", row.id, e),
        })?;

        Ok(User {
            id: UserId::new(row.id),
            username,
            email,
            password_hash: PasswordHash::new(row.hashed_password),
            preferred_genres: row.preferred_genres,
            preferred_languages: row.preferred_languages,
            min_rating: row.min_rating,
            max_runtime: row.max_runtime,
            include_adult: row.include_adult,
            is_active: row.is_active,
            is_verified: row.is_verified,
            api_key: row.api_key,
            api_key_expires_at: row.api_key_expires_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
            last_login: row.last_login,
        })
    }
}

fn database_error(context: &str, e: sqlx::Error) -> AuthError {
    tracing::error!("Database error {}: {}", context, e);
    AuthError::Database {
        message: e.to_string(),
    }
}

#[async_trait]
impl IUserRepository for PgUserRepository {
    async fn find_by_id(&self, user_id: UserId) -> Result<Option<User>, AuthError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id.as_i64())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| database_error("finding user by id", e))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, AuthError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username.as_str())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| database_error("finding user by username", e))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| database_error("finding user by email", e))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_api_key(&self, api_key: &str) -> Result<Option<User>, AuthError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE api_key = $1"
        ))
        .bind(api_key)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| database_error("finding user by api key", e))?;

        row.map(User::try_from).transpose()
    }

    async fn create(&self, new_user: &NewUser) -> Result<User, AuthError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (username, email, hashed_password, preferred_genres, \
             preferred_languages, min_rating, max_runtime, include_adult) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(new_user.username.as_str())
        .bind(new_user.email.as_str())
        .bind(new_user.password_hash.as_str())
        .bind(&new_user.preferred_genres)
        .bind(&new_user.preferred_languages)
        .bind(new_user.min_rating)
        .bind(new_user.max_runtime)
        .bind(new_user.include_adult)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| database_error("creating user", e))?;

        User::try_from(row)
    }

    async fn update_last_login(
        &self,
        user_id: UserId,
        logged_in_at: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        sqlx::query("UPDATE users SET last_login = $2, updated_at = now() WHERE id = $1")
            .bind(user_id.as_i64())
            .bind(logged_in_at)
            .execute(&*self.pool)
            .await
            .map_err(|e| database_error("updating last_login", e))?;

        Ok(())
    }

    async fn set_api_key(
        &self,
        user_id: UserId,
        api_key: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        let result = sqlx::query(
            "UPDATE users SET api_key = $2, api_key_expires_at = $3, updated_at = now() \
             WHERE id = $1",
        )
        .bind(user_id.as_i64())
        .bind(api_key)
        .bind(expires_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| database_error("setting api key", e))?;

        if result.rows_affected() == 0 {
            return Err(AuthError::Database {
                message: format!("No user row to attach API key to: {}", user_id),
            });
        }

        Ok(())
    }
}

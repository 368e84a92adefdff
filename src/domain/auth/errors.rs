//! Authentication domain errors

use thiserror::Error;

/// Authentication-specific domain errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Incorrect username or password")]
    InvalidCredentials,

    #[error("Inactive user account")]
    InactiveAccount,

    #[error("Username already registered: {username}")]
    UsernameTaken { username: String },

    #[error("Email already registered: {email}")]
    EmailTaken { email: String },

    #[error("Invalid username: {reason}")]
    InvalidUsername { reason: String },

    #[error("Invalid email: {reason}")]
    InvalidEmail { reason: String },

    #[error("Invalid password: {reason}")]
    WeakPassword { reason: String },

    #[error("Failed to sign access token")]
    TokenSigning,

    #[error("Password hashing failed")]
    Hashing,

    #[error("Database error: {message}")]
    Database { message: String },
}

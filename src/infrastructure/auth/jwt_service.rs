//! JWT service for token issuance and verification

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::auth::{errors::AuthError, value_objects::UserId};

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Username of the subject
    pub sub: String,
    /// Integer user id
    pub user_id: i64,
    /// Issued-at, unix seconds
    pub iat: i64,
    /// Expiry, unix seconds
    pub exp: i64,
}

/// JWT service for issuing and verifying signed access tokens.
///
/// Tokens are stateless: there is no server-side store, so a token cannot be
/// revoked before its expiry.
#[derive(Clone)]
pub struct JwtService {
    /// Secret key for signing tokens
    secret: Arc<String>,
    /// Default access token TTL in minutes
    access_token_ttl_minutes: u64,
}

impl JwtService {
    /// Create a new JWT service
    pub fn new(secret: String, access_token_ttl_minutes: u64) -> Self {
        Self {
            secret: Arc::new(secret),
            access_token_ttl_minutes,
        }
    }

    /// Default token lifetime in seconds
    pub fn default_ttl_seconds(&self) -> u64 {
        self.access_token_ttl_minutes * 60
    }

    /// Issue a signed access token for a user.
    ///
    /// The TTL defaults to the configured value and can be overridden per call.
    pub fn issue_token(
        &self,
        subject: &str,
        user_id: UserId,
        ttl: Option<Duration>,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let ttl = ttl.unwrap_or_else(|| Duration::minutes(self.access_token_ttl_minutes as i64));
        let claims = TokenClaims {
            sub: subject.to_string(),
            user_id: user_id.as_i64(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::new(Algorithm::HS256), &claims, &encoding_key).map_err(|e| {
            tracing::error!("Failed to encode access token: {}", e);
            AuthError::TokenSigning
        })
    }

    /// Verify a token and return its claims.
    ///
    /// Returns None on an invalid signature, malformed structure, or expiry.
    /// Callers must treat None uniformly as "unauthenticated"; the reason is
    /// logged here and never surfaced.
    pub fn verify_token(&self, token: &str) -> Option<TokenClaims> {
        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        match decode::<TokenClaims>(token, &decoding_key, &validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                tracing::debug!("Token verification failed: {}", e);
                None
            }
        }
    }
}

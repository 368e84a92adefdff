//! Authentication extractors for Axum
//!
//! The identity resolution middleware runs once per request and stashes an
//! [`AuthContext`] in the request extensions; these extractors only read it.
//! `OptionalAuth` never rejects, `RequireAuth` answers 401 with a Bearer
//! challenge, and `RequireActiveUser` is the session-only variant that tells
//! an inactive account (400) apart from a missing credential (401).

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};

use crate::application::auth::{AuthenticatedUser, RequestIdentity};
use crate::domain::auth::entities::User;
use crate::presentation::models::ErrorResponse;

/// Per-request authentication context, resolved once by middleware
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    /// Admitted identity (active account, token preferred over API key)
    pub identity: Option<AuthenticatedUser>,
    /// Token-path user before the active check
    pub session_user: Option<User>,
}

impl From<RequestIdentity> for AuthContext {
    fn from(resolved: RequestIdentity) -> Self {
        Self {
            identity: resolved.identity,
            session_user: resolved.session_user,
        }
    }
}

/// Extractor that yields the resolved identity if there is one; never rejects
#[derive(Debug, Clone)]
pub struct OptionalAuth(pub Option<AuthenticatedUser>);

/// Extractor that rejects unauthenticated requests with 401
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedUser);

/// Session-only extractor: requires a valid token for an active account.
///
/// A valid token for a disabled account is rejected with 400, not 401; the
/// caller authenticated fine, their account just cannot act.
#[derive(Debug, Clone)]
pub struct RequireActiveUser(pub User);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = parts
            .extensions
            .get::<AuthContext>()
            .and_then(|context| context.identity.clone());

        Ok(OptionalAuth(identity))
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let context = parts
            .extensions
            .get::<AuthContext>()
            .ok_or_else(AuthRejection::missing_context)?;

        match &context.identity {
            Some(identity) => Ok(RequireAuth(identity.clone())),
            None => Err(AuthRejection::unauthenticated()),
        }
    }
}

impl<S> FromRequestParts<S> for RequireActiveUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let context = parts
            .extensions
            .get::<AuthContext>()
            .ok_or_else(AuthRejection::missing_context)?;

        match &context.session_user {
            Some(user) if user.is_active => Ok(RequireActiveUser(user.clone())),
            Some(_) => Err(AuthRejection::inactive_account()),
            None => Err(AuthRejection::unauthenticated()),
        }
    }
}

/// Rejection emitted by the auth extractors
#[derive(Debug)]
pub struct AuthRejection {
    status: StatusCode,
    code: &'static str,
    message: &'static str,
    /// Whether to attach a WWW-Authenticate challenge
    challenge: bool,
}

impl AuthRejection {
    fn unauthenticated() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            code: "UNAUTHENTICATED",
            message: "Authentication required",
            challenge: true,
        }
    }

    fn inactive_account() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "INACTIVE_ACCOUNT",
            message: "Inactive user account",
            challenge: false,
        }
    }

    fn missing_context() -> Self {
        // The resolution middleware did not run; a router wiring bug
        tracing::error!("Auth context missing from request extensions");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "INTERNAL_ERROR",
            message: "An internal error occurred",
            challenge: false,
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse::new(self.code, self.message));

        if self.challenge {
            (
                self.status,
                [(header::WWW_AUTHENTICATE, "Bearer")],
                body,
            )
                .into_response()
        } else {
            (self.status, body).into_response()
        }
    }
}

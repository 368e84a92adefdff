//! HTTP middleware: identity resolution and rate limiting
//!
//! Identity resolution runs first and stashes an [`AuthContext`] in the
//! request extensions; the rate limiter then derives its counter key from
//! that context. Both are applied to the whole `/api/v1` surface, so even
//! unauthenticated endpoints are rate limited (in the caller's `ip:` bucket).

use axum::{
    Json,
    extract::{ConnectInfo, Request, State},
    http::{HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;

use crate::application::auth::AuthMethod;
use crate::presentation::auth::AuthContext;
use crate::presentation::controllers::AppState;
use crate::presentation::models::ErrorResponse;

/// Resolve the request's identity from its credentials and stash it in the
/// request extensions for the extractors and the rate limiter.
pub async fn resolve_identity_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let bearer_token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_owned);

    let api_key = request
        .headers()
        .get("x-api-key")
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned);

    let resolved = state
        .resolve_identity_use_case
        .resolve_request(bearer_token.as_deref(), api_key.as_deref())
        .await;

    request.extensions_mut().insert(AuthContext::from(resolved));
    next.run(request).await
}

/// Derive the rate-limit counter key for a request.
///
/// Priority order is part of the contract: a token-authenticated user lands
/// in `user:<id>`, an API-key identity in `api:<id>`, everyone else in the
/// caller's `ip:` bucket. The ordering decides which bucket absorbs abuse
/// from anonymous versus authenticated traffic.
pub fn rate_limit_key(context: &AuthContext, request: &Request) -> String {
    match &context.identity {
        Some(identity) if identity.method == AuthMethod::Token => {
            format!("user:{}", identity.user.id)
        }
        Some(identity) => format!("api:{}", identity.user.id),
        None => format!("ip:{}", client_address(request)),
    }
}

/// Best-effort caller address: proxy headers first, then the socket peer
fn client_address(request: &Request) -> String {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .or_else(|| {
            request
                .headers()
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(|s| s.to_string())
        })
        .or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

/// Rate limiting middleware over the shared counter store.
///
/// Runs after identity resolution for every route, whether or not the route
/// requires authentication. Rejections carry 429 and a Retry-After header.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if !state.rate_limiter.is_enabled() {
        return next.run(request).await;
    }

    let context = request
        .extensions()
        .get::<AuthContext>()
        .cloned()
        .unwrap_or_default();

    let key = rate_limit_key(&context, &request);
    let decision = state.rate_limiter.check(&key).await;

    if decision.allowed {
        return next.run(request).await;
    }

    tracing::warn!(
        key = %key,
        current = decision.current,
        limit = decision.limit,
        "Rate limit exceeded"
    );

    let mut response = (
        StatusCode::TOO_MANY_REQUESTS,
        Json(ErrorResponse::new(
            "RATE_LIMIT_EXCEEDED",
            format!(
                "Rate limit exceeded. Please retry after {} seconds.",
                decision.retry_after
            ),
        )),
    )
        .into_response();

    let retry_after = HeaderValue::from_str(&decision.retry_after.to_string())
        .unwrap_or_else(|_| HeaderValue::from_static("60"));
    response.headers_mut().insert(header::RETRY_AFTER, retry_after);

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::auth::AuthenticatedUser;
    use crate::domain::auth::entities::User;
    use crate::domain::auth::value_objects::{Email, PasswordHash, UserId, Username};
    use axum::body::Body;
    use chrono::Utc;

    fn make_user(id: i64) -> User {
        let now = Utc::now();
        User {
            id: UserId::new(id),
            username: Username::new(format!("user{}", id)).unwrap(),
            email: Email::new(format!("user{}@example.com", id)).unwrap(),
            password_hash: PasswordHash::new("hash".to_string()),
            preferred_genres: None,
            preferred_languages: None,
            min_rating: 0,
            max_runtime: None,
            include_adult: false,
            is_active: true,
            is_verified: false,
            api_key: None,
            api_key_expires_at: None,
            created_at: now,
            updated_at: now,
            last_login: None,
        }
    }

    fn anonymous_request(forwarded_for: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri("/api/v1/movies");
        if let Some(addr) = forwarded_for {
            builder = builder.header("x-forwarded-for", addr);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_token_identity_uses_user_bucket() {
        let context = AuthContext {
            identity: Some(AuthenticatedUser {
                user: make_user(7),
                method: AuthMethod::Token,
            }),
            session_user: Some(make_user(7)),
        };

        assert_eq!(rate_limit_key(&context, &anonymous_request(None)), "user:7");
    }

    #[test]
    fn test_api_key_identity_uses_api_bucket() {
        let context = AuthContext {
            identity: Some(AuthenticatedUser {
                user: make_user(7),
                method: AuthMethod::ApiKey,
            }),
            session_user: None,
        };

        assert_eq!(rate_limit_key(&context, &anonymous_request(None)), "api:7");
    }

    #[test]
    fn test_anonymous_uses_ip_bucket() {
        let context = AuthContext::default();
        let request = anonymous_request(Some("10.0.0.5"));

        assert_eq!(rate_limit_key(&context, &request), "ip:10.0.0.5");
    }

    #[test]
    fn test_forwarded_for_takes_first_hop() {
        let context = AuthContext::default();
        let request = anonymous_request(Some("10.0.0.5, 192.168.1.1"));

        assert_eq!(rate_limit_key(&context, &request), "ip:10.0.0.5");
    }

    #[test]
    fn test_connect_info_fallback() {
        let context = AuthContext::default();
        let mut request = anonymous_request(None);
        request
            .extensions_mut()
            .insert(ConnectInfo("10.1.2.3:55000".parse::<SocketAddr>().unwrap()));

        assert_eq!(rate_limit_key(&context, &request), "ip:10.1.2.3");
    }

    #[test]
    fn test_unknown_address() {
        let context = AuthContext::default();
        assert_eq!(
            rate_limit_key(&context, &anonymous_request(None)),
            "ip:unknown"
        );
    }
}

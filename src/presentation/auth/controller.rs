//! Authentication controller endpoints

use axum::{Json, extract::State, http::StatusCode};

use crate::application::auth::RegisterUserInput;
use crate::domain::auth::errors::AuthError;
use crate::presentation::auth::RequireAuth;
use crate::presentation::auth::models::{
    ApiKeyResponse, LoginRequest, LogoutResponse, RegisterRequest, TokenResponse, UserResponse,
};
use crate::presentation::controllers::AppState;
use crate::presentation::models::ErrorResponse;

/// Map an auth domain error onto the HTTP error envelope
fn auth_error_response(error: AuthError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, code) = match &error {
        AuthError::Unauthenticated => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
        AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
        AuthError::InactiveAccount => (StatusCode::BAD_REQUEST, "INACTIVE_ACCOUNT"),
        AuthError::UsernameTaken { .. } => (StatusCode::BAD_REQUEST, "USERNAME_TAKEN"),
        AuthError::EmailTaken { .. } => (StatusCode::BAD_REQUEST, "EMAIL_TAKEN"),
        AuthError::InvalidUsername { .. }
        | AuthError::InvalidEmail { .. }
        | AuthError::WeakPassword { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        AuthError::TokenSigning | AuthError::Hashing | AuthError::Database { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
        }
    };

    let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("Auth operation failed: {}", error);
        "An internal error occurred".to_string()
    } else {
        error.to_string()
    };

    (status, Json(ErrorResponse::new(code, message)))
}

/// POST /api/v1/auth/register
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation failure or duplicate username/email", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), (StatusCode, Json<ErrorResponse>)> {
    let input = RegisterUserInput {
        username: request.username,
        email: request.email,
        password: request.password,
        preferred_genres: request.preferred_genres,
        preferred_languages: request.preferred_languages,
        min_rating: request.min_rating.unwrap_or(0),
        max_runtime: request.max_runtime,
        include_adult: request.include_adult,
    };

    let user = state
        .register_use_case
        .execute(input)
        .await
        .map_err(auth_error_response)?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// POST /api/v1/auth/login
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Invalid credentials or inactive account", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, (StatusCode, Json<ErrorResponse>)> {
    let result = state
        .login_use_case
        .execute(&request.username, &request.password)
        .await
        .map_err(auth_error_response)?;

    Ok(Json(TokenResponse {
        access_token: result.access_token,
        token_type: "bearer".to_string(),
        expires_in: result.expires_in,
        user_id: result.user_id.as_i64(),
        username: result.username,
    }))
}

/// POST /api/v1/auth/api-key generate a fresh API key
#[utoipa::path(
    post,
    path = "/api/v1/auth/api-key",
    tag = "auth",
    responses(
        (status = 200, description = "API key generated (replaces any previous key)", body = ApiKeyResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse)
    )
)]
pub async fn create_api_key(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
) -> Result<Json<ApiKeyResponse>, (StatusCode, Json<ErrorResponse>)> {
    let (api_key, expires_at) = state
        .issue_api_key_use_case
        .execute(identity.user.id)
        .await
        .map_err(auth_error_response)?;

    Ok(Json(ApiKeyResponse {
        api_key,
        expires_at,
        message: "API key generated successfully".to_string(),
    }))
}

/// GET /api/v1/auth/me current user profile
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "The authenticated user's profile", body = UserResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse)
    )
)]
pub async fn me(RequireAuth(identity): RequireAuth) -> Json<UserResponse> {
    Json(UserResponse::from(identity.user))
}

/// POST /api/v1/auth/logout
///
/// Tokens are stateless and cannot be revoked before expiry, so logout is a
/// plain acknowledgement; clients drop the token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Logout acknowledged", body = LogoutResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse)
    )
)]
pub async fn logout(RequireAuth(_identity): RequireAuth) -> Json<LogoutResponse> {
    Json(LogoutResponse {
        message: "Successfully logged out".to_string(),
    })
}

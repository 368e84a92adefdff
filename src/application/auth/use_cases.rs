//! Authentication use cases

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::warn;

use crate::domain::auth::{
    entities::{NewUser, User},
    errors::AuthError,
    repositories::IUserRepository,
    value_objects::{Email, UserId, Username},
};
use crate::infrastructure::auth::{ApiKeyGenerator, JwtService, PasswordHasher};

/// How a request's identity was established
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    Token,
    ApiKey,
}

/// An identity resolved from request credentials
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
    pub method: AuthMethod,
}

/// Everything the request pipeline learns about a request's credentials.
///
/// `identity` is the admitted identity (active account, token preferred).
/// `session_user` is the token-path user before the active check; session-only
/// routes need it to tell an inactive account apart from a missing credential.
#[derive(Debug, Clone, Default)]
pub struct RequestIdentity {
    pub identity: Option<AuthenticatedUser>,
    pub session_user: Option<User>,
}

/// Input for user registration
#[derive(Debug, Clone)]
pub struct RegisterUserInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub preferred_genres: Option<String>,
    pub preferred_languages: Option<String>,
    pub min_rating: i32,
    pub max_runtime: Option<i32>,
    pub include_adult: bool,
}

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub access_token: String,
    pub expires_in: u64,
    pub user_id: UserId,
    pub username: String,
}

/// Password strength rules applied at registration
fn validate_password_strength(password: &str) -> Result<(), AuthError> {
    if password.len() < 8 {
        return Err(AuthError::WeakPassword {
            reason: "Password must be at least 8 characters long".to_string(),
        });
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(AuthError::WeakPassword {
            reason: "Password must contain at least one uppercase letter".to_string(),
        });
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(AuthError::WeakPassword {
            reason: "Password must contain at least one lowercase letter".to_string(),
        });
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AuthError::WeakPassword {
            reason: "Password must contain at least one digit".to_string(),
        });
    }
    Ok(())
}

/// Use case for registering new users
pub struct RegisterUserUseCase {
    user_repository: Arc<dyn IUserRepository>,
    password_hasher: Arc<PasswordHasher>,
}

impl RegisterUserUseCase {
    pub fn new(
        user_repository: Arc<dyn IUserRepository>,
        password_hasher: Arc<PasswordHasher>,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
        }
    }

    pub async fn execute(&self, input: RegisterUserInput) -> Result<User, AuthError> {
        let username = Username::new(input.username)
            .map_err(|reason| AuthError::InvalidUsername { reason })?;
        let email =
            Email::new(input.email).map_err(|reason| AuthError::InvalidEmail { reason })?;
        validate_password_strength(&input.password)?;

        if self
            .user_repository
            .find_by_username(&username)
            .await?
            .is_some()
        {
            return Err(AuthError::UsernameTaken {
                username: username.into_string(),
            });
        }

        if self.user_repository.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken {
                email: email.into_string(),
            });
        }

        let password_hash = self.password_hasher.hash(input.password).await?;

        let new_user = NewUser {
            username,
            email,
            password_hash,
            preferred_genres: input.preferred_genres,
            preferred_languages: input.preferred_languages,
            min_rating: input.min_rating,
            max_runtime: input.max_runtime,
            include_adult: input.include_adult,
        };

        self.user_repository.create(&new_user).await
    }
}

/// Use case for user login
pub struct LoginUseCase {
    user_repository: Arc<dyn IUserRepository>,
    password_hasher: Arc<PasswordHasher>,
    jwt_service: Arc<JwtService>,
}

impl LoginUseCase {
    pub fn new(
        user_repository: Arc<dyn IUserRepository>,
        password_hasher: Arc<PasswordHasher>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            jwt_service,
        }
    }

    pub async fn execute(&self, username: &str, password: &str) -> Result<LoginResult, AuthError> {
        // A name that fails validation cannot name a stored user
        let username =
            Username::new(username.to_string()).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .user_repository
            .find_by_username(&username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.password_hasher.verify(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(AuthError::InvalidCredentials);
        }

        // Bookkeeping only; a failed write must not fail the login
        if let Err(e) = self
            .user_repository
            .update_last_login(user.id, Utc::now())
            .await
        {
            warn!("Failed to record last login for user {}: {}", user.id, e);
        }

        let access_token =
            self.jwt_service
                .issue_token(user.username.as_str(), user.id, None)?;

        Ok(LoginResult {
            access_token,
            expires_in: self.jwt_service.default_ttl_seconds(),
            user_id: user.id,
            username: user.username.into_string(),
        })
    }
}

/// Use case for issuing API keys to authenticated users
pub struct IssueApiKeyUseCase {
    user_repository: Arc<dyn IUserRepository>,
    api_key_generator: Arc<ApiKeyGenerator>,
    key_ttl_days: u32,
}

impl IssueApiKeyUseCase {
    pub fn new(
        user_repository: Arc<dyn IUserRepository>,
        api_key_generator: Arc<ApiKeyGenerator>,
        key_ttl_days: u32,
    ) -> Self {
        Self {
            user_repository,
            api_key_generator,
            key_ttl_days,
        }
    }

    /// Generate and store a fresh API key, replacing any previous key
    pub async fn execute(&self, user_id: UserId) -> Result<(String, DateTime<Utc>), AuthError> {
        let api_key = self.api_key_generator.generate();
        let expires_at = Utc::now() + Duration::days(self.key_ttl_days as i64);

        self.user_repository
            .set_api_key(user_id, &api_key, expires_at)
            .await?;

        Ok((api_key, expires_at))
    }
}

/// Use case for resolving a request's identity from its credentials.
///
/// Two independent trust paths: a bearer token (interactive sessions) and an
/// API key (machine clients). Both are attempted whenever the respective
/// credential is present; when both resolve, the token path wins. Every
/// failure along either path, including storage errors, collapses to
/// "no identity" -- this resolver never raises.
pub struct ResolveIdentityUseCase {
    user_repository: Arc<dyn IUserRepository>,
    jwt_service: Arc<JwtService>,
}

impl ResolveIdentityUseCase {
    pub fn new(user_repository: Arc<dyn IUserRepository>, jwt_service: Arc<JwtService>) -> Self {
        Self {
            user_repository,
            jwt_service,
        }
    }

    /// Resolve at most one identity from the presented credentials
    pub async fn resolve(
        &self,
        bearer_token: Option<&str>,
        api_key: Option<&str>,
    ) -> Option<AuthenticatedUser> {
        self.resolve_request(bearer_token, api_key).await.identity
    }

    /// Resolve the full request identity, keeping the pre-active-check
    /// session user around for session-only routes
    pub async fn resolve_request(
        &self,
        bearer_token: Option<&str>,
        api_key: Option<&str>,
    ) -> RequestIdentity {
        let session_user = match bearer_token {
            Some(token) => self.lookup_session_user(token).await,
            None => None,
        };
        let api_user = match api_key {
            Some(key) => self.resolve_api_key(key).await,
            None => None,
        };

        // Token path takes priority when both resolve
        let identity = match (session_user.clone().filter(|u| u.is_active), api_user) {
            (Some(user), _) => Some(AuthenticatedUser {
                user,
                method: AuthMethod::Token,
            }),
            (None, Some(user)) => Some(AuthenticatedUser {
                user,
                method: AuthMethod::ApiKey,
            }),
            (None, None) => None,
        };

        RequestIdentity {
            identity,
            session_user,
        }
    }

    /// Token path: verify signature and expiry, then load the active user
    pub async fn resolve_token(&self, token: &str) -> Option<User> {
        self.lookup_session_user(token).await.filter(|u| u.is_active)
    }

    /// Verify the token and load its user without the active check
    async fn lookup_session_user(&self, token: &str) -> Option<User> {
        let claims = self.jwt_service.verify_token(token)?;

        match self
            .user_repository
            .find_by_id(UserId::new(claims.user_id))
            .await
        {
            Ok(user) => user,
            Err(e) => {
                warn!("User lookup failed during token auth: {}", e);
                None
            }
        }
    }

    /// API-key path: exact key match, unexpired, active account
    pub async fn resolve_api_key(&self, api_key: &str) -> Option<User> {
        let user = match self.user_repository.find_by_api_key(api_key).await {
            Ok(user) => user?,
            Err(e) => {
                warn!("User lookup failed during API key auth: {}", e);
                return None;
            }
        };

        if !user.is_api_key_valid() || !user.is_active {
            return None;
        }

        Some(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::value_objects::PasswordHash;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Minimal in-memory user repository for resolver tests
    struct StubUserRepository {
        users: Mutex<Vec<User>>,
        fail_lookups: bool,
    }

    impl StubUserRepository {
        fn new(users: Vec<User>) -> Self {
            Self {
                users: Mutex::new(users),
                fail_lookups: false,
            }
        }

        fn failing() -> Self {
            Self {
                users: Mutex::new(Vec::new()),
                fail_lookups: true,
            }
        }

        fn database_down<T>(&self) -> Result<T, AuthError> {
            Err(AuthError::Database {
                message: "connection refused".to_string(),
            })
        }
    }

    #[async_trait]
    impl IUserRepository for StubUserRepository {
        async fn find_by_id(&self, user_id: UserId) -> Result<Option<User>, AuthError> {
            if self.fail_lookups {
                return self.database_down();
            }
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.id == user_id)
                .cloned())
        }

        async fn find_by_username(&self, username: &Username) -> Result<Option<User>, AuthError> {
            if self.fail_lookups {
                return self.database_down();
            }
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| &u.username == username)
                .cloned())
        }

        async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError> {
            if self.fail_lookups {
                return self.database_down();
            }
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| &u.email == email)
                .cloned())
        }

        async fn find_by_api_key(&self, api_key: &str) -> Result<Option<User>, AuthError> {
            if self.fail_lookups {
                return self.database_down();
            }
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.api_key.as_deref() == Some(api_key))
                .cloned())
        }

        async fn create(&self, _new_user: &NewUser) -> Result<User, AuthError> {
            unimplemented!("not needed for resolver tests")
        }

        async fn update_last_login(
            &self,
            _user_id: UserId,
            _logged_in_at: DateTime<Utc>,
        ) -> Result<(), AuthError> {
            Ok(())
        }

        async fn set_api_key(
            &self,
            _user_id: UserId,
            _api_key: &str,
            _expires_at: DateTime<Utc>,
        ) -> Result<(), AuthError> {
            Ok(())
        }
    }

    fn make_user(id: i64, username: &str) -> User {
        let now = Utc::now();
        User {
            id: UserId::new(id),
            username: Username::new(username.to_string()).unwrap(),
            email: Email::new(format!("{}@example.com", username)).unwrap(),
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

    fn jwt() -> Arc<JwtService> {
        Arc::new(JwtService::new(
            "test-secret-key-at-least-32-characters-long".to_string(),
            30,
        ))
    }

    #[tokio::test]
    async fn test_valid_token_resolves_identity() {
        let user = make_user(7, "alice");
        let repo = Arc::new(StubUserRepository::new(vec![user.clone()]));
        let jwt = jwt();
        let resolver = ResolveIdentityUseCase::new(repo, jwt.clone());

        let token = jwt.issue_token("alice", UserId::new(7), None).unwrap();
        let resolved = resolver.resolve(Some(&token), None).await.unwrap();

        assert_eq!(resolved.user.id, UserId::new(7));
        assert_eq!(resolved.method, AuthMethod::Token);
    }

    #[tokio::test]
    async fn test_inactive_user_does_not_resolve() {
        let mut user = make_user(7, "alice");
        user.is_active = false;
        let repo = Arc::new(StubUserRepository::new(vec![user]));
        let jwt = jwt();
        let resolver = ResolveIdentityUseCase::new(repo, jwt.clone());

        let token = jwt.issue_token("alice", UserId::new(7), None).unwrap();
        assert!(resolver.resolve(Some(&token), None).await.is_none());
    }

    #[tokio::test]
    async fn test_api_key_resolves_identity() {
        let mut user = make_user(9, "bot");
        user.api_key = Some("sk_machine".to_string());
        let repo = Arc::new(StubUserRepository::new(vec![user]));
        let resolver = ResolveIdentityUseCase::new(repo, jwt());

        let resolved = resolver.resolve(None, Some("sk_machine")).await.unwrap();
        assert_eq!(resolved.user.id, UserId::new(9));
        assert_eq!(resolved.method, AuthMethod::ApiKey);
    }

    #[tokio::test]
    async fn test_expired_api_key_does_not_resolve() {
        let mut user = make_user(9, "bot");
        user.api_key = Some("sk_machine".to_string());
        user.api_key_expires_at = Some(Utc::now() - Duration::hours(1));
        let repo = Arc::new(StubUserRepository::new(vec![user]));
        let resolver = ResolveIdentityUseCase::new(repo, jwt());

        assert!(resolver.resolve(None, Some("sk_machine")).await.is_none());
    }

    #[tokio::test]
    async fn test_token_path_wins_over_api_key() {
        let session_user = make_user(1, "session");
        let mut machine_user = make_user(2, "machine");
        machine_user.api_key = Some("sk_machine".to_string());

        let repo = Arc::new(StubUserRepository::new(vec![
            session_user,
            machine_user,
        ]));
        let jwt = jwt();
        let resolver = ResolveIdentityUseCase::new(repo, jwt.clone());

        let token = jwt.issue_token("session", UserId::new(1), None).unwrap();
        let resolved = resolver
            .resolve(Some(&token), Some("sk_machine"))
            .await
            .unwrap();

        assert_eq!(resolved.user.id, UserId::new(1));
        assert_eq!(resolved.method, AuthMethod::Token);
    }

    #[tokio::test]
    async fn test_invalid_token_falls_through_to_api_key() {
        let mut machine_user = make_user(2, "machine");
        machine_user.api_key = Some("sk_machine".to_string());
        let repo = Arc::new(StubUserRepository::new(vec![machine_user]));
        let resolver = ResolveIdentityUseCase::new(repo, jwt());

        let resolved = resolver
            .resolve(Some("garbage.token.here"), Some("sk_machine"))
            .await
            .unwrap();

        assert_eq!(resolved.user.id, UserId::new(2));
        assert_eq!(resolved.method, AuthMethod::ApiKey);
    }

    #[tokio::test]
    async fn test_storage_errors_resolve_to_no_identity() {
        let repo = Arc::new(StubUserRepository::failing());
        let jwt = jwt();
        let resolver = ResolveIdentityUseCase::new(repo, jwt.clone());

        let token = jwt.issue_token("alice", UserId::new(7), None).unwrap();
        assert!(resolver.resolve(Some(&token), Some("sk_any")).await.is_none());
    }

    #[tokio::test]
    async fn test_inactive_session_user_is_kept_for_session_routes() {
        let mut user = make_user(7, "alice");
        user.is_active = false;
        let repo = Arc::new(StubUserRepository::new(vec![user]));
        let jwt = jwt();
        let resolver = ResolveIdentityUseCase::new(repo, jwt.clone());

        let token = jwt.issue_token("alice", UserId::new(7), None).unwrap();
        let resolved = resolver.resolve_request(Some(&token), None).await;

        // Not admitted as an identity, but still visible to session routes
        assert!(resolved.identity.is_none());
        let session_user = resolved.session_user.unwrap();
        assert_eq!(session_user.id, UserId::new(7));
        assert!(!session_user.is_active);
    }

    #[tokio::test]
    async fn test_no_credentials_is_anonymous() {
        let repo = Arc::new(StubUserRepository::new(vec![]));
        let resolver = ResolveIdentityUseCase::new(repo, jwt());

        assert!(resolver.resolve(None, None).await.is_none());
    }
}

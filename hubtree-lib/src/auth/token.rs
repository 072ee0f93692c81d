//! TokenProvider trait and AccessToken

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::error::AuthError;

/// A bearer access token with optional expiration.
#[derive(Debug, Clone)]
pub struct AccessToken {
    /// The bearer token used for API authentication.
    pub access_token: String,
    /// When the token expires, if known.
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Creates a new access token with just the token string.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at: None,
        }
    }

    /// Creates a new access token with expiration time.
    pub fn with_expiry(access_token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at: Some(expires_at),
        }
    }

    /// Returns `true` if the token has expired.
    ///
    /// Returns `false` if expiration time is unknown.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Utc::now() >= exp)
    }
}

/// Supplies access tokens to the catalog client.
///
/// The client calls `get_token` before each request. Implementations own
/// the whole session lifecycle (login, refresh, logout) and report
/// [`AuthError::NotAuthorized`] when there is no session to use.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use hubtree_lib::auth::{AccessToken, TokenProvider};
/// use hubtree_lib::error::AuthError;
///
/// struct SessionTokens {
///     session: std::sync::RwLock<Option<AccessToken>>,
/// }
///
/// #[async_trait]
/// impl TokenProvider for SessionTokens {
///     async fn get_token(&self, _resource: &str) -> Result<AccessToken, AuthError> {
///         let guard = self.session.read().unwrap();
///         guard.clone().ok_or(AuthError::NotAuthorized)
///     }
/// }
/// ```
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Gets an access token for the specified resource.
    ///
    /// The `resource` parameter is the base URL of the catalog API.
    async fn get_token(&self, resource: &str) -> Result<AccessToken, AuthError>;
}

/// A token provider that always returns the same static token.
///
/// Useful for testing or when a long-lived token is handed in from outside.
///
/// # Example
///
/// ```
/// use hubtree_lib::auth::StaticTokenProvider;
///
/// let provider = StaticTokenProvider::new("my-access-token");
/// ```
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: AccessToken,
}

impl StaticTokenProvider {
    /// Creates a new static token provider with the given access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            token: AccessToken::new(access_token),
        }
    }

    /// Creates a new static token provider from an existing AccessToken.
    pub fn from_token(token: AccessToken) -> Self {
        Self { token }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn get_token(&self, _resource: &str) -> Result<AccessToken, AuthError> {
        if self.token.is_expired() {
            return Err(AuthError::TokenExpired {
                message: "static token cannot be renewed".to_string(),
            });
        }
        Ok(self.token.clone())
    }
}

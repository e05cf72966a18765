//! OAuth2 token types and caching.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::error::OAuth2Error;

/// An OAuth2 access token with expiration tracking.
///
/// A token is valid while `now < expires_at`. Tokens issued without an
/// `expires_in` never expire.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct OAuth2Token {
    /// The access token value.
    access_token: String,
    /// When the token was received.
    #[zeroize(skip)]
    issued_at: Instant,
    /// When the token expires (if known).
    #[zeroize(skip)]
    expires_at: Option<Instant>,
}

impl OAuth2Token {
    /// Creates a new OAuth2 token without expiry.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            issued_at: Instant::now(),
            expires_at: None,
        }
    }

    /// Creates a new OAuth2 token with an expiration time.
    pub fn with_expiry(access_token: impl Into<String>, expires_in: Duration) -> Self {
        let issued_at = Instant::now();
        Self {
            access_token: access_token.into(),
            issued_at,
            expires_at: Some(issued_at + expires_in),
        }
    }

    /// Returns the access token value.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Returns when the token was received.
    pub fn issued_at(&self) -> Instant {
        self.issued_at
    }

    /// Returns when the token expires, if known.
    pub fn expires_at(&self) -> Option<Instant> {
        self.expires_at
    }

    /// Checks if the token is expired.
    ///
    /// Returns `false` if the token has no expiration time.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Instant::now() >= exp)
    }

    /// Checks if the token should be refreshed.
    ///
    /// Returns `true` if the token will expire within the given threshold.
    pub fn should_refresh(&self, threshold: Duration) -> bool {
        self.expires_at
            .is_some_and(|exp| Instant::now() + threshold >= exp)
    }

    /// Returns the time until expiration, if known.
    pub fn time_until_expiry(&self) -> Option<Duration> {
        self.expires_at.and_then(|exp| {
            let now = Instant::now();
            if now >= exp { None } else { Some(exp - now) }
        })
    }
}

impl fmt::Debug for OAuth2Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth2Token")
            .field("access_token", &"[REDACTED]")
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Thread-safe cache for OAuth2 tokens.
///
/// The lock is held for the whole check-and-refresh sequence, so at most one
/// token request is in flight; concurrent callers wait and reuse its result.
#[derive(Debug, Clone, Default)]
pub struct TokenCache {
    inner: Arc<Mutex<Option<OAuth2Token>>>,
}

impl TokenCache {
    /// Creates a new empty token cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached token if it exists and is not expired.
    pub async fn get(&self) -> Option<OAuth2Token> {
        let guard = self.inner.lock().await;
        guard.as_ref().filter(|token| !token.is_expired()).cloned()
    }

    /// Returns the cached token, or acquires and caches a new one.
    ///
    /// A new token is acquired when no token is cached, or when the cached
    /// token expires within `threshold`. A failed acquisition leaves the cache
    /// untouched.
    pub async fn get_or_refresh<F, Fut>(
        &self,
        threshold: Duration,
        acquire: F,
    ) -> Result<OAuth2Token, OAuth2Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<OAuth2Token, OAuth2Error>>,
    {
        let mut guard = self.inner.lock().await;
        if let Some(token) = guard
            .as_ref()
            .filter(|token| !token.should_refresh(threshold))
        {
            return Ok(token.clone());
        }

        let token = acquire().await?;
        *guard = Some(token.clone());
        Ok(token)
    }

    /// Stores a new token in the cache.
    pub async fn set(&self, token: OAuth2Token) {
        let mut guard = self.inner.lock().await;
        *guard = Some(token);
    }

    /// Clears the cached token.
    pub async fn clear(&self) {
        let mut guard = self.inner.lock().await;
        *guard = None;
    }
}

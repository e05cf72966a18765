//! OAuth2 configuration and builder.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use oauth2::reqwest;
use url::Url;

use super::error::OAuth2Error;
use super::token::TokenCache;
use crate::client::SecureString;

/// Default threshold for token refresh (60 seconds before expiry).
const DEFAULT_REFRESH_THRESHOLD: Duration = Duration::from_secs(60);

/// Default connect and request timeout of the token endpoint client.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// How the client credentials are sent to the token endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClientAuthMethod {
    /// HTTP Basic authentication header (`client_secret_basic`).
    #[default]
    BasicAuth,
    /// Form parameters in the request body (`client_secret_post`).
    RequestBody,
}

/// OAuth2 client credentials configuration.
///
/// Use [`OAuth2Config::client_credentials`] to create instances.
#[derive(Clone)]
pub struct OAuth2Config {
    pub(crate) client_id: String,
    pub(crate) client_secret: SecureString,
    pub(crate) token_url: Url,
    pub(crate) scopes: Vec<String>,
    pub(crate) auth_method: ClientAuthMethod,
    pub(crate) refresh_threshold: Duration,
    pub(crate) http_client: reqwest::Client,
    pub(crate) token_cache: TokenCache,
}

impl OAuth2Config {
    /// Creates a builder for the client credentials flow.
    ///
    /// # Errors
    ///
    /// Returns [`OAuth2Error::InvalidTokenEndpoint`] if `token_url` is not an absolute URL.
    pub fn client_credentials(
        client_id: impl Into<String>,
        client_secret: impl Into<SecureString>,
        token_url: impl AsRef<str>,
    ) -> Result<OAuth2ConfigBuilder, OAuth2Error> {
        Ok(OAuth2ConfigBuilder::new(client_id, token_url)?.with_client_secret(client_secret))
    }

    /// Returns the OAuth2 client identifier.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns the token endpoint.
    pub fn token_url(&self) -> &Url {
        &self.token_url
    }

    /// Returns the requested scopes.
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// Returns how long before expiry a token gets refreshed.
    pub fn refresh_threshold(&self) -> Duration {
        self.refresh_threshold
    }
}

impl fmt::Debug for OAuth2Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth2Config")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("token_url", &self.token_url)
            .field("scopes", &self.scopes)
            .field("auth_method", &self.auth_method)
            .field("refresh_threshold", &self.refresh_threshold)
            .finish()
    }
}

/// Builder for OAuth2 configuration.
#[derive(Clone)]
pub struct OAuth2ConfigBuilder {
    client_id: String,
    client_secret: Option<SecureString>,
    token_url: Url,
    scopes: Vec<String>,
    auth_method: ClientAuthMethod,
    refresh_threshold: Duration,
    connect_timeout: Duration,
    timeout: Duration,
}

impl OAuth2ConfigBuilder {
    /// Creates a new builder with required parameters.
    pub fn new(
        client_id: impl Into<String>,
        token_url: impl AsRef<str>,
    ) -> Result<Self, OAuth2Error> {
        let token_url =
            Url::parse(token_url.as_ref()).map_err(|e| OAuth2Error::InvalidTokenEndpoint {
                url: token_url.as_ref().to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client_id: client_id.into(),
            client_secret: None,
            token_url,
            scopes: Vec::new(),
            auth_method: ClientAuthMethod::default(),
            refresh_threshold: DEFAULT_REFRESH_THRESHOLD,
            connect_timeout: DEFAULT_TIMEOUT,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Sets the client secret.
    #[must_use]
    pub fn with_client_secret(mut self, secret: impl Into<SecureString>) -> Self {
        self.client_secret = Some(secret.into());
        self
    }

    /// Adds a scope.
    #[must_use]
    pub fn add_scope(mut self, scope: impl Into<String>) -> Self {
        self.scopes.push(scope.into());
        self
    }

    /// Adds multiple scopes.
    #[must_use]
    pub fn add_scopes(mut self, scopes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.scopes.extend(scopes.into_iter().map(Into::into));
        self
    }

    /// Sets how the client credentials are sent to the token endpoint.
    #[must_use]
    pub fn with_auth_method(mut self, auth_method: ClientAuthMethod) -> Self {
        self.auth_method = auth_method;
        self
    }

    /// Sets the refresh threshold (how long before expiry to refresh).
    #[must_use]
    pub fn with_refresh_threshold(mut self, threshold: Duration) -> Self {
        self.refresh_threshold = threshold;
        self
    }

    /// Sets the connect timeout of token requests.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the overall timeout of token requests.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the OAuth2 configuration.
    ///
    /// # Errors
    ///
    /// Returns [`OAuth2Error::ConfigurationError`] if the client secret is missing
    /// or the HTTP client for the token endpoint cannot be created.
    pub fn build(self) -> Result<OAuth2Config, OAuth2Error> {
        let Some(client_secret) = self.client_secret else {
            return Err(OAuth2Error::ConfigurationError {
                reason: "Client credentials flow requires a client secret".to_string(),
            });
        };

        // Redirects are disabled on the token client to prevent SSRF
        let http_client = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .connect_timeout(self.connect_timeout)
            .timeout(self.timeout)
            .build()
            .map_err(|e| OAuth2Error::ConfigurationError {
                reason: format!("Cannot build token endpoint client: {e}"),
            })?;

        Ok(OAuth2Config {
            client_id: self.client_id,
            client_secret,
            token_url: self.token_url,
            scopes: self.scopes,
            auth_method: self.auth_method,
            refresh_threshold: self.refresh_threshold,
            http_client,
            token_cache: TokenCache::new(),
        })
    }
}

impl fmt::Debug for OAuth2ConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth2ConfigBuilder")
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("token_url", &self.token_url)
            .field("scopes", &self.scopes)
            .field("auth_method", &self.auth_method)
            .finish()
    }
}

/// Wraps OAuth2Config in an Arc for sharing across async tasks.
///
/// Clones share the same token cache.
#[derive(Debug, Clone)]
pub struct SharedOAuth2Config(pub(crate) Arc<OAuth2Config>);

impl SharedOAuth2Config {
    /// Creates a new shared config.
    pub fn new(config: OAuth2Config) -> Self {
        Self(Arc::new(config))
    }

    /// Returns a reference to the inner config.
    pub fn inner(&self) -> &OAuth2Config {
        &self.0
    }
}

impl From<OAuth2Config> for SharedOAuth2Config {
    fn from(config: OAuth2Config) -> Self {
        Self::new(config)
    }
}

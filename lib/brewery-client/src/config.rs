//! Client configuration read from `BREWERY_*` environment variables.
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `BREWERY_ROOT_URL` | Root URL of the API (required) |
//! | `BREWERY_AUTH` | `oauth2`, `basic`, `bearer` or `none` |
//! | `BREWERY_CLIENT_ID`, `BREWERY_CLIENT_SECRET`, `BREWERY_TOKEN_URL` | OAuth2 client credentials |
//! | `BREWERY_SCOPES` | OAuth2 scopes, space or comma separated |
//! | `BREWERY_USERNAME`, `BREWERY_PASSWORD` | Basic authentication |
//! | `BREWERY_TOKEN` | Static bearer token |
//! | `BREWERY_CONNECT_TIMEOUT_SECS`, `BREWERY_TIMEOUT_SECS` | Timeouts, 5 seconds by default |
//!
//! When `BREWERY_AUTH` is not set, the mode is inferred from the credentials
//! present, in the order OAuth2, Basic, bearer.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::{
    ApiClient, Authentication, ClientError, DEFAULT_TIMEOUT, OAuth2Config, SecureString,
};

const ROOT_URL: &str = "BREWERY_ROOT_URL";
const AUTH: &str = "BREWERY_AUTH";
const CLIENT_ID: &str = "BREWERY_CLIENT_ID";
const CLIENT_SECRET: &str = "BREWERY_CLIENT_SECRET";
const TOKEN_URL: &str = "BREWERY_TOKEN_URL";
const SCOPES: &str = "BREWERY_SCOPES";
const USERNAME: &str = "BREWERY_USERNAME";
const PASSWORD: &str = "BREWERY_PASSWORD";
const TOKEN: &str = "BREWERY_TOKEN";
const CONNECT_TIMEOUT: &str = "BREWERY_CONNECT_TIMEOUT_SECS";
const TIMEOUT: &str = "BREWERY_TIMEOUT_SECS";

/// Authentication strategy selected by `BREWERY_AUTH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// OAuth2 client credentials.
    OAuth2,
    /// HTTP Basic authentication.
    Basic,
    /// Static bearer token.
    Bearer,
    /// No `Authorization` header.
    None,
}

impl FromStr for AuthMode {
    type Err = ClientError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "oauth2" => Ok(Self::OAuth2),
            "basic" => Ok(Self::Basic),
            "bearer" => Ok(Self::Bearer),
            "none" => Ok(Self::None),
            other => Err(ClientError::Config {
                message: format!(
                    "unknown {AUTH} '{other}', expected one of oauth2, basic, bearer, none"
                ),
            }),
        }
    }
}

/// Credentials of the selected authentication strategy.
#[derive(Clone)]
pub enum AuthConfig {
    /// OAuth2 client credentials.
    OAuth2 {
        /// The client identifier.
        client_id: String,
        /// The client secret.
        client_secret: SecureString,
        /// The token endpoint.
        token_url: String,
        /// The requested scopes.
        scopes: Vec<String>,
    },
    /// HTTP Basic authentication.
    Basic {
        /// The username.
        username: String,
        /// The password.
        password: SecureString,
    },
    /// Static bearer token.
    Bearer(SecureString),
    /// No authentication.
    None,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OAuth2 {
                client_id,
                token_url,
                scopes,
                ..
            } => f
                .debug_struct("OAuth2")
                .field("client_id", client_id)
                .field("client_secret", &"[REDACTED]")
                .field("token_url", token_url)
                .field("scopes", scopes)
                .finish(),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
            Self::Bearer(_) => f.debug_tuple("Bearer").field(&"[REDACTED]").finish(),
            Self::None => f.write_str("None"),
        }
    }
}

/// Everything needed to build an [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Root URL of the API.
    pub root_url: Url,
    /// Authentication strategy and credentials.
    pub auth: AuthConfig,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
    /// Overall request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if a required variable is missing or a
    /// value cannot be parsed.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, blank values count as missing.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if a required variable is missing or a
    /// value cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let require = |key: &str| {
            get(key).ok_or_else(|| ClientError::Config {
                message: format!("missing environment variable {key}"),
            })
        };

        let root_url = require(ROOT_URL)?;
        let root_url = Url::parse(&root_url).map_err(|err| ClientError::Config {
            message: format!("invalid {ROOT_URL} '{root_url}': {err}"),
        })?;

        let mode = match get(AUTH) {
            Some(mode) => mode.parse()?,
            None if get(CLIENT_ID).is_some() => AuthMode::OAuth2,
            None if get(USERNAME).is_some() => AuthMode::Basic,
            None if get(TOKEN).is_some() => AuthMode::Bearer,
            None => AuthMode::None,
        };

        let auth = match mode {
            AuthMode::OAuth2 => AuthConfig::OAuth2 {
                client_id: require(CLIENT_ID)?,
                client_secret: require(CLIENT_SECRET)?.into(),
                token_url: require(TOKEN_URL)?,
                scopes: get(SCOPES)
                    .map(|scopes| parse_scopes(&scopes))
                    .unwrap_or_default(),
            },
            AuthMode::Basic => AuthConfig::Basic {
                username: require(USERNAME)?,
                password: require(PASSWORD)?.into(),
            },
            AuthMode::Bearer => AuthConfig::Bearer(require(TOKEN)?.into()),
            AuthMode::None => AuthConfig::None,
        };

        let connect_timeout = parse_timeout(CONNECT_TIMEOUT, get(CONNECT_TIMEOUT))?;
        let timeout = parse_timeout(TIMEOUT, get(TIMEOUT))?;

        Ok(Self {
            root_url,
            auth,
            connect_timeout,
            timeout,
        })
    }

    /// Returns the selected mode.
    pub fn auth_mode(&self) -> AuthMode {
        match self.auth {
            AuthConfig::OAuth2 { .. } => AuthMode::OAuth2,
            AuthConfig::Basic { .. } => AuthMode::Basic,
            AuthConfig::Bearer(_) => AuthMode::Bearer,
            AuthConfig::None => AuthMode::None,
        }
    }

    /// Creates the authentication strategy.
    ///
    /// The OAuth2 token endpoint client uses the same timeouts as the API client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Authentication`] if the OAuth2 configuration is invalid.
    pub fn authentication(&self) -> Result<Option<Authentication>, ClientError> {
        let authentication = match &self.auth {
            AuthConfig::OAuth2 {
                client_id,
                client_secret,
                token_url,
                scopes,
            } => {
                let config =
                    OAuth2Config::client_credentials(client_id, client_secret.clone(), token_url)?
                        .add_scopes(scopes)
                        .with_connect_timeout(self.connect_timeout)
                        .with_timeout(self.timeout)
                        .build()?;
                Some(Authentication::OAuth2(config.into()))
            }
            AuthConfig::Basic { username, password } => Some(Authentication::Basic {
                username: username.clone(),
                password: password.clone(),
            }),
            AuthConfig::Bearer(token) => Some(Authentication::Bearer(token.clone())),
            AuthConfig::None => None,
        };
        Ok(authentication)
    }

    /// Builds the API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the authentication or the HTTP client cannot be created.
    pub fn build_client(&self) -> Result<ApiClient, ClientError> {
        let mut builder = ApiClient::builder()
            .with_base_url(self.root_url.clone())?
            .with_connect_timeout(self.connect_timeout)
            .with_timeout(self.timeout);
        if let Some(authentication) = self.authentication()? {
            builder = builder.with_authentication(authentication);
        }
        builder.build()
    }
}

fn parse_scopes(scopes: &str) -> Vec<String> {
    scopes
        .split(|ch: char| ch == ',' || ch.is_whitespace())
        .filter(|scope| !scope.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_timeout(key: &str, value: Option<String>) -> Result<Duration, ClientError> {
    let Some(value) = value else {
        return Ok(DEFAULT_TIMEOUT);
    };
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|err| ClientError::Config {
            message: format!("invalid {key} '{value}': {err}"),
        })
}

use std::fmt;

use base64::Engine;
use http::HeaderValue;
use reqwest::header::{AUTHORIZATION, HeaderName};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::oauth2::{OAuth2Error, SharedOAuth2Config};

/// Errors that can occur during authentication processing.
///
/// This enum provides granular error information for authentication-related failures,
/// allowing for more specific error handling and better debugging.
#[derive(
    Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display, derive_more::From,
)]
pub enum AuthenticationError {
    /// Bearer token contains invalid characters for HTTP headers.
    #[display("Bearer token contains invalid characters: {message}")]
    #[from(skip)]
    InvalidBearerToken {
        /// Description of the invalid characters or format issue.
        message: String,
    },

    /// Basic authentication username contains invalid characters.
    #[display("Basic auth username contains invalid characters: {message}")]
    #[from(skip)]
    InvalidUsername {
        /// Description of the invalid characters or format issue.
        message: String,
    },

    /// Basic authentication password contains invalid characters.
    #[display("Basic auth password contains invalid characters: {message}")]
    #[from(skip)]
    InvalidPassword {
        /// Description of the invalid characters or format issue.
        message: String,
    },

    /// The OAuth2 token could not be obtained.
    #[display("OAuth2 error: {_0}")]
    OAuth2(OAuth2Error),
}

/// Secure wrapper for sensitive string data that automatically zeroes memory on drop.
///
/// This wrapper ensures that sensitive authentication data is securely cleared from memory
/// when it's no longer needed, providing protection against memory inspection attacks.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecureString(String);

impl SecureString {
    /// Creates a new secure string from the provided value.
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Returns a reference to the inner string value.
    ///
    /// # Security Note
    /// The returned reference should not be stored for extended periods
    /// to minimize exposure time of sensitive data.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks if the secure string equals the given string slice.
    pub fn equals_str(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureString")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for SecureString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecureString {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

/// Authentication strategy applied to every request sent to the API.
///
/// The strategy is chosen when the client is configured; the
/// [`AuthInterceptor`](super::AuthInterceptor) turns it into an `Authorization` header.
///
/// # Security Features
///
/// - **Memory Protection**: Sensitive data is automatically cleared from memory when dropped
/// - **Display Masking**: Secrets are replaced by `[REDACTED]` when displayed
/// - **Debug Safety**: Authentication data is redacted in debug output
///
/// # Examples
///
/// ```rust
/// use brewery_client::{Authentication, OAuth2Config};
///
/// // Static bearer token
/// let auth = Authentication::Bearer("my-api-token".into());
///
/// // Basic authentication
/// let auth = Authentication::Basic {
///     username: "user".to_string(),
///     password: "pass".into(),
/// };
///
/// // OAuth2 client credentials
/// let oauth2 = OAuth2Config::client_credentials("client-id", "secret", "http://localhost:9000/oauth2/token")?
///     .add_scope("message.read")
///     .build()?;
/// let auth = Authentication::OAuth2(oauth2.into());
/// # Ok::<(), brewery_client::OAuth2Error>(())
/// ```
#[derive(Clone)]
pub enum Authentication {
    /// Bearer token authentication (RFC 6750).
    /// Adds `Authorization: Bearer <token>` header.
    Bearer(SecureString),

    /// HTTP Basic authentication (RFC 7617).
    /// Adds `Authorization: Basic <base64(username:password)>` header.
    Basic {
        /// The username for Basic authentication.
        username: String,
        /// The password for Basic authentication.
        password: SecureString,
    },

    /// OAuth2 client credentials authentication.
    ///
    /// Tokens are acquired on first use, cached, and refreshed when they expire.
    OAuth2(SharedOAuth2Config),
}

impl Authentication {
    /// Builds the `Authorization` header for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationError::InvalidBearerToken` if the token contains
    /// characters not allowed in HTTP headers.
    pub fn bearer_header(token: &str) -> Result<(HeaderName, HeaderValue), AuthenticationError> {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|err| {
            AuthenticationError::InvalidBearerToken {
                message: err.to_string(),
            }
        })?;
        value.set_sensitive(true);
        Ok((AUTHORIZATION, value))
    }

    /// Converts a static authentication into HTTP headers.
    ///
    /// Returns `None` for OAuth2, which requires an asynchronous token acquisition.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationError` if the authentication data contains invalid characters
    /// or cannot be properly formatted for HTTP headers.
    pub fn to_static_header(
        &self,
    ) -> Result<Option<(HeaderName, HeaderValue)>, AuthenticationError> {
        match self {
            Self::Bearer(token) => Self::bearer_header(token.as_str()).map(Some),

            Self::Basic { username, password } => {
                if username.contains(':') {
                    return Err(AuthenticationError::InvalidUsername {
                        message: "Username cannot contain colon (:) character".to_string(),
                    });
                }

                let credentials_str = format!("{username}:{}", password.as_str());
                let credentials = base64::engine::general_purpose::STANDARD.encode(credentials_str);

                let mut value = HeaderValue::from_str(&format!("Basic {credentials}")).map_err(
                    |err| AuthenticationError::InvalidPassword {
                        message: err.to_string(),
                    },
                )?;
                value.set_sensitive(true);
                Ok(Some((AUTHORIZATION, value)))
            }

            Self::OAuth2(_) => Ok(None),
        }
    }
}

impl Authentication {
    /// Short name of the strategy, safe to log.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bearer(_) => "bearer",
            Self::Basic { .. } => "basic",
            Self::OAuth2(_) => "oauth2",
        }
    }
}

impl fmt::Debug for Authentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bearer(_) => f.debug_tuple("Bearer").field(&"[REDACTED]").finish(),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
            Self::OAuth2(config) => f.debug_tuple("OAuth2").field(config).finish(),
        }
    }
}

impl fmt::Display for Authentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bearer(_) => f.write_str("Bearer [REDACTED]"),
            Self::Basic { username, .. } => write!(f, "Basic (username: {username})"),
            Self::OAuth2(config) => {
                write!(f, "OAuth2 (client_id: {})", config.inner().client_id())
            }
        }
    }
}

use super::auth::AuthenticationError;

/// Errors that can occur when using the [`ApiClient`](super::ApiClient).
///
/// Every failure surfaces unwrapped to the caller; the client never retries.
/// Callers are expected to match on the variants they can handle, for example
/// treating [`ClientError::NotFound`] as an expected outcome after a deletion.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum ClientError {
    /// The request could not be authenticated.
    ///
    /// Occurs when the OAuth2 token cannot be acquired, or when the configured
    /// credentials cannot be turned into an `Authorization` header.
    #[display("Authentication failed: {_0}")]
    Authentication(AuthenticationError),

    /// The server returned `404 Not Found`.
    #[display("Resource not found: {url}")]
    #[from(skip)]
    NotFound {
        /// The requested URL.
        url: String,
    },

    /// The server rejected the request with a `4xx` status (other than `404`).
    #[display("Client error {status} for {url}: {body}")]
    #[from(skip)]
    Client {
        /// The HTTP status code.
        status: u16,
        /// The requested URL.
        url: String,
        /// The (possibly truncated) response body.
        body: String,
    },

    /// The server failed with a `5xx` status.
    #[display("Server error {status} for {url}: {body}")]
    #[from(skip)]
    Server {
        /// The HTTP status code.
        status: u16,
        /// The requested URL.
        url: String,
        /// The (possibly truncated) response body.
        body: String,
    },

    /// HTTP transport error from the underlying reqwest library.
    ///
    /// Occurs when the connection fails or a timeout elapses.
    #[display("Transport error: {_0}")]
    Transport(reqwest::Error),

    /// The response body does not match the expected schema.
    #[display("Failed to decode response of '{url}' at '{path}': {error}\n{body}")]
    #[from(skip)]
    Decode {
        /// The requested URL.
        url: String,
        /// The JSON path where decoding failed.
        path: String,
        /// The underlying JSON error.
        error: serde_json::Error,
        /// The (possibly truncated) response body.
        body: String,
    },

    /// The creation response has no usable `Location` header.
    #[display("Invalid Location header {location:?}: {message}")]
    #[from(skip)]
    InvalidLocation {
        /// The raw header value, if any.
        location: Option<String>,
        /// Why the location cannot be used.
        message: String,
    },

    /// URL parsing error when building request URLs.
    #[display("Invalid URL: {_0}")]
    InvalidUrl(url::ParseError),

    /// The request body cannot be serialized to JSON.
    #[display("Serialization error: {_0}")]
    Serialization(serde_json::Error),

    /// Query parameter value type is not supported.
    #[display("Unsupported query parameter '{name}': objects are not supported. Got: {value}")]
    #[from(skip)]
    UnsupportedQueryParameter {
        /// The parameter name.
        name: String,
        /// The rejected value.
        value: serde_json::Value,
    },

    /// The beer to update has no identifier.
    #[display("The beer has no identifier")]
    #[from(skip)]
    MissingId,

    /// Invalid client configuration.
    #[display("Configuration error: {message}")]
    #[from(skip)]
    Config {
        /// Description of the configuration issue.
        message: String,
    },
}

impl ClientError {
    /// Returns `true` if the server answered `404 Not Found`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if the failure comes from authentication.
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }

    /// Returns the HTTP status code carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::Client { status, .. } | Self::Server { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }
}

impl From<super::oauth2::OAuth2Error> for ClientError {
    fn from(value: super::oauth2::OAuth2Error) -> Self {
        Self::Authentication(AuthenticationError::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<ClientError>();
        assert_sync::<ClientError>();
    }

    #[test]
    fn test_status_of_http_errors() {
        let not_found = ClientError::NotFound {
            url: "http://localhost/api/v1/beer/42".to_string(),
        };
        assert!(not_found.is_not_found());
        assert_eq!(not_found.status(), Some(404));

        let conflict = ClientError::Client {
            status: 409,
            url: "http://localhost/api/v1/beer".to_string(),
            body: String::new(),
        };
        assert!(!conflict.is_not_found());
        assert_eq!(conflict.status(), Some(409));

        assert_eq!(ClientError::MissingId.status(), None);
    }

    #[test]
    fn test_display() {
        let error = ClientError::Server {
            status: 503,
            url: "http://localhost/api/v1/beer".to_string(),
            body: "maintenance".to_string(),
        };
        insta::assert_snapshot!(error.to_string(), @"Server error 503 for http://localhost/api/v1/beer: maintenance");

        let error = ClientError::from(AuthenticationError::InvalidUsername {
            message: "Username cannot contain colon (:) character".to_string(),
        });
        assert!(error.is_authentication());
        insta::assert_snapshot!(error.to_string(), @"Authentication failed: Basic auth username contains invalid characters: Username cannot contain colon (:) character");
    }
}

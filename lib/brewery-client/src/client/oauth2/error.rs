//! Failures of the client-credentials token exchange.

/// Errors raised while configuring OAuth2 or exchanging client credentials for a token.
///
/// Token endpoint failures carry the endpoint URL, so a misrouted
/// `BREWERY_TOKEN_URL` is visible in the message.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display)]
pub enum OAuth2Error {
    /// The token endpoint is not an absolute URL.
    #[display("Invalid token endpoint '{url}': {reason}")]
    InvalidTokenEndpoint {
        /// The rejected URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The authorization server answered with an OAuth2 error response.
    #[display(
        "Token endpoint {token_url} rejected the client credentials with '{code}': {}",
        description.as_deref().unwrap_or("no description")
    )]
    TokenAcquisitionFailed {
        /// The token endpoint.
        token_url: String,
        /// The OAuth2 `error` code, e.g. `invalid_client`.
        code: String,
        /// The OAuth2 `error_description`, when the server sent one.
        description: Option<String>,
    },

    /// The token endpoint answered with something that is not a token response.
    #[display("Unexpected token response from {token_url}: {reason}")]
    InvalidTokenResponse {
        /// The token endpoint.
        token_url: String,
        /// What could not be understood.
        reason: String,
    },

    /// The token endpoint could not be reached, or did not answer in time.
    #[display("Token request to {token_url} failed: {reason}")]
    NetworkError {
        /// The token endpoint.
        token_url: String,
        /// Whether the configured timeout elapsed.
        timed_out: bool,
        /// The transport failure, with its causes.
        reason: String,
    },

    /// The OAuth2 settings are incomplete.
    #[display("Invalid OAuth2 configuration: {reason}")]
    ConfigurationError {
        /// The missing or inconsistent setting.
        reason: String,
    },
}

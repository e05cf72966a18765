//! OAuth2 token provider for acquiring and refreshing tokens.

use oauth2::basic::{BasicClient, BasicErrorResponse};
use oauth2::{
    AuthType, ClientId, ClientSecret, HttpClientError, RequestTokenError, Scope, TokenResponse,
    TokenUrl,
};
use tracing::{debug, info, warn};

use super::config::{ClientAuthMethod, OAuth2Config};
use super::error::OAuth2Error;
use super::token::OAuth2Token;

type TokenRequestError =
    RequestTokenError<HttpClientError<oauth2::reqwest::Error>, BasicErrorResponse>;

impl OAuth2Config {
    /// Requests a new access token from the token endpoint.
    ///
    /// The token is not cached; use [`get_valid_token`](Self::get_valid_token)
    /// to go through the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Network request fails or times out
    /// - Token endpoint returns an error
    /// - Response cannot be parsed
    pub async fn acquire_token(&self) -> Result<OAuth2Token, OAuth2Error> {
        let token_url = TokenUrl::new(self.token_url.to_string()).map_err(|e| {
            OAuth2Error::InvalidTokenEndpoint {
                url: self.token_url.to_string(),
                reason: e.to_string(),
            }
        })?;
        let auth_type = match self.auth_method {
            ClientAuthMethod::BasicAuth => AuthType::BasicAuth,
            ClientAuthMethod::RequestBody => AuthType::RequestBody,
        };

        let client = BasicClient::new(ClientId::new(self.client_id.clone()))
            .set_client_secret(ClientSecret::new(self.client_secret.as_str().to_string()))
            .set_token_uri(token_url)
            .set_auth_type(auth_type);

        debug!(token_url = %self.token_url, scopes = ?self.scopes, "requesting OAuth2 token");
        let token_result = client
            .exchange_client_credentials()
            .add_scopes(self.scopes.iter().cloned().map(Scope::new))
            .request_async(&self.http_client)
            .await
            .map_err(|err| {
                warn!(token_url = %self.token_url, %err, "OAuth2 token request failed");
                self.token_error(err)
            })?;

        let access_token = token_result.access_token().secret().clone();
        let token = match token_result.expires_in() {
            Some(expires_in) => OAuth2Token::with_expiry(access_token, expires_in),
            None => OAuth2Token::new(access_token),
        };

        info!(
            client_id = %self.client_id,
            expires_in = ?token.time_until_expiry(),
            "OAuth2 token acquired"
        );
        Ok(token)
    }

    fn token_error(&self, err: TokenRequestError) -> OAuth2Error {
        let token_url = self.token_url.to_string();
        match err {
            RequestTokenError::ServerResponse(response) => OAuth2Error::TokenAcquisitionFailed {
                token_url,
                code: response.error().to_string(),
                description: response.error_description().cloned(),
            },
            RequestTokenError::Request(err) => OAuth2Error::NetworkError {
                token_url,
                timed_out: matches!(&err, HttpClientError::Reqwest(inner) if inner.is_timeout()),
                reason: error_chain(&err),
            },
            RequestTokenError::Parse(err, _) => OAuth2Error::InvalidTokenResponse {
                token_url,
                reason: format!("at '{}': {}", err.path(), err.inner()),
            },
            RequestTokenError::Other(reason) => {
                OAuth2Error::InvalidTokenResponse { token_url, reason }
            }
        }
    }

    /// Gets a valid token, acquiring a new one if necessary.
    ///
    /// The cached token is reused until it comes within the refresh threshold
    /// of its expiry. Concurrent callers share a single acquisition.
    pub async fn get_valid_token(&self) -> Result<OAuth2Token, OAuth2Error> {
        self.token_cache
            .get_or_refresh(self.refresh_threshold, || self.acquire_token())
            .await
    }

    /// Drops the cached token, forcing the next request to acquire a new one.
    pub async fn invalidate(&self) {
        self.token_cache.clear().await;
    }
}

/// Renders an error followed by its causes.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut reason = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        reason.push_str(": ");
        reason.push_str(&cause.to_string());
        source = cause.source();
    }
    reason
}

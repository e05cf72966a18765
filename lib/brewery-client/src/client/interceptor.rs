use tracing::debug;

use super::{Authentication, AuthenticationError, ClientError};

/// Attaches the `Authorization` header to every outgoing request.
///
/// Clones share the OAuth2 token cache of the configured [`Authentication`].
#[derive(Debug, Clone, Default)]
pub struct AuthInterceptor {
    authentication: Option<Authentication>,
}

impl AuthInterceptor {
    /// Creates an interceptor for the given strategy; `None` forwards requests unchanged.
    pub fn new(authentication: Option<Authentication>) -> Self {
        Self { authentication }
    }

    /// Returns the configured strategy.
    pub fn authentication(&self) -> Option<&Authentication> {
        self.authentication.as_ref()
    }

    /// Resolves the authorization header and sets it on the request.
    ///
    /// With OAuth2 a token is acquired first if none is cached or the cached
    /// one is about to expire.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Authentication`] if the token cannot be acquired
    /// or the credentials cannot be turned into a header.
    pub async fn attach(&self, request: &mut reqwest::Request) -> Result<(), ClientError> {
        let Some(authentication) = &self.authentication else {
            return Ok(());
        };

        let (name, value) = match authentication {
            Authentication::OAuth2(config) => {
                let token = config
                    .inner()
                    .get_valid_token()
                    .await
                    .map_err(AuthenticationError::from)?;
                Authentication::bearer_header(token.access_token())?
            }
            _ => match authentication.to_static_header()? {
                Some(header) => header,
                None => return Ok(()),
            },
        };

        debug!(auth = authentication.kind(), "attaching authorization");
        request.headers_mut().insert(name, value);
        Ok(())
    }

    /// Drops any cached OAuth2 token, so the next request acquires a fresh one.
    pub async fn invalidate(&self) {
        if let Some(Authentication::OAuth2(config)) = &self.authentication {
            config.inner().invalidate().await;
        }
    }
}

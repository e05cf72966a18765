use std::time::Duration;

use url::Url;

use super::{ApiClient, AuthInterceptor, Authentication, ClientError};

/// Default connect and request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080/";

/// Builder for creating `ApiClient` instances.
///
/// # Default Configuration
///
/// - **Base URL**: `http://127.0.0.1:8080/`
/// - **Authentication**: None (requests are sent without `Authorization`)
/// - **Connect timeout**: 5 seconds
/// - **Request timeout**: 5 seconds
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use brewery_client::{ApiClient, Authentication};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ApiClient::builder()
///     .with_base_url("http://localhost:8080".parse()?)?
///     .with_authentication(Authentication::Bearer("my-token".into()))
///     .with_connect_timeout(Duration::from_secs(2))
///     .with_timeout(Duration::from_secs(10))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClientBuilder {
    base_url: Option<Url>,
    authentication: Option<Authentication>,
    connect_timeout: Duration,
    timeout: Duration,
}

impl ApiClientBuilder {
    /// Builds the final `ApiClient` instance with all configured settings.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the underlying HTTP client cannot be created.
    pub fn build(self) -> Result<ApiClient, ClientError> {
        let Self {
            base_url,
            authentication,
            connect_timeout,
            timeout,
        } = self;

        let base_url = match base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL)?,
        };

        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .build()?;

        Ok(ApiClient {
            client,
            base_url,
            interceptor: AuthInterceptor::new(authentication),
        })
    }

    /// Sets the root URL of the API.
    ///
    /// Request paths such as `/api/v1/beer` are resolved against this URL; a
    /// path prefix (`http://host/prefix`) is kept.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if the URL cannot be a base (e.g. `mailto:`).
    pub fn with_base_url(mut self, base_url: Url) -> Result<Self, ClientError> {
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Config {
                message: format!("'{base_url}' cannot be used as a base URL"),
            });
        }
        self.base_url = Some(base_url);
        Ok(self)
    }

    /// Sets the authentication strategy applied to every request.
    pub fn with_authentication(mut self, authentication: Authentication) -> Self {
        self.authentication = Some(authentication);
        self
    }

    /// Sets the TCP connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the overall timeout of a request, from sending until the body is read.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            authentication: None,
            connect_timeout: DEFAULT_TIMEOUT,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

use std::future::Future;

use http::{HeaderValue, Method};
use reqwest::header::{ACCEPT, CONTENT_TYPE, LOCATION};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::model::{Beer, Page};

mod auth;
pub use self::auth::{Authentication, AuthenticationError, SecureString};

mod builder;
pub use self::builder::{ApiClientBuilder, DEFAULT_TIMEOUT};

mod error;
pub use self::error::ClientError;

mod interceptor;
pub use self::interceptor::AuthInterceptor;

pub mod oauth2;
pub use self::oauth2::{OAuth2Config, OAuth2ConfigBuilder, OAuth2Error, OAuth2Token};

mod query;
pub use self::query::{BeerQuery, QueryParams};

mod status;
use self::status::{check_status, truncate_body};

/// Path of the beer collection.
pub const BEER_PATH: &str = "/api/v1/beer";

const JSON: &str = "application/json";

/// Operations on the remote beer resource.
///
/// Every call goes through the configured [`AuthInterceptor`]. Errors are
/// surfaced as-is; nothing is retried.
pub trait BeerClient {
    /// Lists beers without any filter.
    fn list_beers(&self) -> impl Future<Output = Result<Page<Beer>, ClientError>> + Send;

    /// Lists beers, sending each entry of `params` as a query parameter.
    ///
    /// An empty mapping behaves as [`list_beers`](Self::list_beers).
    fn list_beers_with(
        &self,
        params: &QueryParams,
    ) -> impl Future<Output = Result<Page<Beer>, ClientError>> + Send;

    /// Fetches a beer by identifier.
    fn get_beer(&self, id: Uuid) -> impl Future<Output = Result<Beer, ClientError>> + Send;

    /// Creates a beer, then reads it back from the returned `Location`.
    fn create_beer(&self, beer: &Beer) -> impl Future<Output = Result<Beer, ClientError>> + Send;

    /// Replaces a beer, then reads it back by identifier.
    fn update_beer(&self, beer: &Beer) -> impl Future<Output = Result<Beer, ClientError>> + Send;

    /// Deletes a beer.
    fn delete_beer(&self, id: Uuid) -> impl Future<Output = Result<(), ClientError>> + Send;
}

/// HTTP client of the brewery API.
///
/// Use [`ApiClientBuilder`] to create instances. Clones share the connection
/// pool and the OAuth2 token cache.
///
/// # Example
///
/// ```rust,no_run
/// use brewery_client::{ApiClient, BeerClient, BeerQuery};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ApiClient::builder()
///     .with_base_url("http://localhost:8080".parse()?)?
///     .build()?;
///
/// let page = client
///     .list_beers_with(&BeerQuery::new().with_beer_name("Mango").into())
///     .await?;
/// for beer in &page {
///     println!("{} ({})", beer.beer_name, beer.beer_style);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
    interceptor: AuthInterceptor,
}

// Create
impl ApiClient {
    /// Creates a builder with the default configuration.
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Returns the root URL of the API.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the interceptor that authenticates requests.
    pub fn interceptor(&self) -> &AuthInterceptor {
        &self.interceptor
    }
}

// Transport
impl ApiClient {
    fn beer_url(&self, id: Uuid) -> Result<Url, ClientError> {
        join_path(&self.base_url, &format!("{BEER_PATH}/{id}"))
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<Vec<u8>>,
    ) -> Result<reqwest::Response, ClientError> {
        let mut request = reqwest::Request::new(method, url);
        let headers = request.headers_mut();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON));
        if let Some(body) = body {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));
            *request.body_mut() = Some(reqwest::Body::from(body));
        }

        self.interceptor.attach(&mut request).await?;

        debug!(?request, "sending...");
        let response = self.client.execute(request).await?;
        debug!(?response, "...receiving");

        check_status(response).await
    }

    async fn fetch<T>(&self, url: Url) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let response = self.send(Method::GET, url, None).await?;
        let url = response.url().to_string();
        let text = response.text().await?;
        decode_json(&url, &text)
    }

    fn resolve_location(&self, response: &reqwest::Response) -> Result<Url, ClientError> {
        let Some(raw) = response.headers().get(LOCATION) else {
            return Err(ClientError::InvalidLocation {
                location: None,
                message: "missing Location header".to_string(),
            });
        };
        let location = raw.to_str().map_err(|err| ClientError::InvalidLocation {
            location: Some(String::from_utf8_lossy(raw.as_bytes()).into_owned()),
            message: err.to_string(),
        })?;

        resolve_location(&self.base_url, location)
    }
}

impl BeerClient for ApiClient {
    async fn list_beers(&self) -> Result<Page<Beer>, ClientError> {
        self.list_beers_with(&QueryParams::new()).await
    }

    async fn list_beers_with(&self, params: &QueryParams) -> Result<Page<Beer>, ClientError> {
        let mut url = join_path(&self.base_url, BEER_PATH)?;
        query::append_query(&mut url, params)?;
        self.fetch(url).await
    }

    async fn get_beer(&self, id: Uuid) -> Result<Beer, ClientError> {
        let url = self.beer_url(id)?;
        self.fetch(url).await
    }

    async fn create_beer(&self, beer: &Beer) -> Result<Beer, ClientError> {
        let url = join_path(&self.base_url, BEER_PATH)?;
        let body = serde_json::to_vec(beer)?;
        let response = self.send(Method::POST, url, Some(body)).await?;

        let location = self.resolve_location(&response)?;
        debug!(%location, "beer created");
        self.fetch(location).await
    }

    async fn update_beer(&self, beer: &Beer) -> Result<Beer, ClientError> {
        let id = beer.id.ok_or(ClientError::MissingId)?;
        let url = self.beer_url(id)?;
        let body = serde_json::to_vec(beer)?;
        self.send(Method::PUT, url, Some(body)).await?;

        self.get_beer(id).await
    }

    async fn delete_beer(&self, id: Uuid) -> Result<(), ClientError> {
        let url = self.beer_url(id)?;
        self.send(Method::DELETE, url, None).await?;
        Ok(())
    }
}

/// Appends `path` to the base URL, keeping any path prefix of the base.
fn join_path(base_url: &Url, path: &str) -> Result<Url, ClientError> {
    let url = format!(
        "{}/{}",
        base_url.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    let url = url.parse::<Url>()?;
    Ok(url)
}

/// Resolves a `Location` header against the base URL.
///
/// Absolute locations keep only their path and query, re-rooted on the base URL.
fn resolve_location(base_url: &Url, location: &str) -> Result<Url, ClientError> {
    let invalid = |message: String| ClientError::InvalidLocation {
        location: Some(location.to_string()),
        message,
    };

    match Url::parse(location) {
        Ok(absolute) => {
            if absolute.cannot_be_a_base() {
                return Err(invalid("not a hierarchical URL".to_string()));
            }
            let mut url = join_path(base_url, absolute.path())?;
            url.set_query(absolute.query());
            Ok(url)
        }
        Err(url::ParseError::RelativeUrlWithoutBase) if !location.trim().is_empty() => {
            join_path(base_url, location)
        }
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Err(invalid("empty Location header".to_string()))
        }
        Err(err) => Err(invalid(err.to_string())),
    }
}

fn decode_json<T>(url: &str, text: &str) -> Result<T, ClientError>
where
    T: DeserializeOwned,
{
    let deserializer = &mut serde_json::Deserializer::from_str(text);
    serde_path_to_error::deserialize(deserializer).map_err(|err| {
        let path = err.path().to_string();
        ClientError::Decode {
            url: url.to_string(),
            path,
            error: err.into_inner(),
            body: truncate_body(text.to_string()),
        }
    })
}

//! # Brewery Client
//!
//! Typed HTTP client for the brewery beer API, with OAuth2 client-credentials
//! authentication.
//!
//! The crate provides:
//! - **[`BeerClient`]** - the operations on the beer resource (list, get, create, update, delete)
//! - **[`ApiClient`]** - its HTTP implementation, configured with [`ApiClientBuilder`]
//! - **[`AuthInterceptor`]** - attaches the `Authorization` header to every request
//! - **[`model`]** - the [`Beer`](model::Beer) and [`Page`](model::Page) data types
//! - **[`config`]** - configuration from `BREWERY_*` environment variables
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use brewery_client::model::{Beer, BeerStyle};
//! use brewery_client::{ApiClient, Authentication, BeerClient, OAuth2Config};
//! use rust_decimal::Decimal;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let oauth2 = OAuth2Config::client_credentials(
//!     "messaging-client",
//!     "secret",
//!     "http://localhost:9000/oauth2/token",
//! )?
//! .add_scope("message.read")
//! .add_scope("message.write")
//! .build()?;
//!
//! let client = ApiClient::builder()
//!     .with_base_url("http://localhost:8080".parse()?)?
//!     .with_authentication(Authentication::OAuth2(oauth2.into()))
//!     .build()?;
//!
//! // The token is acquired on the first request, then reused
//! let created = client
//!     .create_beer(&Beer::new("Mango Bobs", BeerStyle::Ipa, "123245", Decimal::new(1099, 2), 500))
//!     .await?;
//!
//! let mut beer = created.clone();
//! beer.beer_name = "Mango Bobs 2".to_string();
//! let updated = client.update_beer(&beer).await?;
//! assert_eq!(updated.id, created.id);
//! # Ok(())
//! # }
//! ```
//!
//! ## Filtering and Pagination
//!
//! ```rust,no_run
//! use brewery_client::model::BeerStyle;
//! use brewery_client::{ApiClient, BeerClient, BeerQuery, QueryParams};
//!
//! # async fn example(client: &ApiClient) -> Result<(), Box<dyn std::error::Error>> {
//! // Typed options
//! let query = BeerQuery::new()
//!     .with_beer_style(BeerStyle::PaleAle)
//!     .with_page_number(2)
//!     .with_page_size(10);
//! let page = client.list_beers_with(&query.into()).await?;
//! println!("page {} of {}", page.page_number(), page.total_pages());
//!
//! // Raw parameters, sent in insertion order
//! let mut params = QueryParams::new();
//! params.insert("beerName".to_string(), "IPA".into());
//! let page = client.list_beers_with(&params).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns a [`ClientError`]. Nothing is retried: a `404`
//! becomes [`ClientError::NotFound`], a failed token request becomes
//! [`ClientError::Authentication`], and a body that does not match the model
//! becomes [`ClientError::Decode`] with the JSON path of the mismatch.
//!
//! ```rust,no_run
//! use brewery_client::{ApiClient, BeerClient};
//! use uuid::Uuid;
//!
//! # async fn example(client: &ApiClient, id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
//! client.delete_beer(id).await?;
//! match client.get_beer(id).await {
//!     Err(err) if err.is_not_found() => println!("deleted"),
//!     other => println!("unexpected: {other:?}"),
//! }
//! # Ok(())
//! # }
//! ```

mod client;

pub mod config;
pub mod model;

pub use self::client::{
    ApiClient, ApiClientBuilder, AuthInterceptor, Authentication, AuthenticationError, BEER_PATH,
    BeerClient, BeerQuery, ClientError, DEFAULT_TIMEOUT, OAuth2Config, OAuth2ConfigBuilder,
    OAuth2Error, OAuth2Token, QueryParams, SecureString, oauth2,
};

//! OAuth2 client credentials support.
//!
//! Tokens are requested from the authorization server with the `oauth2` crate,
//! cached, and reused until they come close to expiry.
//!
//! # Example
//!
//! ```rust,no_run
//! use brewery_client::{ApiClient, Authentication, OAuth2Config};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let oauth2 = OAuth2Config::client_credentials(
//!     "messaging-client",
//!     "secret",
//!     "http://localhost:9000/oauth2/token",
//! )?
//! .add_scope("message.read")
//! .build()?;
//!
//! let client = ApiClient::builder()
//!     .with_base_url("http://localhost:8080".parse()?)?
//!     .with_authentication(Authentication::OAuth2(oauth2.into()))
//!     .build()?;
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod provider;
mod token;

pub use self::config::{ClientAuthMethod, OAuth2Config, OAuth2ConfigBuilder, SharedOAuth2Config};
pub use self::error::OAuth2Error;
pub use self::token::{OAuth2Token, TokenCache};

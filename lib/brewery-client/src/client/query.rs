use indexmap::IndexMap;
use serde_json::Value;
use url::Url;

use super::ClientError;
use crate::model::BeerStyle;

/// Query parameters of a listing request, kept in insertion order.
pub type QueryParams = IndexMap<String, Value>;

/// Typed filter and pagination options for [`list_beers_with`](super::BeerClient::list_beers_with).
///
/// # Example
///
/// ```rust
/// use brewery_client::{BeerQuery, QueryParams};
/// use brewery_client::model::BeerStyle;
///
/// let params = QueryParams::from(
///     BeerQuery::new()
///         .with_beer_style(BeerStyle::Ipa)
///         .with_page_number(2)
///         .with_page_size(10),
/// );
/// assert_eq!(params.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeerQuery {
    beer_name: Option<String>,
    beer_style: Option<BeerStyle>,
    show_inventory: Option<bool>,
    page_number: Option<u32>,
    page_size: Option<u32>,
}

impl BeerQuery {
    /// Creates an empty query, equivalent to an unfiltered listing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters on the beer name.
    #[must_use]
    pub fn with_beer_name(mut self, beer_name: impl Into<String>) -> Self {
        self.beer_name = Some(beer_name.into());
        self
    }

    /// Filters on the beer style.
    #[must_use]
    pub fn with_beer_style(mut self, beer_style: BeerStyle) -> Self {
        self.beer_style = Some(beer_style);
        self
    }

    /// Asks the server to include the quantity on hand.
    #[must_use]
    pub fn with_show_inventory(mut self, show_inventory: bool) -> Self {
        self.show_inventory = Some(show_inventory);
        self
    }

    /// Selects the page to fetch.
    #[must_use]
    pub fn with_page_number(mut self, page_number: u32) -> Self {
        self.page_number = Some(page_number);
        self
    }

    /// Sets the maximum number of beers per page.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Returns `true` if no option is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<&BeerQuery> for QueryParams {
    fn from(query: &BeerQuery) -> Self {
        let mut params = Self::new();
        if let Some(name) = &query.beer_name {
            params.insert("beerName".to_string(), Value::from(name.as_str()));
        }
        if let Some(style) = query.beer_style {
            params.insert("beerStyle".to_string(), Value::from(style.as_str()));
        }
        if let Some(show) = query.show_inventory {
            params.insert("showInventory".to_string(), Value::from(show));
        }
        if let Some(number) = query.page_number {
            params.insert("pageNumber".to_string(), Value::from(number));
        }
        if let Some(size) = query.page_size {
            params.insert("pageSize".to_string(), Value::from(size));
        }
        params
    }
}

impl From<BeerQuery> for QueryParams {
    fn from(query: BeerQuery) -> Self {
        Self::from(&query)
    }
}

/// Appends the parameters to the URL query string.
///
/// Strings are used as-is, numbers and booleans are stringified, arrays become
/// repeated keys and `null` values are skipped. An empty mapping leaves the URL
/// untouched.
pub(crate) fn append_query(url: &mut Url, params: &QueryParams) -> Result<(), ClientError> {
    let mut pairs = Vec::with_capacity(params.len());
    for (name, value) in params {
        match value {
            Value::Array(items) => {
                for item in items {
                    if let Some(text) = scalar_to_string(name, item)? {
                        pairs.push((name.as_str(), text));
                    }
                }
            }
            _ => {
                if let Some(text) = scalar_to_string(name, value)? {
                    pairs.push((name.as_str(), text));
                }
            }
        }
    }

    if !pairs.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(pairs.iter().map(|(name, value)| (*name, value.as_str())));
    }
    Ok(())
}

fn scalar_to_string(name: &str, value: &Value) -> Result<Option<String>, ClientError> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text.clone())),
        Value::Bool(flag) => Ok(Some(flag.to_string())),
        Value::Number(number) => Ok(Some(number.to_string())),
        Value::Array(_) | Value::Object(_) => Err(ClientError::UnsupportedQueryParameter {
            name: name.to_string(),
            value: value.clone(),
        }),
    }
}

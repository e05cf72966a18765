use std::fmt;
use std::str::FromStr;

use jiff::civil::DateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Beer style, as exposed by the brewery API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BeerStyle {
    /// Lager.
    Lager,
    /// Pilsner.
    Pilsner,
    /// Stout.
    Stout,
    /// Gose.
    Gose,
    /// Porter.
    Porter,
    /// Ale.
    Ale,
    /// Wheat beer.
    Wheat,
    /// India pale ale.
    Ipa,
    /// Pale ale.
    PaleAle,
    /// Saison.
    Saison,
}

impl BeerStyle {
    /// All known styles, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Lager,
        Self::Pilsner,
        Self::Stout,
        Self::Gose,
        Self::Porter,
        Self::Ale,
        Self::Wheat,
        Self::Ipa,
        Self::PaleAle,
        Self::Saison,
    ];

    /// The wire name of the style (e.g. `PALE_ALE`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lager => "LAGER",
            Self::Pilsner => "PILSNER",
            Self::Stout => "STOUT",
            Self::Gose => "GOSE",
            Self::Porter => "PORTER",
            Self::Ale => "ALE",
            Self::Wheat => "WHEAT",
            Self::Ipa => "IPA",
            Self::PaleAle => "PALE_ALE",
            Self::Saison => "SAISON",
        }
    }
}

impl fmt::Display for BeerStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown beer style.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display)]
#[display("Unknown beer style '{value}'")]
pub struct UnknownBeerStyle {
    /// The rejected input.
    pub value: String,
}

impl FromStr for BeerStyle {
    type Err = UnknownBeerStyle;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().replace(['-', ' '], "_").to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|style| style.as_str() == normalized)
            .ok_or_else(|| UnknownBeerStyle {
                value: value.to_string(),
            })
    }
}

/// A beer, as stored by the brewery API.
///
/// The `id`, `version` and timestamps are managed by the server: build a
/// beer without them for creation, the server assigns them.
///
/// # Example
///
/// ```rust
/// use brewery_client::model::{Beer, BeerStyle};
/// use rust_decimal::Decimal;
///
/// let beer = Beer::new("Mango Bobs", BeerStyle::Ipa, "123245", Decimal::new(1099, 2), 500);
/// assert!(beer.id.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Beer {
    /// Server-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// Optimistic locking version, managed by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i32>,
    /// The beer name.
    pub beer_name: String,
    /// The beer style.
    pub beer_style: BeerStyle,
    /// Universal product code.
    pub upc: String,
    /// Quantity on hand, `None` when the server hides the inventory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity_on_hand: Option<i32>,
    /// Unit price.
    pub price: Decimal,
    /// Creation date, set by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime>,
    /// Last update date, set by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_date: Option<DateTime>,
}

impl Beer {
    /// Creates a new beer without server-managed fields.
    pub fn new(
        beer_name: impl Into<String>,
        beer_style: BeerStyle,
        upc: impl Into<String>,
        price: Decimal,
        quantity_on_hand: i32,
    ) -> Self {
        Self {
            id: None,
            version: None,
            beer_name: beer_name.into(),
            beer_style,
            upc: upc.into(),
            quantity_on_hand: Some(quantity_on_hand),
            price,
            created_date: None,
            update_date: None,
        }
    }

    /// Returns a copy of this beer with the given identifier.
    #[must_use]
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    /// Checks that the business fields (name, style, UPC, price, quantity) are equal.
    ///
    /// Server-managed fields are ignored.
    pub fn same_content(&self, other: &Self) -> bool {
        self.beer_name == other.beer_name
            && self.beer_style == other.beer_style
            && self.upc == other.upc
            && self.price == other.price
            && self.quantity_on_hand == other.quantity_on_hand
    }
}

//! Data types exchanged with the brewery API.

mod beer;
pub use self::beer::{Beer, BeerStyle, UnknownBeerStyle};

mod page;
pub use self::page::{Page, PageEnvelopeError};

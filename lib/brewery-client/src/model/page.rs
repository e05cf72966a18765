use serde::{Deserialize, Serialize};

/// A page of results returned by a list endpoint.
///
/// A `Page` is only built by deserializing the JSON envelope sent by the server.
/// Two envelope layouts are accepted:
///
/// - the flat layout: `{"content": [..], "number": 0, "size": 25, "totalElements": 1}`
///   (`pageNumber` and `pageSize` are accepted as aliases, other fields are ignored),
/// - the nested layout: `{"content": [..], "page": {"number": 0, "size": 25, "totalElements": 1, "totalPages": 1}}`.
///
/// The envelope is rejected when it holds more elements than its page size.
///
/// # Example
///
/// ```rust
/// use brewery_client::model::Page;
///
/// let json = r#"{"content": ["a", "b"], "number": 0, "size": 2, "totalElements": 5}"#;
/// let page: Page<String> = serde_json::from_str(json)?;
///
/// assert_eq!(page.len(), 2);
/// assert_eq!(page.total_pages(), 3);
/// assert!(page.is_first());
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "PageEnvelope<T>",
    bound(deserialize = "T: Deserialize<'de>")
)]
pub struct Page<T> {
    content: Vec<T>,
    #[serde(rename = "number")]
    page_number: u64,
    #[serde(rename = "size")]
    page_size: u64,
    #[serde(rename = "totalElements")]
    total_elements: u64,
    #[serde(rename = "totalPages")]
    total_pages: u64,
}

impl<T> Page<T> {
    /// The elements of this page.
    pub fn content(&self) -> &[T] {
        &self.content
    }

    /// Consumes the page, returning its elements.
    pub fn into_content(self) -> Vec<T> {
        self.content
    }

    /// The (zero-based) page number.
    pub fn page_number(&self) -> u64 {
        self.page_number
    }

    /// The requested page size.
    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Total number of elements across all pages.
    pub fn total_elements(&self) -> u64 {
        self.total_elements
    }

    /// Total number of pages.
    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    /// Number of elements in this page.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Returns `true` if this page has no element.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Returns `true` if this is the first page.
    pub fn is_first(&self) -> bool {
        self.page_number == 0
    }

    /// Returns `true` if there is no page after this one.
    pub fn is_last(&self) -> bool {
        self.page_number.saturating_add(1) >= self.total_pages
    }

    /// Iterates over the elements of this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.content.iter()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.content.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.content.iter()
    }
}

/// Errors raised while turning a JSON envelope into a [`Page`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display)]
pub enum PageEnvelopeError {
    /// A pagination field is missing from the envelope.
    #[display("missing pagination field `{field}`")]
    MissingField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// The page holds more elements than its size.
    #[display("page holds {content_len} elements but its size is {page_size}")]
    ContentExceedsPageSize {
        /// Number of elements received.
        content_len: usize,
        /// Declared page size.
        page_size: u64,
    },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageEnvelope<T> {
    content: Vec<T>,
    #[serde(default, alias = "pageNumber")]
    number: Option<u64>,
    #[serde(default, alias = "pageSize")]
    size: Option<u64>,
    #[serde(default)]
    total_elements: Option<u64>,
    #[serde(default)]
    total_pages: Option<u64>,
    #[serde(default)]
    page: Option<PageMetadata>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageMetadata {
    number: u64,
    size: u64,
    total_elements: u64,
    #[serde(default)]
    total_pages: Option<u64>,
}

impl<T> TryFrom<PageEnvelope<T>> for Page<T> {
    type Error = PageEnvelopeError;

    fn try_from(envelope: PageEnvelope<T>) -> Result<Self, Self::Error> {
        let PageEnvelope {
            content,
            number,
            size,
            total_elements,
            total_pages,
            page,
        } = envelope;

        let metadata = match page {
            Some(metadata) => metadata,
            None => PageMetadata {
                number: number.ok_or(PageEnvelopeError::MissingField { field: "number" })?,
                size: size.ok_or(PageEnvelopeError::MissingField { field: "size" })?,
                total_elements: total_elements.ok_or(PageEnvelopeError::MissingField {
                    field: "totalElements",
                })?,
                total_pages,
            },
        };

        let content_len = content.len();
        if u64::try_from(content_len).unwrap_or(u64::MAX) > metadata.size {
            return Err(PageEnvelopeError::ContentExceedsPageSize {
                content_len,
                page_size: metadata.size,
            });
        }

        let total_pages = metadata.total_pages.unwrap_or_else(|| {
            if metadata.size == 0 {
                0
            } else {
                metadata.total_elements.div_ceil(metadata.size)
            }
        });

        Ok(Self {
            content,
            page_number: metadata.number,
            page_size: metadata.size,
            total_elements: metadata.total_elements,
            total_pages,
        })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::model::{Beer, BeerStyle};

    #[test]
    fn should_decode_flat_envelope() {
        let json = r#"{
            "content": [{
                "id": "0b9a1d5e-1c3f-4f0e-8d0a-6f6d3b4f9b1e",
                "beerName": "Mango Bobs",
                "beerStyle": "IPA",
                "upc": "123245",
                "quantityOnHand": 500,
                "price": "10.99"
            }],
            "number": 1,
            "size": 25,
            "totalElements": 1
        }"#;

        let page: Page<Beer> = serde_json::from_str(json).expect("decode page");

        assert_eq!(page.len(), 1);
        assert_eq!(page.page_number(), 1);
        assert_eq!(page.page_size(), 25);
        assert_eq!(page.total_elements(), 1);
        assert_eq!(page.total_pages(), 1);

        let beer = page.content().first().expect("one beer");
        assert_eq!(beer.beer_name, "Mango Bobs");
        assert_eq!(beer.beer_style, BeerStyle::Ipa);
        assert_eq!(beer.price, Decimal::new(1099, 2));
    }

    #[test]
    fn should_decode_page_with_hidden_inventory() {
        let json = r#"{
            "content": [
                {"beerName": "Mango Bobs", "beerStyle": "IPA", "upc": "1", "quantityOnHand": null, "price": 12.99},
                {"beerName": "Galaxy Cat", "beerStyle": "PALE_ALE", "upc": "2", "quantityOnHand": null, "price": 9.5}
            ],
            "number": 0,
            "size": 25,
            "totalElements": 2
        }"#;

        let page: Page<Beer> = serde_json::from_str(json).expect("decode page");

        assert_eq!(page.len(), 2);
        assert!(page.iter().all(|beer| beer.quantity_on_hand.is_none()));
    }

    #[test]
    fn should_decode_spring_page_with_extra_fields() {
        let json = r#"{
            "content": ["a", "b"],
            "pageable": {"pageNumber": 0, "pageSize": 2, "offset": 0},
            "last": false,
            "totalPages": 4,
            "totalElements": 7,
            "first": true,
            "size": 2,
            "number": 0,
            "sort": {"empty": true, "sorted": false, "unsorted": true},
            "numberOfElements": 2,
            "empty": false
        }"#;

        let page: Page<String> = serde_json::from_str(json).expect("decode page");

        assert_eq!(page.content(), ["a", "b"]);
        assert_eq!(page.total_pages(), 4);
        assert!(page.is_first());
        assert!(!page.is_last());
    }

    #[test]
    fn should_decode_nested_envelope() {
        let json = r#"{
            "content": [1, 2, 3],
            "page": {"number": 2, "size": 3, "totalElements": 9, "totalPages": 3}
        }"#;

        let page: Page<u32> = serde_json::from_str(json).expect("decode page");

        assert_eq!(page.page_number(), 2);
        assert_eq!(page.page_size(), 3);
        assert_eq!(page.total_elements(), 9);
        assert!(page.is_last());
        assert_eq!(page.into_iter().sum::<u32>(), 6);
    }

    #[test]
    fn should_accept_page_number_aliases() {
        let json = r#"{"content": [], "pageNumber": 0, "pageSize": 10, "totalElements": 0}"#;

        let page: Page<String> = serde_json::from_str(json).expect("decode page");

        assert!(page.is_empty());
        assert_eq!(page.page_size(), 10);
        assert_eq!(page.total_pages(), 0);
        assert!(page.is_last());
    }

    #[test]
    fn should_reject_content_larger_than_page_size() {
        let json = r#"{"content": [1, 2, 3], "number": 0, "size": 2, "totalElements": 3}"#;

        let err = serde_json::from_str::<Page<u32>>(json).expect_err("should reject");

        assert!(
            err.to_string()
                .starts_with("page holds 3 elements but its size is 2"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn should_reject_missing_metadata() {
        let json = r#"{"content": [], "number": 0, "totalElements": 0}"#;

        let err = serde_json::from_str::<Page<u32>>(json).expect_err("should reject");

        assert!(
            err.to_string().starts_with("missing pagination field `size`"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn should_report_path_of_invalid_element() {
        let json = r#"{"content": [{"beerName": "x", "beerStyle": "CIDER", "upc": "1", "price": 1}], "number": 0, "size": 1, "totalElements": 1}"#;

        let deserializer = &mut serde_json::Deserializer::from_str(json);
        let err = serde_path_to_error::deserialize::<_, Page<Beer>>(deserializer)
            .expect_err("should reject");

        assert_eq!(err.path().to_string(), "content[0].beerStyle");
    }

    #[test]
    fn should_serialize_as_flat_envelope() {
        let json = r#"{"content": ["a"], "page": {"number": 0, "size": 5, "totalElements": 1}}"#;
        let page: Page<String> = serde_json::from_str(json).expect("decode page");

        let output = serde_json::to_string(&page).expect("encode page");

        insta::assert_snapshot!(output, @r#"{"content":["a"],"number":0,"size":5,"totalElements":1,"totalPages":1}"#);
    }
}

//! Catalog card model and search pages.
//!
//! Cards come from the third-party catalog through the backend's search
//! endpoint. The client never edits them: the same JSON object is sent back
//! as the body of an add-to-collection request, so unknown catalog fields are
//! kept in [`Card::extra`] and serialized back out unchanged.

use serde::{Deserialize, Serialize};

/// Catalog-assigned card identifier, e.g. `"base1-58"`.
pub type CardId = String;

/// A card as returned by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub name: String,
    #[serde(default)]
    pub images: CardImages,
    #[serde(default)]
    pub set: CardSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardmarket: Option<CardMarket>,
    /// Catalog fields the client does not interpret.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardImages {
    #[serde(default)]
    pub small: String,
    #[serde(default)]
    pub large: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSet {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub series: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardMarket {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prices: Option<CardPrices>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardPrices {
    #[serde(
        rename = "averageSellPrice",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub average_sell_price: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Card {
    /// Builds a card with only the fields the client displays.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            images: CardImages::default(),
            set: CardSet::default(),
            cardmarket: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Sets the set name and series.
    #[must_use]
    pub fn with_set(mut self, name: impl Into<String>, series: impl Into<String>) -> Self {
        self.set.name = name.into();
        self.set.series = series.into();
        self
    }

    /// Sets the cardmarket average sell price.
    #[must_use]
    pub fn with_price(mut self, price: f64) -> Self {
        self.cardmarket = Some(CardMarket {
            prices: Some(CardPrices {
                average_sell_price: Some(price),
                extra: serde_json::Map::new(),
            }),
            extra: serde_json::Map::new(),
        });
        self
    }

    /// Average sell price on cardmarket, when the catalog knows one.
    ///
    /// A price of zero is treated as unknown, matching how the search page
    /// hides falsy prices.
    #[must_use]
    pub fn market_price(&self) -> Option<f64> {
        self.cardmarket
            .as_ref()
            .and_then(|market| market.prices.as_ref())
            .and_then(|prices| prices.average_sell_price)
            .filter(|price| *price > 0.0)
    }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    #[serde(default)]
    pub data: Vec<Card>,
    pub page: u32,
    pub page_size: u32,
    pub count: u32,
    pub total_count: u32,
}

impl SearchPage {
    /// Number of pages the backend reports for this query.
    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        if self.page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(self.page_size)
    }
}

/// Turns what the user typed into the catalog query string.
///
/// A single bare word becomes a name prefix match (`name:pika*`). Queries
/// using field filters (`set.name:base`) or several words are sent as typed.
#[must_use]
pub fn build_catalog_query(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.contains(':') || trimmed.contains(char::is_whitespace) {
        trimmed.to_string()
    } else {
        format!("name:{trimmed}*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "id": "base1-58",
        "name": "Pikachu",
        "supertype": "Pokémon",
        "images": {"small": "https://img/s.png", "large": "https://img/l.png"},
        "set": {"name": "Base", "series": "Base", "id": "base1"},
        "cardmarket": {"url": "https://cm", "prices": {"averageSellPrice": 3.25, "lowPrice": 0.5}}
    }"#;

    #[test]
    fn unknown_catalog_fields_survive_reserialization() {
        let card: Card = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(card.market_price(), Some(3.25));
        assert_eq!(card.set.name, "Base");

        let value = serde_json::to_value(&card).unwrap();
        assert_eq!(value["supertype"], "Pokémon");
        assert_eq!(value["set"]["id"], "base1");
        assert_eq!(value["cardmarket"]["prices"]["lowPrice"], 0.5);
        assert_eq!(value["cardmarket"]["url"], "https://cm");
    }

    #[test]
    fn card_without_market_data_has_no_price() {
        let card: Card = serde_json::from_str(r#"{"id": "x1", "name": "Eevee"}"#).unwrap();
        assert_eq!(card.market_price(), None);
        assert!(card.images.small.is_empty());
    }

    #[test]
    fn zero_price_counts_as_unknown() {
        assert_eq!(Card::new("a", "b").with_price(0.0).market_price(), None);
    }

    #[test]
    fn search_page_uses_camel_case_fields() {
        let body = r#"{"data": [], "page": 1, "pageSize": 20, "count": 0, "totalCount": 45}"#;
        let page: SearchPage = serde_json::from_str(body).unwrap();
        assert_eq!(page.page_size, 20);
        assert_eq!(page.total_pages(), 3);
    }

    #[test]
    fn catalog_query_building() {
        assert_eq!(build_catalog_query(" pikachu "), "name:pikachu*");
        assert_eq!(build_catalog_query("set.name:base"), "set.name:base");
        assert_eq!(build_catalog_query("mr mime"), "mr mime");
    }
}

//! Collection models owned by the backend.
//!
//! The client keeps read-only copies of these. Timestamps come from Postgres
//! `TIMESTAMP` columns and carry no offset, so they are parsed as
//! [`chrono::NaiveDateTime`].

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Backend-assigned collection id.
pub type CollectionId = i64;

/// A collection as listed by `GET /api/collections`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRef {
    pub id: CollectionId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl CollectionRef {
    #[must_use]
    pub fn new(id: CollectionId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            created_at: None,
            updated_at: None,
        }
    }
}

/// A card row stored in a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionCard {
    pub id: i64,
    pub pokemon_card_id: String,
    pub name: String,
    #[serde(default)]
    pub set_name: Option<String>,
    #[serde(default)]
    pub series: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    pub collection_id: CollectionId,
    #[serde(default)]
    pub added_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub collection_name: Option<String>,
}

const fn default_quantity() -> u32 {
    1
}

/// Body of `GET /api/collection/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionDetail {
    pub collection_id: CollectionId,
    #[serde(default)]
    pub cards: Vec<CollectionCard>,
}

/// Body of `POST /api/collection/{id}/add-card`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddReceipt {
    pub message: String,
    pub card_id: i64,
}

/// Overview numbers shown at the top of the collection view.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CollectionStats {
    /// Sum of quantities.
    pub total_cards: u32,
    /// Distinct set names.
    pub sets: usize,
    /// Sum of `price * quantity`; cards without a price add nothing.
    pub estimated_value: f64,
}

impl CollectionStats {
    #[must_use]
    pub fn from_cards(cards: &[CollectionCard]) -> Self {
        let sets: HashSet<&str> = cards
            .iter()
            .filter_map(|card| card.set_name.as_deref())
            .filter(|name| !name.is_empty())
            .collect();

        Self {
            total_cards: cards.iter().map(|card| card.quantity).sum(),
            sets: sets.len(),
            estimated_value: cards
                .iter()
                .map(|card| card.price.unwrap_or(0.0) * f64::from(card.quantity))
                .sum(),
        }
    }
}

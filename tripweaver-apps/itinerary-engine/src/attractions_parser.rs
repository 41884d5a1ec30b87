//!  Tripweaver Itinerary Engine
//!
//!  Copyright (C) 2026  The Tripweaver Authors
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! # Attraction List Normalizer
//!
//! Side-effect free normalization of raw attraction-list payloads into
//! [`TourOffering`] records. Tours are largely informational in this model:
//! a missing price becomes an explicit "Not available" sentinel and a missing
//! image falls back to a placeholder, so the record is always renderable.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Fallback image for attractions without a usable photo.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/300x200?text=No+Image";

const PRICE_NOT_AVAILABLE: &str = "Not available";

/// Representative price of an attraction: an amount, or explicitly unknown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RepresentativePrice {
    Amount(f64),
    NotAvailable,
}

impl RepresentativePrice {
    pub fn amount(&self) -> Option<f64> {
        match self {
            Self::Amount(v) => Some(*v),
            Self::NotAvailable => None,
        }
    }
}

impl Serialize for RepresentativePrice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Amount(v) => serializer.serialize_f64(*v),
            Self::NotAvailable => serializer.serialize_str(PRICE_NOT_AVAILABLE),
        }
    }
}

impl<'de> Deserialize<'de> for RepresentativePrice {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Number(n) => Ok(n
                .as_f64()
                .map(Self::Amount)
                .unwrap_or(Self::NotAvailable)),
            _ => Ok(Self::NotAvailable),
        }
    }
}

/// A tourable attraction at the destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourOffering {
    pub name: String,
    pub description: String,
    pub price: RepresentativePrice,
    pub image_url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawAttraction {
    name: Option<String>,
    description: Option<String>,
    representative_price: RawRepresentativePrice,
    price: Option<f64>,
    primary_photo: RawPhoto,
    images: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawRepresentativePrice {
    #[serde(alias = "chargeAmount")]
    amount: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawPhoto {
    small: RawPhotoUrl,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawPhotoUrl {
    url: Option<String>,
}

/// Normalize a raw attraction-list payload. Entries without a name are
/// dropped; price and image degrade to their sentinels.
pub fn normalize(payload: &Value) -> Vec<TourOffering> {
    let mut out = Vec::new();

    for raw in data_slice(payload) {
        let attraction: RawAttraction = match serde_json::from_value(raw.clone()) {
            Ok(a) => a,
            Err(e) => {
                tracing::debug!("Skipping undecodable attraction entry: {}", e);
                continue;
            }
        };
        let Some(name) = attraction.name.filter(|n| !n.trim().is_empty()) else {
            continue;
        };

        let price = attraction
            .representative_price
            .amount
            .or(attraction.price)
            .map(RepresentativePrice::Amount)
            .unwrap_or(RepresentativePrice::NotAvailable);

        let image_url = attraction
            .primary_photo
            .small
            .url
            .filter(|u| !u.is_empty())
            .or_else(|| attraction.images.into_iter().find(|u| !u.is_empty()))
            .unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string());

        out.push(TourOffering {
            name,
            description: attraction.description.unwrap_or_default(),
            price,
            image_url,
        });
    }

    out
}

fn data_slice(payload: &Value) -> &[Value] {
    if let Some(items) = payload.as_array() {
        return items;
    }
    if let Some(items) = payload["data"].as_array() {
        return items;
    }
    &[]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_full_record() {
        let payload = json!({ "data": [ {
            "name": "Louvre Museum",
            "description": "World's largest art museum.",
            "representativePrice": { "chargeAmount": 22.0 },
            "primaryPhoto": { "small": { "url": "https://example.com/louvre.jpg" } }
        } ] });
        let tours = normalize(&payload);
        assert_eq!(tours.len(), 1);
        assert_eq!(tours[0].name, "Louvre Museum");
        assert_eq!(tours[0].price, RepresentativePrice::Amount(22.0));
        assert_eq!(tours[0].image_url, "https://example.com/louvre.jpg");
    }

    #[test]
    fn missing_price_and_image_use_sentinels() {
        let payload = json!([ { "name": "Hidden Garden" } ]);
        let tours = normalize(&payload);
        assert_eq!(tours[0].price, RepresentativePrice::NotAvailable);
        assert_eq!(tours[0].image_url, PLACEHOLDER_IMAGE_URL);
        assert_eq!(tours[0].description, "");
    }

    #[test]
    fn falls_back_to_image_list() {
        let payload = json!([ {
            "name": "Eiffel Tower",
            "price": 28.5,
            "images": [ "", "https://example.com/tower.jpg" ]
        } ]);
        let tours = normalize(&payload);
        assert_eq!(tours[0].price, RepresentativePrice::Amount(28.5));
        assert_eq!(tours[0].image_url, "https://example.com/tower.jpg");
    }

    #[test]
    fn sentinel_serializes_as_text() {
        let tour = TourOffering {
            name: "X".into(),
            description: String::new(),
            price: RepresentativePrice::NotAvailable,
            image_url: PLACEHOLDER_IMAGE_URL.into(),
        };
        let v = serde_json::to_value(&tour).unwrap();
        assert_eq!(v["price"], json!("Not available"));
    }

    #[test]
    fn nameless_entries_are_dropped() {
        let payload = json!([ { "description": "no name" } ]);
        assert!(normalize(&payload).is_empty());
    }
}

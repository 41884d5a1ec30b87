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

//! # Restaurant List Normalizer
//!
//! Side-effect free normalization of raw restaurant-list payloads into
//! [`RestaurantOffering`] records. The dietary flag is tri-state: true,
//! false, or unknown when the provider says nothing. Downstream filtering
//! must never treat unknown as exclusionary.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A restaurant candidate near the destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantOffering {
    pub name: String,
    pub average_rating: f64,
    /// None = the provider did not say.
    pub is_vegetarian: Option<bool>,
    /// Estimated meal price, when the provider exposes one.
    pub price: Option<f64>,
    pub cuisine: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawRestaurant {
    name: Option<String>,
    average_rating: Option<Number>,
    rating: Option<Number>,
    is_vegetarian: Option<bool>,
    price: Option<RawPrice>,
    cuisine: Vec<RawCuisine>,
}

/// Ratings arrive as numbers or numeric strings depending on version.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Number {
    Float(f64),
    Text(String),
}

impl Number {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Number::Float(f) => Some(*f),
            Number::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPrice {
    Amount { amount: Option<f64> },
    Bare(f64),
    /// Price-level strings like "$$ - $$$" carry no usable amount.
    Label(String),
}

impl RawPrice {
    fn amount(&self) -> Option<f64> {
        match self {
            RawPrice::Amount { amount } => *amount,
            RawPrice::Bare(v) => Some(*v),
            RawPrice::Label(_) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCuisine {
    Tagged { name: String },
    Bare(String),
}

impl RawCuisine {
    fn into_name(self) -> String {
        match self {
            RawCuisine::Tagged { name } => name,
            RawCuisine::Bare(name) => name,
        }
    }
}

/// Normalize a raw restaurant-list payload. Entries without a name are
/// dropped; everything else degrades field by field.
pub fn normalize(payload: &Value) -> Vec<RestaurantOffering> {
    let mut out = Vec::new();

    for raw in data_slice(payload) {
        let restaurant: RawRestaurant = match serde_json::from_value(raw.clone()) {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!("Skipping undecodable restaurant entry: {}", e);
                continue;
            }
        };
        let Some(name) = restaurant.name.filter(|n| !n.trim().is_empty()) else {
            continue;
        };

        out.push(RestaurantOffering {
            name,
            average_rating: restaurant
                .average_rating
                .as_ref()
                .or(restaurant.rating.as_ref())
                .and_then(Number::as_f64)
                .unwrap_or(0.0),
            is_vegetarian: restaurant.is_vegetarian,
            price: restaurant.price.as_ref().and_then(RawPrice::amount),
            cuisine: restaurant
                .cuisine
                .into_iter()
                .map(RawCuisine::into_name)
                .filter(|c| !c.is_empty())
                .collect(),
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
            "name": "Le Petit Jardin",
            "averageRating": 4.6,
            "isVegetarian": true,
            "price": { "amount": 35.0 },
            "cuisine": [ { "name": "French" }, { "name": "Vegetarian Friendly" } ]
        } ] });
        let restaurants = normalize(&payload);
        assert_eq!(restaurants.len(), 1);
        let r = &restaurants[0];
        assert_eq!(r.name, "Le Petit Jardin");
        assert_eq!(r.average_rating, 4.6);
        assert_eq!(r.is_vegetarian, Some(true));
        assert_eq!(r.price, Some(35.0));
        assert_eq!(r.cuisine, vec!["French", "Vegetarian Friendly"]);
    }

    #[test]
    fn rating_accepts_numeric_strings() {
        let payload = json!([ { "name": "Chez Anna", "rating": "4.5" } ]);
        let restaurants = normalize(&payload);
        assert_eq!(restaurants[0].average_rating, 4.5);
    }

    #[test]
    fn dietary_flag_defaults_to_unknown() {
        let payload = json!([ { "name": "Mystery Bistro" } ]);
        let restaurants = normalize(&payload);
        assert_eq!(restaurants[0].is_vegetarian, None);
        assert_eq!(restaurants[0].price, None);
        assert_eq!(restaurants[0].average_rating, 0.0);
    }

    #[test]
    fn price_level_labels_carry_no_amount() {
        let payload = json!([ { "name": "Steakhouse", "price": "$$ - $$$" } ]);
        assert_eq!(normalize(&payload)[0].price, None);
    }

    #[test]
    fn nameless_entries_are_dropped() {
        let payload = json!([ { "averageRating": 4.0 }, { "name": "  " }, { "name": "Kept" } ]);
        let restaurants = normalize(&payload);
        assert_eq!(restaurants.len(), 1);
        assert_eq!(restaurants[0].name, "Kept");
    }
}

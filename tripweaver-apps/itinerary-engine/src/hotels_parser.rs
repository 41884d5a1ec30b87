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

//! # Hotel List Normalizer
//!
//! Side-effect free normalization of raw hotel-list payloads into
//! [`HotelOffering`] records. Newer payloads nest everything under a
//! `property` object; older ones keep price/name/score at the top level. A
//! missing price degrades the record to 0 rather than dropping it; the
//! budget allocator decides affordability, not the normalizer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A priced hotel stay candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelOffering {
    pub name: String,
    pub price: f64,
    pub currency: String,
    pub review_score: f64,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: i64,
    pub room: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawHotel {
    property: RawProperty,
    name: Option<String>,
    price: Option<f64>,
    total_price: Option<f64>,
    currency: Option<String>,
    review_score: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawProperty {
    name: Option<String>,
    price_breakdown: RawPriceBreakdown,
    review_score: Option<f64>,
    checkin_date: Option<NaiveDate>,
    checkout_date: Option<NaiveDate>,
    #[serde(alias = "unitConfigurationLabel")]
    room_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawPriceBreakdown {
    gross_price: RawGrossPrice,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawGrossPrice {
    value: Option<f64>,
    currency: Option<String>,
}

/// Normalize a raw hotel-list payload.
///
/// `from_date`/`to_date` fill in check-in/check-out when the payload lacks
/// property-level dates; nights are the whole-day stay length either way.
pub fn normalize(
    payload: &Value,
    from_date: NaiveDate,
    to_date: NaiveDate,
    fallback_currency: &str,
) -> Vec<HotelOffering> {
    let mut out = Vec::new();

    for raw in hotels_slice(payload) {
        let hotel: RawHotel = match serde_json::from_value(raw.clone()) {
            Ok(hotel) => hotel,
            Err(e) => {
                tracing::debug!("Skipping undecodable hotel entry: {}", e);
                continue;
            }
        };

        let price = hotel
            .property
            .price_breakdown
            .gross_price
            .value
            .or(hotel.price)
            .or(hotel.total_price)
            .unwrap_or(0.0);

        let name = hotel
            .property
            .name
            .or(hotel.name)
            .unwrap_or_else(|| "Unnamed Hotel".to_string());

        let check_in = hotel.property.checkin_date.unwrap_or(from_date);
        let check_out = hotel.property.checkout_date.unwrap_or(to_date);

        out.push(HotelOffering {
            name,
            price,
            currency: hotel
                .property
                .price_breakdown
                .gross_price
                .currency
                .or(hotel.currency)
                .unwrap_or_else(|| fallback_currency.to_string()),
            review_score: hotel
                .property
                .review_score
                .or(hotel.review_score)
                .unwrap_or(0.0),
            check_in,
            check_out,
            nights: to_date.signed_duration_since(from_date).num_days(),
            room: hotel.property.room_name,
        });
    }

    out
}

/// The hotel list moved between payload versions: `data.hotels`, `hotels`,
/// or a bare array.
fn hotels_slice(payload: &Value) -> &[Value] {
    if let Some(items) = payload.as_array() {
        return items;
    }
    for candidate in [&payload["data"]["hotels"], &payload["hotels"]] {
        if let Some(items) = candidate.as_array() {
            return items;
        }
    }
    &[]
}

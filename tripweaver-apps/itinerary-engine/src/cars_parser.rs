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

//! # Car Rental Normalizer
//!
//! Side-effect free normalization of raw car-rental payloads into
//! [`CarOffering`] records, with price conversion to the itinerary currency.
//! The car supplier feed quotes INR regardless of the requested currency, so
//! conversion uses a pinned INR→CAD rate.
//! TODO: replace the pinned rate with a live FX source once one is approved.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Pinned INR→CAD exchange rate used when the feed ignores the requested
/// currency. An amount over 1000 is also treated as INR, since the feed
/// sometimes omits the currency code entirely.
pub const INR_TO_CAD: f64 = 0.01673;

/// A single rentable car at a fixed total price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarOffering {
    pub price: f64,
    pub currency: String,
    pub vehicle: String,
    pub supplier: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCar {
    pricing_info: RawPricingInfo,
    vehicle_info: RawVehicleInfo,
    supplier_info: RawSupplierInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPricingInfo {
    base_price: Option<f64>,
    total_price: Option<f64>,
    currency: Option<String>,
    base_price_currency: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawVehicleInfo {
    name: Option<String>,
    v_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSupplierInfo {
    name: Option<String>,
}

/// Normalize a raw car-rental payload into the target currency.
pub fn normalize(payload: &Value, target_currency: &str) -> Vec<CarOffering> {
    let mut out = Vec::new();

    for raw in search_results_slice(payload) {
        let car: RawCar = match serde_json::from_value(raw.clone()) {
            Ok(car) => car,
            Err(e) => {
                tracing::debug!("Skipping undecodable car entry: {}", e);
                continue;
            }
        };

        let mut price = car
            .pricing_info
            .base_price
            .or(car.pricing_info.total_price)
            .unwrap_or(0.0);
        let mut currency = car
            .pricing_info
            .currency
            .or(car.pricing_info.base_price_currency)
            .unwrap_or_else(|| "INR".to_string());

        if currency == "INR" || price > 1000.0 {
            price = round2(price * INR_TO_CAD);
            currency = target_currency.to_string();
        }

        out.push(CarOffering {
            price,
            currency,
            vehicle: car
                .vehicle_info
                .name
                .or(car.vehicle_info.v_name)
                .unwrap_or_else(|| "Unknown Vehicle".to_string()),
            supplier: car
                .supplier_info
                .name
                .unwrap_or_else(|| "Unknown Supplier".to_string()),
        });
    }

    out
}

/// Result rows live under `content.search_results` or `search_results`,
/// optionally below a `data` wrapper, depending on payload version.
fn search_results_slice(payload: &Value) -> &[Value] {
    if let Some(items) = payload.as_array() {
        return items;
    }
    for candidate in [
        &payload["data"]["content"]["search_results"],
        &payload["data"]["search_results"],
        &payload["content"]["search_results"],
        &payload["search_results"],
    ] {
        if let Some(items) = candidate.as_array() {
            return items;
        }
    }
    &[]
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

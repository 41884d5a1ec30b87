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

//! # Flight Offers Normalizer
//!
//! Side-effect free normalization of raw flight-search payloads into
//! [`FlightOffering`] records. Provider versions disagree on where leg times
//! live (segment level vs leg level, `dateTime` vs `at`), so every known key
//! family is tried in a fixed order before degrading to `"Unknown"`.
//!
//! Round trips are assumed to come back as exactly two segments, outbound
//! then return; offers with any other segment count are rejected as
//! malformed. One-way and multi-city offers are therefore dropped. Pinned
//! behavior, do not widen without product input.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One direction of a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightLeg {
    pub airline: String,
    pub departure_time: String,
    pub arrival_time: String,
}

/// A priced round-trip flight offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightOffering {
    pub price: f64,
    pub currency: String,
    pub outbound: FlightLeg,
    #[serde(rename = "return")]
    pub return_leg: FlightLeg,
}

const UNKNOWN: &str = "Unknown";

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawFlightOffer {
    price_breakdown: RawPriceBreakdown,
    segments: Vec<RawSegment>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawPriceBreakdown {
    total: RawMoney,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawMoney {
    units: Option<f64>,
    nanos: Option<f64>,
    currency_code: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawSegment {
    departure: RawTimeRef,
    arrival: RawTimeRef,
    legs: Vec<RawLeg>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawTimeRef {
    date_time: Option<String>,
    at: Option<String>,
}

impl RawTimeRef {
    fn get(&self) -> Option<&str> {
        self.date_time.as_deref().or(self.at.as_deref())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawLeg {
    carriers_data: Vec<RawCarrier>,
    departure: RawTimeRef,
    arrival: RawTimeRef,
    departure_time: Option<String>,
    arrival_time: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawCarrier {
    name: Option<String>,
}

/// Normalize a raw flight-search payload.
///
/// Offers without a usable total price, or without exactly two segments each
/// carrying at least one leg, are skipped. Never panics on malformed input.
pub fn normalize(payload: &Value, fallback_currency: &str) -> Vec<FlightOffering> {
    let offers = flight_offers_slice(payload);
    let mut out = Vec::new();

    for raw in offers {
        let offer: RawFlightOffer = match serde_json::from_value(raw.clone()) {
            Ok(offer) => offer,
            Err(e) => {
                tracing::debug!("Skipping undecodable flight offer: {}", e);
                continue;
            }
        };
        if let Some(offering) = normalize_offer(offer, fallback_currency) {
            out.push(offering);
        }
    }

    out
}

/// The offer list moved between payload versions: `data.flightOffers`,
/// `flightOffers`, or a bare array.
fn flight_offers_slice(payload: &Value) -> &[Value] {
    if let Some(items) = payload.as_array() {
        return items;
    }
    for candidate in [&payload["data"]["flightOffers"], &payload["flightOffers"]] {
        if let Some(items) = candidate.as_array() {
            return items;
        }
    }
    &[]
}

fn normalize_offer(offer: RawFlightOffer, fallback_currency: &str) -> Option<FlightOffering> {
    let total = &offer.price_breakdown.total;
    let price = total.units.unwrap_or(0.0) + total.nanos.unwrap_or(0.0) / 1e9;
    if price <= 0.0 {
        tracing::debug!("Skipping flight offer without a usable total price");
        return None;
    }

    // Round trip only: outbound + return. Anything else is malformed here.
    if offer.segments.len() != 2 {
        tracing::debug!(
            "Skipping flight offer with {} segments (expected 2)",
            offer.segments.len()
        );
        return None;
    }
    let outbound = normalize_segment(&offer.segments[0])?;
    let return_leg = normalize_segment(&offer.segments[1])?;

    Some(FlightOffering {
        price,
        currency: total
            .currency_code
            .clone()
            .unwrap_or_else(|| fallback_currency.to_string()),
        outbound,
        return_leg,
    })
}

fn normalize_segment(segment: &RawSegment) -> Option<FlightLeg> {
    if segment.legs.is_empty() {
        return None;
    }
    let first = segment.legs.first()?;
    let last = segment.legs.last()?;

    let airline = first
        .carriers_data
        .first()
        .and_then(|c| c.name.clone())
        .unwrap_or_else(|| UNKNOWN.to_string());

    let departure_time = segment
        .departure
        .get()
        .or_else(|| first.departure.get())
        .or(first.departure_time.as_deref())
        .unwrap_or(UNKNOWN)
        .to_string();

    let arrival_time = segment
        .arrival
        .get()
        .or_else(|| last.arrival.get())
        .or(last.arrival_time.as_deref())
        .unwrap_or(UNKNOWN)
        .to_string();

    Some(FlightLeg {
        airline,
        departure_time,
        arrival_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn offer(price_units: f64, segments: Value) -> Value {
        json!({
            "priceBreakdown": { "total": { "units": price_units, "nanos": 500_000_000.0, "currencyCode": "CAD" } },
            "segments": segments
        })
    }

    fn two_segments() -> Value {
        json!([
            {
                "departure": { "dateTime": "2026-10-01T08:15:00" },
                "arrival": { "dateTime": "2026-10-01T20:40:00" },
                "legs": [ { "carriersData": [ { "name": "Air Canada" } ] } ]
            },
            {
                "departure": { "at": "2026-10-08T10:00:00" },
                "arrival": { "at": "2026-10-08T13:05:00" },
                "legs": [ { "carriersData": [ { "name": "Air France" } ] } ]
            }
        ])
    }

    #[test]
    fn normalizes_round_trip_offer() {
        let payload = json!({ "data": { "flightOffers": [ offer(450.0, two_segments()) ] } });
        let offers = normalize(&payload, "CAD");
        assert_eq!(offers.len(), 1);
        let f = &offers[0];
        assert_eq!(f.price, 450.5);
        assert_eq!(f.currency, "CAD");
        assert_eq!(f.outbound.airline, "Air Canada");
        assert_eq!(f.outbound.departure_time, "2026-10-01T08:15:00");
        assert_eq!(f.return_leg.airline, "Air France");
        assert_eq!(f.return_leg.arrival_time, "2026-10-08T13:05:00");
    }

    #[test]
    fn rejects_missing_price() {
        let payload = json!({ "flightOffers": [ { "segments": two_segments() } ] });
        assert!(normalize(&payload, "CAD").is_empty());
    }

    #[test]
    fn rejects_wrong_segment_count() {
        let one_way = json!([ {
            "departure": { "dateTime": "2026-10-01T08:15:00" },
            "arrival": { "dateTime": "2026-10-01T20:40:00" },
            "legs": [ { "carriersData": [ { "name": "Air Canada" } ] } ]
        } ]);
        let payload = json!({ "flightOffers": [ offer(450.0, one_way) ] });
        assert!(normalize(&payload, "CAD").is_empty());
    }

    #[test]
    fn rejects_segment_without_legs() {
        let segments = json!([
            { "departure": { "dateTime": "x" }, "arrival": { "dateTime": "y" }, "legs": [] },
            { "departure": { "dateTime": "x" }, "arrival": { "dateTime": "y" }, "legs": [] }
        ]);
        let payload = json!([ offer(100.0, segments) ]);
        assert!(normalize(&payload, "CAD").is_empty());
    }

    #[test]
    fn falls_back_to_leg_level_times_and_unknown_airline() {
        let segments = json!([
            {
                "legs": [ {
                    "departure": { "at": "2026-10-01T08:15:00" },
                    "arrival": { "at": "2026-10-01T20:40:00" }
                } ]
            },
            {
                "legs": [ { "departureTime": "10:00", "arrivalTime": "13:05" } ]
            }
        ]);
        let payload = json!([ offer(300.0, segments) ]);
        let offers = normalize(&payload, "CAD");
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].outbound.airline, "Unknown");
        assert_eq!(offers[0].outbound.departure_time, "2026-10-01T08:15:00");
        assert_eq!(offers[0].return_leg.departure_time, "10:00");
        assert_eq!(offers[0].return_leg.arrival_time, "13:05");
    }

    #[test]
    fn malformed_entries_do_not_poison_siblings() {
        let payload = json!([
            "not an object",
            offer(450.0, two_segments()),
            { "priceBreakdown": "garbage" }
        ]);
        assert_eq!(normalize(&payload, "CAD").len(), 1);
    }

    #[test]
    fn empty_payload_yields_no_offers() {
        assert!(normalize(&json!({}), "CAD").is_empty());
        assert!(normalize(&json!(null), "CAD").is_empty());
    }
}

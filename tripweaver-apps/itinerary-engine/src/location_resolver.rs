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

//! # Location Resolver
//!
//! Maps free-text place names to the per-category provider code spaces:
//! airport codes, hotel destination codes, car rental coordinates and
//! restaurant/attraction location ids. Each category uses its own suggestion
//! endpoint, so nothing is cached across categories.
//!
//! `Ok(None)` means "not found" (a soft, category-scoped failure); `Err` is a
//! transport error from the adapter.

use serde::Deserialize;
use serde_json::Value;

use crate::providers::{Coordinates, ProviderError, TravelApi};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AirportSuggestion {
    #[serde(rename = "type")]
    kind: String,
    /// Airport display name; older payloads use `airport`, newer ones `name`.
    #[serde(alias = "airport")]
    name: String,
    code: String,
}

/// Resolve a place name to a `{IATA}.AIRPORT` code.
///
/// Candidates are filtered to entries tagged `AIRPORT`; among those, a name
/// containing "international" (case-insensitive) wins, else the first entry.
pub async fn resolve_airport_code(
    api: &dyn TravelApi,
    place: &str,
) -> Result<Option<String>, ProviderError> {
    if place.trim().is_empty() {
        return Ok(None);
    }
    let payload = api.airport_suggestions(place).await?;
    let suggestions: Vec<AirportSuggestion> = deserialize_candidates(&payload);

    let airports: Vec<&AirportSuggestion> = suggestions
        .iter()
        .filter(|s| s.kind == "AIRPORT" && !s.code.is_empty())
        .collect();

    let preferred = airports
        .iter()
        .find(|s| s.name.to_lowercase().contains("international"))
        .or_else(|| airports.first());

    Ok(preferred.map(|s| format!("{}.AIRPORT", s.code)))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct DestinationSuggestion {
    #[serde(alias = "dest_id")]
    dest_id: String,
    name: String,
    region: String,
    country: String,
}

/// A resolved hotel destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDestination {
    pub code: String,
    pub name: String,
    pub region: String,
    pub country: String,
}

/// Resolve a place name to the hotel provider's destination code.
///
/// The place name is title-cased before the lookup; some provider versions
/// match case-sensitively.
pub async fn resolve_destination_code(
    api: &dyn TravelApi,
    place: &str,
) -> Result<Option<ResolvedDestination>, ProviderError> {
    let normalized = title_case(place.trim());
    if normalized.is_empty() {
        return Ok(None);
    }
    let payload = api.hotel_destinations(&normalized).await?;
    let suggestions: Vec<DestinationSuggestion> = deserialize_candidates(&payload);

    Ok(suggestions
        .into_iter()
        .find(|s| !s.dest_id.is_empty())
        .map(|s| ResolvedDestination {
            code: s.dest_id,
            name: s.name,
            region: s.region,
            country: s.country,
        }))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct CarLocationSuggestion {
    coordinates: Option<Coordinates>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl CarLocationSuggestion {
    fn into_coordinates(self) -> Option<Coordinates> {
        self.coordinates.or(match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            _ => None,
        })
    }
}

/// Resolve a place name to car rental pickup/drop-off coordinates.
pub async fn resolve_car_coordinates(
    api: &dyn TravelApi,
    place: &str,
) -> Result<Option<Coordinates>, ProviderError> {
    if place.trim().is_empty() {
        return Ok(None);
    }
    let payload = api.car_locations(place).await?;
    let suggestions: Vec<CarLocationSuggestion> = deserialize_candidates(&payload);

    Ok(suggestions
        .into_iter()
        .find_map(CarLocationSuggestion::into_coordinates))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PlaceLocationSuggestion {
    #[serde(alias = "location_id")]
    location_id: String,
}

/// Resolve a place name to the restaurant provider's location id.
pub async fn resolve_restaurant_location(
    api: &dyn TravelApi,
    place: &str,
) -> Result<Option<String>, ProviderError> {
    let payload = api.restaurant_locations(place).await?;
    Ok(first_location_id(&payload))
}

/// Resolve a place name to the attraction provider's location id.
pub async fn resolve_tour_location(
    api: &dyn TravelApi,
    place: &str,
) -> Result<Option<String>, ProviderError> {
    let payload = api.attraction_locations(place).await?;
    Ok(first_location_id(&payload))
}

fn first_location_id(payload: &Value) -> Option<String> {
    let suggestions: Vec<PlaceLocationSuggestion> = deserialize_candidates(payload);
    suggestions
        .into_iter()
        .map(|s| s.location_id)
        .find(|id| !id.is_empty())
}

/// Candidate lists arrive either as a bare JSON array or wrapped in a `data`
/// field depending on provider version. Entries that do not deserialize are
/// dropped rather than failing the whole lookup.
fn deserialize_candidates<T: serde::de::DeserializeOwned>(payload: &Value) -> Vec<T> {
    let items = match payload {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => match map.get("data") {
            Some(Value::Array(items)) => items.as_slice(),
            _ => &[],
        },
        _ => &[],
    };
    items
        .iter()
        .filter_map(|item| match serde_json::from_value(item.clone()) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::debug!("Skipping malformed suggestion entry: {}", e);
                None
            }
        })
        .collect()
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

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

//! # Provider Interfaces
//!
//! The collaborator contract the engine needs from the outside world: one
//! black-box method per upstream lookup/search, each returning the provider's
//! native JSON payload. Normalization of those payloads happens downstream in
//! the per-category parsers, so a [`TravelApi`] implementation stays a thin
//! transport.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Failure of a provider call. Both variants are soft from the engine's point
/// of view: they degrade one category, never the whole request.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider transport error: {0}")]
    Transport(String),
    #[error("provider returned a malformed payload: {0}")]
    Malformed(String),
}

/// Cabin class for flight searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CabinClass {
    #[default]
    Economy,
    PremiumEconomy,
    Business,
    First,
}

impl CabinClass {
    pub fn as_query_value(&self) -> &'static str {
        match self {
            Self::Economy => "ECONOMY",
            Self::PremiumEconomy => "PREMIUM_ECONOMY",
            Self::Business => "BUSINESS",
            Self::First => "FIRST",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Normalized parameters for a round-trip flight search.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightQuery {
    pub from_id: String,
    pub to_id: String,
    pub depart_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub adults: u32,
    pub children_ages: Vec<u8>,
    pub cabin_class: CabinClass,
    pub currency: String,
}

/// Normalized parameters for a hotel search.
#[derive(Debug, Clone, PartialEq)]
pub struct HotelQuery {
    pub dest_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub adults: u32,
    pub children: u32,
    pub rooms: u32,
    pub currency: String,
}

/// Normalized parameters for a car rental search.
#[derive(Debug, Clone, PartialEq)]
pub struct CarRentalQuery {
    pub pickup: Coordinates,
    pub dropoff: Coordinates,
    pub pickup_date: NaiveDate,
    pub dropoff_date: NaiveDate,
    pub pickup_time: String,
    pub dropoff_time: String,
    pub currency: String,
}

/// The provider adapter layer, as consumed by the engine.
///
/// Every method returns the provider-shaped JSON untouched; the engine owns
/// interpretation. Implementations may retry internally, the engine never
/// does.
#[async_trait]
pub trait TravelApi: Send + Sync {
    /// Airport/city suggestions for a free-text place name.
    async fn airport_suggestions(&self, place: &str) -> Result<Value, ProviderError>;

    /// Raw flight-search payload for resolved airport codes.
    async fn search_flights(&self, query: &FlightQuery) -> Result<Value, ProviderError>;

    /// Hotel destination suggestions for a free-text place name.
    async fn hotel_destinations(&self, place: &str) -> Result<Value, ProviderError>;

    /// Raw hotel-list payload for a resolved destination code.
    async fn search_hotels(&self, query: &HotelQuery) -> Result<Value, ProviderError>;

    /// Car rental location suggestions (with coordinates) for a place name.
    async fn car_locations(&self, place: &str) -> Result<Value, ProviderError>;

    /// Raw car-list payload for resolved pickup/drop-off coordinates.
    async fn search_car_rentals(&self, query: &CarRentalQuery) -> Result<Value, ProviderError>;

    /// Restaurant location suggestions for a place name.
    async fn restaurant_locations(&self, place: &str) -> Result<Value, ProviderError>;

    /// Raw restaurant-list payload for a resolved location id.
    async fn search_restaurants(&self, location_id: &str) -> Result<Value, ProviderError>;

    /// Attraction location suggestions for a place name.
    async fn attraction_locations(&self, place: &str) -> Result<Value, ProviderError>;

    /// Raw attraction-list payload for a resolved location id.
    async fn search_attractions(&self, location_id: &str) -> Result<Value, ProviderError>;
}

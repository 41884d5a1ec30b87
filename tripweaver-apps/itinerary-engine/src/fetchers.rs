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

//! # Category Fetchers
//!
//! One fetcher per service category: resolve the location, query the
//! provider, normalize the payload. Every failure path, a search that finds
//! nothing included, collapses to [`FetchOutcome::Failed`] with a
//! human-readable message, so a broken category degrades the itinerary
//! instead of aborting it.

use tracing::{info, warn};

use crate::attractions_parser::{self, TourOffering};
use crate::cars_parser::{self, CarOffering};
use crate::flights_parser::{self, FlightOffering};
use crate::hotels_parser::{self, HotelOffering};
use crate::location_resolver::{
    resolve_airport_code, resolve_car_coordinates, resolve_destination_code,
    resolve_restaurant_location, resolve_tour_location,
};
use crate::orchestrator::EngineConfig;
use crate::providers::{CarRentalQuery, FlightQuery, HotelQuery, TravelApi};
use crate::restaurants_parser::{self, RestaurantOffering};
use crate::trip_request::TripRequest;

/// Result of one category fetch. `Failed` carries the message that lands in
/// the itinerary's message list.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Fetched(Vec<T>),
    Failed(String),
}

impl<T> FetchOutcome<T> {
    /// Split into the offerings slot and an optional message.
    pub fn into_parts(self) -> (Option<Vec<T>>, Option<String>) {
        match self {
            Self::Fetched(items) => (Some(items), None),
            Self::Failed(message) => (None, Some(message)),
        }
    }
}

/// A place already shaped like `YYZ.AIRPORT` skips suggestion lookup.
fn is_airport_id(place: &str) -> bool {
    place.contains('.')
}

pub async fn fetch_flights(
    api: &dyn TravelApi,
    request: &TripRequest,
    config: &EngineConfig,
) -> FetchOutcome<FlightOffering> {
    let from_id = if is_airport_id(&request.origin) {
        request.origin.clone()
    } else {
        match resolve_airport_code(api, &request.origin).await {
            Ok(Some(code)) => code,
            Ok(None) => {
                warn!(origin = %request.origin, "no airport match for origin");
                return FetchOutcome::Failed(format!(
                    "Failed to resolve airport code for origin: {}",
                    request.origin
                ));
            }
            Err(e) => return FetchOutcome::Failed(format!("Flight fetch error: {e}")),
        }
    };
    let to_id = if is_airport_id(&request.destination) {
        request.destination.clone()
    } else {
        match resolve_airport_code(api, &request.destination).await {
            Ok(Some(code)) => code,
            Ok(None) => {
                warn!(destination = %request.destination, "no airport match for destination");
                return FetchOutcome::Failed(format!(
                    "Failed to resolve airport code for destination: {}",
                    request.destination
                ));
            }
            Err(e) => return FetchOutcome::Failed(format!("Flight fetch error: {e}")),
        }
    };

    let query = FlightQuery {
        from_id,
        to_id,
        depart_date: request.from_date,
        return_date: Some(request.to_date),
        adults: request.adults,
        children_ages: request.children_ages.clone(),
        cabin_class: config.cabin_class,
        currency: config.currency.clone(),
    };
    match api.search_flights(&query).await {
        Ok(payload) => {
            let offers = flights_parser::normalize(&payload, &config.currency);
            info!(count = offers.len(), "flight offers normalized");
            if offers.is_empty() {
                return FetchOutcome::Failed("No flights found".to_string());
            }
            FetchOutcome::Fetched(offers)
        }
        Err(e) => FetchOutcome::Failed(format!("Flight fetch error: {e}")),
    }
}

pub async fn fetch_hotels(
    api: &dyn TravelApi,
    request: &TripRequest,
    config: &EngineConfig,
) -> FetchOutcome<HotelOffering> {
    let destination = match resolve_destination_code(api, &request.destination).await {
        Ok(Some(destination)) => destination,
        Ok(None) => {
            warn!(destination = %request.destination, "no hotel destination match");
            return FetchOutcome::Failed(format!(
                "No destination code found for {}",
                request.destination
            ));
        }
        Err(e) => return FetchOutcome::Failed(format!("Hotel fetch error: {e}")),
    };

    let query = HotelQuery {
        dest_id: destination.code,
        check_in: request.from_date,
        check_out: request.to_date,
        adults: request.adults,
        children: request.children_count(),
        rooms: config.rooms,
        currency: config.currency.clone(),
    };
    match api.search_hotels(&query).await {
        Ok(payload) => {
            let offers = hotels_parser::normalize(
                &payload,
                request.from_date,
                request.to_date,
                &config.currency,
            );
            info!(count = offers.len(), "hotel offers normalized");
            if offers.is_empty() {
                return FetchOutcome::Failed("No hotels found".to_string());
            }
            FetchOutcome::Fetched(offers)
        }
        Err(e) => FetchOutcome::Failed(format!("Hotel fetch error: {e}")),
    }
}

pub async fn fetch_car_rentals(
    api: &dyn TravelApi,
    request: &TripRequest,
    config: &EngineConfig,
) -> FetchOutcome<CarOffering> {
    // Pickup and drop-off both happen at the destination.
    let coordinates = match resolve_car_coordinates(api, &request.destination).await {
        Ok(Some(coordinates)) => coordinates,
        Ok(None) => {
            warn!(destination = %request.destination, "no car rental location match");
            return FetchOutcome::Failed(format!(
                "No car rental location found for {}",
                request.destination
            ));
        }
        Err(e) => return FetchOutcome::Failed(format!("Car rental fetch error: {e}")),
    };

    let query = CarRentalQuery {
        pickup: coordinates,
        dropoff: coordinates,
        pickup_date: request.from_date,
        dropoff_date: request.to_date,
        pickup_time: config.pickup_time.clone(),
        dropoff_time: config.dropoff_time.clone(),
        currency: config.currency.clone(),
    };
    match api.search_car_rentals(&query).await {
        Ok(payload) => {
            let offers = cars_parser::normalize(&payload, &config.currency);
            info!(count = offers.len(), "car rental offers normalized");
            if offers.is_empty() {
                return FetchOutcome::Failed("No car rentals found".to_string());
            }
            FetchOutcome::Fetched(offers)
        }
        Err(e) => FetchOutcome::Failed(format!("Car rental fetch error: {e}")),
    }
}

pub async fn fetch_restaurants(
    api: &dyn TravelApi,
    request: &TripRequest,
) -> FetchOutcome<RestaurantOffering> {
    let location_id = match resolve_restaurant_location(api, &request.destination).await {
        Ok(Some(id)) => id,
        Ok(None) => {
            warn!(destination = %request.destination, "no restaurant location match");
            return FetchOutcome::Failed(format!(
                "No restaurant location found for {}",
                request.destination
            ));
        }
        Err(e) => return FetchOutcome::Failed(format!("Restaurant fetch error: {e}")),
    };

    match api.search_restaurants(&location_id).await {
        Ok(payload) => {
            let offers = restaurants_parser::normalize(&payload);
            info!(count = offers.len(), "restaurant offers normalized");
            if offers.is_empty() {
                return FetchOutcome::Failed("No valid restaurants found".to_string());
            }
            FetchOutcome::Fetched(offers)
        }
        Err(e) => FetchOutcome::Failed(format!("Restaurant fetch error: {e}")),
    }
}

pub async fn fetch_tours(
    api: &dyn TravelApi,
    request: &TripRequest,
) -> FetchOutcome<TourOffering> {
    let location_id = match resolve_tour_location(api, &request.destination).await {
        Ok(Some(id)) => id,
        Ok(None) => {
            warn!(destination = %request.destination, "no attraction location match");
            return FetchOutcome::Failed(format!(
                "No attraction location found for {}",
                request.destination
            ));
        }
        Err(e) => return FetchOutcome::Failed(format!("Tour fetch error: {e}")),
    };

    match api.search_attractions(&location_id).await {
        Ok(payload) => {
            let offers = attractions_parser::normalize(&payload);
            info!(count = offers.len(), "attraction offers normalized");
            if offers.is_empty() {
                return FetchOutcome::Failed("No valid tour places found".to_string());
            }
            FetchOutcome::Fetched(offers)
        }
        Err(e) => FetchOutcome::Failed(format!("Tour fetch error: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ProviderError;
    use crate::trip_request::{Preference, ServiceCategory};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use serde_json::{Value, json};

    fn request() -> TripRequest {
        TripRequest {
            origin: "Toronto".to_string(),
            destination: "Vancouver".to_string(),
            from_date: NaiveDate::from_ymd_opt(2026, 9, 10).unwrap(),
            to_date: NaiveDate::from_ymd_opt(2026, 9, 14).unwrap(),
            services: vec![ServiceCategory::Flight],
            dietary_preference: None,
            adults: 2,
            children_ages: vec![],
            budget: Some(2000.0),
            preference: Preference::Cheap,
        }
    }

    /// Answers location lookups with one payload and searches with another.
    struct SplitApi {
        locations: Value,
        search: Result<Value, String>,
    }

    impl SplitApi {
        fn location_payload(&self) -> Result<Value, ProviderError> {
            Ok(self.locations.clone())
        }

        fn search_payload(&self) -> Result<Value, ProviderError> {
            self.search
                .clone()
                .map_err(ProviderError::Transport)
        }
    }

    #[async_trait]
    impl TravelApi for SplitApi {
        async fn airport_suggestions(&self, _: &str) -> Result<Value, ProviderError> {
            self.location_payload()
        }
        async fn search_flights(&self, _: &FlightQuery) -> Result<Value, ProviderError> {
            self.search_payload()
        }
        async fn hotel_destinations(&self, _: &str) -> Result<Value, ProviderError> {
            self.location_payload()
        }
        async fn search_hotels(&self, _: &HotelQuery) -> Result<Value, ProviderError> {
            self.search_payload()
        }
        async fn car_locations(&self, _: &str) -> Result<Value, ProviderError> {
            self.location_payload()
        }
        async fn search_car_rentals(&self, _: &CarRentalQuery) -> Result<Value, ProviderError> {
            self.search_payload()
        }
        async fn restaurant_locations(&self, _: &str) -> Result<Value, ProviderError> {
            self.location_payload()
        }
        async fn search_restaurants(&self, _: &str) -> Result<Value, ProviderError> {
            self.search_payload()
        }
        async fn attraction_locations(&self, _: &str) -> Result<Value, ProviderError> {
            self.location_payload()
        }
        async fn search_attractions(&self, _: &str) -> Result<Value, ProviderError> {
            self.search_payload()
        }
    }

    #[tokio::test]
    async fn flight_fetch_reports_unresolved_origin() {
        let api = SplitApi {
            locations: json!([]),
            search: Ok(json!({})),
        };
        let outcome = fetch_flights(&api, &request(), &EngineConfig::default()).await;
        assert_eq!(
            outcome,
            FetchOutcome::Failed("Failed to resolve airport code for origin: Toronto".to_string())
        );
    }

    #[tokio::test]
    async fn flight_fetch_passes_airport_ids_through() {
        // Pre-resolved ids must not hit the suggestion endpoint, which here
        // would return no candidates. An empty offer list is reported as a
        // soft failure rather than resolution failure.
        let mut req = request();
        req.origin = "YYZ.AIRPORT".to_string();
        req.destination = "YVR.AIRPORT".to_string();
        let api = SplitApi {
            locations: json!([]),
            search: Ok(json!({ "data": { "flightOffers": [] } })),
        };
        let outcome = fetch_flights(&api, &req, &EngineConfig::default()).await;
        assert_eq!(outcome, FetchOutcome::Failed("No flights found".to_string()));
    }

    #[tokio::test]
    async fn empty_search_results_become_category_messages() {
        let api = SplitApi {
            locations: json!([{ "location_id": "154943" }]),
            search: Ok(json!({ "data": [] })),
        };
        let outcome = fetch_restaurants(&api, &request()).await;
        assert_eq!(
            outcome,
            FetchOutcome::Failed("No valid restaurants found".to_string())
        );
        let outcome = fetch_tours(&api, &request()).await;
        assert_eq!(
            outcome,
            FetchOutcome::Failed("No valid tour places found".to_string())
        );
    }

    #[tokio::test]
    async fn hotel_fetch_reports_missing_destination_code() {
        let api = SplitApi {
            locations: json!([]),
            search: Ok(json!({})),
        };
        let outcome = fetch_hotels(&api, &request(), &EngineConfig::default()).await;
        assert_eq!(
            outcome,
            FetchOutcome::Failed("No destination code found for Vancouver".to_string())
        );
    }

    #[tokio::test]
    async fn search_errors_become_category_messages() {
        let api = SplitApi {
            locations: json!([{ "location_id": "154943" }]),
            search: Err("connection reset".to_string()),
        };
        let outcome = fetch_restaurants(&api, &request()).await;
        match outcome {
            FetchOutcome::Failed(message) => {
                assert!(message.starts_with("Restaurant fetch error:"), "{message}");
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn car_fetch_normalizes_search_results() {
        let api = SplitApi {
            locations: json!([{ "coordinates": { "latitude": 49.28, "longitude": -123.12 } }]),
            search: Ok(json!({
                "data": { "search_results": [{
                    "pricing_info": { "base_price": 240.0, "currency": "CAD" },
                    "vehicle_info": { "v_name": "Toyota Corolla" },
                    "supplier_info": { "name": "Avis" }
                }] }
            })),
        };
        let outcome = fetch_car_rentals(&api, &request(), &EngineConfig::default()).await;
        match outcome {
            FetchOutcome::Fetched(cars) => {
                assert_eq!(cars.len(), 1);
                assert_eq!(cars[0].price, 240.0);
                assert_eq!(cars[0].vehicle, "Toyota Corolla");
            }
            other => panic!("expected offers, got {other:?}"),
        }
    }
}

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

//! Full engine runs against a scripted provider: per-endpoint canned
//! payloads, soft failures in one category leaving siblings intact, and the
//! draft-versus-allocated split on the budget field.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tripweaver_itinerary::{
    CarRentalQuery, FlightQuery, HotelQuery, ItineraryEngine, ItineraryOutcome, ProviderError,
    RawTripRequest, TravelApi, ValidationError,
};

/// A scripted provider: every endpoint answers from its own slot. Unset
/// slots answer an empty array, erroring slots a transport failure.
#[derive(Default)]
struct ScriptedApi {
    airports: Option<Value>,
    flights: Option<Value>,
    hotel_destinations: Option<Value>,
    hotels: Option<Value>,
    car_locations: Option<Value>,
    cars: Option<Value>,
    advisor_locations: Option<Value>,
    restaurants: Option<Value>,
    attractions: Option<Value>,
    broken: Vec<&'static str>,
}

impl ScriptedApi {
    fn answer(&self, slot: &'static str, payload: &Option<Value>) -> Result<Value, ProviderError> {
        if self.broken.contains(&slot) {
            return Err(ProviderError::Transport("connection reset".to_string()));
        }
        Ok(payload.clone().unwrap_or_else(|| json!([])))
    }
}

#[async_trait]
impl TravelApi for ScriptedApi {
    async fn airport_suggestions(&self, _: &str) -> Result<Value, ProviderError> {
        self.answer("airports", &self.airports)
    }
    async fn search_flights(&self, _: &FlightQuery) -> Result<Value, ProviderError> {
        self.answer("flights", &self.flights)
    }
    async fn hotel_destinations(&self, _: &str) -> Result<Value, ProviderError> {
        self.answer("hotel_destinations", &self.hotel_destinations)
    }
    async fn search_hotels(&self, _: &HotelQuery) -> Result<Value, ProviderError> {
        self.answer("hotels", &self.hotels)
    }
    async fn car_locations(&self, _: &str) -> Result<Value, ProviderError> {
        self.answer("car_locations", &self.car_locations)
    }
    async fn search_car_rentals(&self, _: &CarRentalQuery) -> Result<Value, ProviderError> {
        self.answer("cars", &self.cars)
    }
    async fn restaurant_locations(&self, _: &str) -> Result<Value, ProviderError> {
        self.answer("advisor_locations", &self.advisor_locations)
    }
    async fn search_restaurants(&self, _: &str) -> Result<Value, ProviderError> {
        self.answer("restaurants", &self.restaurants)
    }
    async fn attraction_locations(&self, _: &str) -> Result<Value, ProviderError> {
        self.answer("advisor_locations", &self.advisor_locations)
    }
    async fn search_attractions(&self, _: &str) -> Result<Value, ProviderError> {
        self.answer("attractions", &self.attractions)
    }
}

fn airports_payload() -> Value {
    json!([
        { "type": "AIRPORT", "airport": "Pearson International Airport", "code": "YYZ" }
    ])
}

fn flights_payload(prices: &[f64]) -> Value {
    let offers: Vec<Value> = prices
        .iter()
        .map(|price| {
            json!({
                "priceBreakdown": { "total": { "units": price, "nanos": 0.0, "currencyCode": "CAD" } },
                "segments": [
                    {
                        "departure": { "dateTime": "2026-10-01T08:15:00" },
                        "arrival": { "dateTime": "2026-10-01T20:40:00" },
                        "legs": [ { "carriersData": [ { "name": "Air Canada" } ] } ]
                    },
                    {
                        "departure": { "dateTime": "2026-10-08T10:00:00" },
                        "arrival": { "dateTime": "2026-10-08T13:05:00" },
                        "legs": [ { "carriersData": [ { "name": "Air Canada" } ] } ]
                    }
                ]
            })
        })
        .collect();
    json!({ "data": { "flightOffers": offers } })
}

fn request(services: &[&str], budget: Option<f64>) -> RawTripRequest {
    RawTripRequest {
        origin: "Toronto".to_string(),
        destination: "Paris".to_string(),
        from_date: "2026-10-01".to_string(),
        to_date: "2026-10-08".to_string(),
        services: services.iter().map(|s| s.to_string()).collect(),
        adults: 1,
        budget,
        ..RawTripRequest::default()
    }
}

#[tokio::test]
async fn empty_services_fail_validation_before_fetching() {
    let engine = ItineraryEngine::with_defaults(Arc::new(ScriptedApi::default()));
    let err = engine.plan(&request(&[], Some(500.0))).await.unwrap_err();
    assert!(
        err.to_string()
            .contains(&ValidationError::MissingRequiredFields.to_string())
    );
}

#[tokio::test]
async fn hotel_resolution_failure_degrades_only_the_hotel() {
    let api = ScriptedApi {
        airports: Some(airports_payload()),
        flights: Some(flights_payload(&[450.0, 900.0])),
        hotel_destinations: Some(json!([])),
        ..ScriptedApi::default()
    };
    let engine = ItineraryEngine::with_defaults(Arc::new(api));
    let outcome = engine
        .plan(&request(&["Flight", "Hotel"], Some(500.0)))
        .await
        .unwrap();

    let itinerary = outcome.as_budgeted().expect("budgeted outcome");
    assert_eq!(itinerary.flight.as_ref().unwrap().price, 450.0);
    assert!(itinerary.hotel.is_none());
    assert!(
        itinerary
            .messages
            .contains(&"No destination code found for Paris".to_string()),
        "messages: {:?}",
        itinerary.messages
    );
    assert_eq!(
        itinerary.messages.last().unwrap(),
        "Remaining budget: $50.00"
    );
}

#[tokio::test]
async fn provider_transport_errors_stay_category_scoped() {
    let api = ScriptedApi {
        airports: Some(airports_payload()),
        flights: Some(flights_payload(&[450.0])),
        advisor_locations: Some(json!([{ "location_id": "154943" }])),
        broken: vec!["attractions"],
        ..ScriptedApi::default()
    };
    let engine = ItineraryEngine::with_defaults(Arc::new(api));
    let outcome = engine
        .plan(&request(&["Flight", "Tour"], Some(1000.0)))
        .await
        .unwrap();

    let itinerary = outcome.as_budgeted().unwrap();
    assert!(itinerary.flight.is_some());
    assert!(itinerary.tour_days.is_empty());
    assert!(
        itinerary
            .messages
            .iter()
            .any(|m| m.starts_with("Tour fetch error:")),
        "messages: {:?}",
        itinerary.messages
    );
}

#[tokio::test]
async fn budgetless_request_skips_allocation() {
    let api = ScriptedApi {
        airports: Some(airports_payload()),
        flights: Some(flights_payload(&[450.0, 900.0])),
        ..ScriptedApi::default()
    };
    let engine = ItineraryEngine::with_defaults(Arc::new(api));
    let outcome = engine.plan(&request(&["Flight"], None)).await.unwrap();

    // The draft carries every fetched offer, unfiltered and unranked.
    let draft = match outcome {
        ItineraryOutcome::Draft(draft) => draft,
        ItineraryOutcome::Budgeted(_) => panic!("expected a draft"),
    };
    assert_eq!(draft.flights.as_ref().unwrap().len(), 2);
    assert!(draft.hotels.is_none());
    assert!(draft.messages.is_empty());
}

#[tokio::test]
async fn draft_serializes_without_an_outcome_tag() {
    let api = ScriptedApi {
        airports: Some(airports_payload()),
        flights: Some(flights_payload(&[450.0])),
        ..ScriptedApi::default()
    };
    let engine = ItineraryEngine::with_defaults(Arc::new(api));
    let outcome = engine.plan(&request(&["Flight"], None)).await.unwrap();

    let body = serde_json::to_value(&outcome).unwrap();
    assert!(body.get("flights").is_some(), "body: {body}");
    assert!(body.get("Draft").is_none());
}

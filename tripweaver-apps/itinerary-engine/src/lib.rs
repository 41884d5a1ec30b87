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

// Library for the tripweaver itinerary engine.
// Aggregates flight, hotel, car rental, restaurant and attraction offerings
// from independent providers and, when a budget is given, selects a feasible
// combination under a fixed category order.

mod allocator;
mod attractions_parser;
mod cars_parser;
mod fetchers;
mod flights_parser;
mod hotels_parser;
mod itinerary;
mod location_resolver;
mod orchestrator;
mod providers;
mod rapidapi;
mod restaurants_parser;
mod trip_request;

pub use allocator::{allocate, cars_needed};
pub use attractions_parser::{
    PLACEHOLDER_IMAGE_URL, RepresentativePrice, TourOffering, normalize as normalize_attractions,
};
pub use cars_parser::{CarOffering, INR_TO_CAD, normalize as normalize_car_rentals};
pub use flights_parser::{FlightLeg, FlightOffering, normalize as normalize_flights};
pub use hotels_parser::{HotelOffering, normalize as normalize_hotels};
pub use itinerary::{FinalItinerary, ItineraryDraft, ItineraryOutcome, TourDay};
pub use location_resolver::{
    resolve_airport_code, resolve_car_coordinates, resolve_destination_code,
    resolve_restaurant_location, resolve_tour_location,
};
pub use orchestrator::{EngineConfig, EngineError, ItineraryEngine};
pub use providers::{
    CabinClass, CarRentalQuery, Coordinates, FlightQuery, HotelQuery, ProviderError, TravelApi,
};
pub use rapidapi::{RapidApiClient, RapidApiConfig};
pub use restaurants_parser::{RestaurantOffering, normalize as normalize_restaurants};
pub use trip_request::{
    DietaryPreference, Preference, RawTripRequest, ServiceCategory, TripRequest, ValidationError,
};

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

//! # Budget Allocator
//!
//! Walks the draft itinerary in a fixed category order, flights first and
//! tours last, threading the remaining budget through an explicit fold. Each
//! category filters its candidates against the budget *before* ranking them,
//! so a cheap well-rated option is never shadowed by an unaffordable
//! better-rated one. Tours are free and are bucketed after the spend is done.
//!
//! The fold is deliberately sequential and single-threaded: category order is
//! a product rule (transport and lodging outrank dining), and the remaining
//! budget after each step is part of the output, not just an intermediate.

use tracing::debug;

use crate::cars_parser::CarOffering;
use crate::flights_parser::FlightOffering;
use crate::hotels_parser::HotelOffering;
use crate::itinerary::{FinalItinerary, ItineraryDraft, TourDay};
use crate::restaurants_parser::RestaurantOffering;
use crate::trip_request::{DietaryPreference, Preference, TripRequest};

/// Maximum restaurants selected per itinerary.
const RESTAURANT_PICKS: usize = 3;
/// Attractions scheduled per tour day.
const ATTRACTIONS_PER_DAY: usize = 3;
/// Seats per rental car.
const CAR_CAPACITY: u32 = 4;

/// Allocate `budget` across the draft's categories and return the selection.
///
/// `draft.messages` (fetch-stage soft failures) are carried over verbatim;
/// allocation appends its own "No affordable ..." notes and always ends with
/// the remaining-budget line.
pub fn allocate(draft: &ItineraryDraft, request: &TripRequest, budget: f64) -> FinalItinerary {
    let mut out = FinalItinerary {
        messages: draft.messages.clone(),
        ..FinalItinerary::default()
    };
    let mut remaining = budget;

    if let Some(flights) = &draft.flights {
        match select_flight(flights, remaining, request.preference) {
            Some(flight) => {
                remaining -= flight.price;
                out.flight = Some(flight.clone());
            }
            None if !flights.is_empty() => {
                out.messages.push("No affordable flights found.".to_string());
            }
            None => {}
        }
    }

    if let Some(hotels) = &draft.hotels {
        match select_hotel(hotels, remaining, request.preference) {
            Some(hotel) => {
                remaining -= hotel.price;
                out.hotel = Some(hotel.clone());
            }
            None if !hotels.is_empty() => {
                out.messages.push("No affordable hotels found.".to_string());
            }
            None => {}
        }
    }

    if let Some(cars) = &draft.car_rentals {
        let needed = cars_needed(request.party_size());
        let picked = pick_cars(cars, needed, remaining, request.preference);
        if picked.is_empty() {
            if !cars.is_empty() {
                out.messages
                    .push("No affordable car rentals found.".to_string());
            }
        } else {
            remaining -= picked.iter().map(|c| c.price).sum::<f64>();
            out.car_rentals = Some(picked);
        }
    }

    if let Some(restaurants) = &draft.restaurants {
        let picked = pick_restaurants(restaurants, request.dietary_preference, remaining);
        if picked.is_empty() {
            if !restaurants.is_empty() {
                out.messages
                    .push("No affordable restaurants found.".to_string());
            }
        } else {
            remaining -= picked.iter().filter_map(|r| r.price).sum::<f64>();
            out.restaurants = picked;
        }
    }

    if let Some(tours) = &draft.tours {
        out.tour_days = bucket_tours(tours, request.trip_days().max(0) as u32);
    }

    debug!(budget, remaining, "allocation complete");
    out.messages
        .push(format!("Remaining budget: ${remaining:.2}"));
    out
}

/// Number of cars needed to seat the whole party.
pub fn cars_needed(party_size: u32) -> u32 {
    party_size.div_ceil(CAR_CAPACITY)
}

/// Among affordable flights, cheapest wins under `cheap`; `best` spends the
/// most (there is no quality signal on flights).
fn select_flight(
    flights: &[FlightOffering],
    remaining: f64,
    preference: Preference,
) -> Option<&FlightOffering> {
    let affordable = flights.iter().filter(|f| f.price <= remaining);
    match preference {
        Preference::Cheap => affordable.min_by(|a, b| f64::total_cmp(&a.price, &b.price)),
        // min_by over the reversed ordering keeps the first of tied candidates;
        // max_by would keep the last.
        Preference::Best => affordable.min_by(|a, b| f64::total_cmp(&b.price, &a.price)),
    }
}

/// Among affordable hotels, cheapest wins under `cheap`, highest review score
/// under `best`. Affordability is checked before ranking either way.
fn select_hotel(
    hotels: &[HotelOffering],
    remaining: f64,
    preference: Preference,
) -> Option<&HotelOffering> {
    let affordable = hotels.iter().filter(|h| h.price <= remaining);
    match preference {
        Preference::Cheap => affordable.min_by(|a, b| f64::total_cmp(&a.price, &b.price)),
        Preference::Best => {
            affordable.min_by(|a, b| f64::total_cmp(&b.review_score, &a.review_score))
        }
    }
}

/// Greedily take up to `needed` distinct affordable cars, stopping once the
/// running budget can no longer cover the next one. No backtracking or
/// subset search. Duplicate listings (same price, vehicle, supplier) are
/// collapsed to one so overlapping supplier feeds cannot double-book.
/// Unaffordable candidates are dropped before ranking, so an expensive car
/// at the top of a `best` sort never masks cheaper cars that fit.
fn pick_cars(
    cars: &[CarOffering],
    needed: u32,
    mut remaining: f64,
    preference: Preference,
) -> Vec<CarOffering> {
    let mut distinct: Vec<&CarOffering> = Vec::with_capacity(cars.len());
    for car in cars {
        let dup = distinct.iter().any(|seen| {
            seen.price.to_bits() == car.price.to_bits()
                && seen.vehicle == car.vehicle
                && seen.supplier == car.supplier
        });
        if !dup {
            distinct.push(car);
        }
    }
    distinct.retain(|car| car.price <= remaining);
    match preference {
        Preference::Cheap => distinct.sort_by(|a, b| f64::total_cmp(&a.price, &b.price)),
        Preference::Best => distinct.sort_by(|a, b| f64::total_cmp(&b.price, &a.price)),
    }

    let mut picked = Vec::new();
    for car in distinct {
        if picked.len() as u32 >= needed || car.price > remaining {
            break;
        }
        remaining -= car.price;
        picked.push(car.clone());
    }
    picked
}

/// Restaurants that match the dietary preference and whose known price fits
/// within a third of the remaining budget, best-rated first, at most three.
/// Unpriced restaurants always pass the affordability check.
fn pick_restaurants(
    restaurants: &[RestaurantOffering],
    dietary: Option<DietaryPreference>,
    remaining: f64,
) -> Vec<RestaurantOffering> {
    let per_restaurant = remaining / RESTAURANT_PICKS as f64;
    let mut eligible: Vec<&RestaurantOffering> = restaurants
        .iter()
        .filter(|r| matches_dietary(r, dietary))
        .filter(|r| r.price.is_none_or(|p| p <= per_restaurant))
        .collect();
    // Stable sort keeps the provider's ordering for tied ratings.
    eligible.sort_by(|a, b| f64::total_cmp(&b.average_rating, &a.average_rating));
    eligible
        .into_iter()
        .take(RESTAURANT_PICKS)
        .cloned()
        .collect()
}

/// Vegetarian keeps anything not known to be non-vegetarian, and vice versa.
/// Unknown dietary data never excludes a restaurant.
fn matches_dietary(restaurant: &RestaurantOffering, dietary: Option<DietaryPreference>) -> bool {
    match dietary {
        Some(DietaryPreference::Vegetarian) => restaurant.is_vegetarian != Some(false),
        Some(DietaryPreference::NonVegetarian) => restaurant.is_vegetarian != Some(true),
        None => true,
    }
}

/// Chunk attractions into days of [`ATTRACTIONS_PER_DAY`], capped at the trip
/// length. Leftover attractions beyond the last day are dropped.
fn bucket_tours(
    tours: &[crate::attractions_parser::TourOffering],
    trip_days: u32,
) -> Vec<TourDay> {
    tours
        .chunks(ATTRACTIONS_PER_DAY)
        .take(trip_days as usize)
        .enumerate()
        .map(|(i, chunk)| TourDay {
            day: i as u32 + 1,
            attractions: chunk.to_vec(),
        })
        .collect()
}

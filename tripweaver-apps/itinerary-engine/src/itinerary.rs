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

//! # Itinerary Models
//!
//! The draft itinerary (everything the fetchers found, unfiltered) and the
//! final itinerary (the budget allocator's selection). The allocator builds a
//! fresh [`FinalItinerary`] instead of mutating the draft, so a retried
//! allocation can never observe a partially-written selection.

use serde::{Deserialize, Serialize};

use crate::attractions_parser::TourOffering;
use crate::cars_parser::CarOffering;
use crate::flights_parser::FlightOffering;
use crate::hotels_parser::HotelOffering;
use crate::restaurants_parser::RestaurantOffering;

/// Everything the category fetchers produced, before budget filtering.
///
/// `None` means the category was not requested or its fetch soft-failed; the
/// distinction is visible in `messages`. Each fetcher writes only its own
/// slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItineraryDraft {
    pub flights: Option<Vec<FlightOffering>>,
    pub hotels: Option<Vec<HotelOffering>>,
    pub car_rentals: Option<Vec<CarOffering>>,
    pub restaurants: Option<Vec<RestaurantOffering>>,
    pub tours: Option<Vec<TourOffering>>,
    pub messages: Vec<String>,
}

/// Attractions grouped for one day of the trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourDay {
    pub day: u32,
    pub attractions: Vec<TourOffering>,
}

/// The budget allocator's selection: at most one flight, at most one hotel,
/// up to party-capacity cars, up to 3 restaurants, tours bucketed per day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinalItinerary {
    pub flight: Option<FlightOffering>,
    pub hotel: Option<HotelOffering>,
    pub car_rentals: Option<Vec<CarOffering>>,
    pub restaurants: Vec<RestaurantOffering>,
    pub tour_days: Vec<TourDay>,
    pub messages: Vec<String>,
}

/// What the engine hands back: the raw draft when no budget was supplied,
/// the allocated selection otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ItineraryOutcome {
    Budgeted(FinalItinerary),
    Draft(ItineraryDraft),
}

impl ItineraryOutcome {
    pub fn messages(&self) -> &[String] {
        match self {
            Self::Budgeted(f) => &f.messages,
            Self::Draft(d) => &d.messages,
        }
    }

    pub fn as_budgeted(&self) -> Option<&FinalItinerary> {
        match self {
            Self::Budgeted(f) => Some(f),
            Self::Draft(_) => None,
        }
    }

    pub fn as_draft(&self) -> Option<&ItineraryDraft> {
        match self {
            Self::Draft(d) => Some(d),
            Self::Budgeted(_) => None,
        }
    }
}

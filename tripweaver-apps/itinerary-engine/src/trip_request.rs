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

//! # Trip Request
//!
//! Side-effect free validation of raw trip requests. Rules are checked in a
//! fixed precedence order and the first violation wins, so callers always get
//! one specific, stable error message.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One travel-service category the caller can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceCategory {
    Flight,
    Hotel,
    CarRental,
    Restaurant,
    Tour,
}

impl ServiceCategory {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Flight" => Some(Self::Flight),
            "Hotel" => Some(Self::Hotel),
            // Historically requested as "Car Rental"; both spellings are live.
            "CarRental" | "Car Rental" => Some(Self::CarRental),
            "Restaurant" => Some(Self::Restaurant),
            "Tour" => Some(Self::Tour),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Flight => "Flight",
            Self::Hotel => "Hotel",
            Self::CarRental => "Car Rental",
            Self::Restaurant => "Restaurant",
            Self::Tour => "Tour",
        }
    }
}

/// Tie-break policy when several feasible offerings exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preference {
    #[default]
    Cheap,
    Best,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DietaryPreference {
    Vegetarian,
    NonVegetarian,
}

/// Validation failure, one variant per rule. Precedence is the declaration
/// order: required fields, dates, dietary preference, adults, children ages,
/// preference, budget.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error(
        "Missing or invalid required fields: origin, destination, fromDate, toDate, and services (array) are required"
    )]
    MissingRequiredFields,
    #[error("Unknown service category: {0}")]
    UnknownService(String),
    #[error("Invalid dates: {0}")]
    InvalidDates(String),
    #[error(
        "Missing or invalid dietaryPreference: dietaryPreference must be \"vegetarian\" or \"non-vegetarian\" for restaurants"
    )]
    InvalidDietaryPreference,
    #[error("Invalid adults: adults must be an integer >= 1")]
    InvalidAdults,
    #[error(
        "Invalid childrenAges: childrenAges must be a string of comma-separated integers (e.g., \"5\" or \"5,7\")"
    )]
    InvalidChildrenAges,
    #[error("Invalid childrenAges values: all ages in childrenAges must be between 0 and 17")]
    ChildrenAgeOutOfRange,
    #[error("Invalid preference: preference must be \"cheap\" or \"best\"")]
    InvalidPreference,
    #[error("Invalid budget: budget must be a positive number")]
    InvalidBudget,
}

/// A trip request as received from the caller, before validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTripRequest {
    pub origin: String,
    pub destination: String,
    pub from_date: String,
    pub to_date: String,
    pub services: Vec<String>,
    pub dietary_preference: Option<String>,
    pub adults: i64,
    pub children_ages: String,
    pub budget: Option<f64>,
    pub preference: Option<String>,
}

/// A validated, immutable trip request.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRequest {
    pub origin: String,
    pub destination: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub services: Vec<ServiceCategory>,
    pub dietary_preference: Option<DietaryPreference>,
    pub adults: u32,
    pub children_ages: Vec<u8>,
    pub budget: Option<f64>,
    pub preference: Preference,
}

impl Default for RawTripRequest {
    fn default() -> Self {
        Self {
            origin: String::new(),
            destination: String::new(),
            from_date: String::new(),
            to_date: String::new(),
            services: Vec::new(),
            dietary_preference: None,
            // A request that omits the party size means one adult.
            adults: 1,
            children_ages: String::new(),
            budget: None,
            preference: None,
        }
    }
}

static CHILDREN_AGES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d*(,\d+)*$").unwrap());

impl RawTripRequest {
    /// Validate the raw fields and produce an immutable [`TripRequest`].
    ///
    /// Pure and deterministic: no network, no clocks, no side effects.
    pub fn validate(&self) -> Result<TripRequest, ValidationError> {
        // Rule 1: required fields present.
        if self.origin.trim().is_empty()
            || self.destination.trim().is_empty()
            || self.from_date.trim().is_empty()
            || self.to_date.trim().is_empty()
            || self.services.is_empty()
        {
            return Err(ValidationError::MissingRequiredFields);
        }

        let mut services = Vec::new();
        for raw in &self.services {
            let category = ServiceCategory::parse(raw)
                .ok_or_else(|| ValidationError::UnknownService(raw.clone()))?;
            if !services.contains(&category) {
                services.push(category);
            }
        }

        let from_date = parse_date(&self.from_date)?;
        let to_date = parse_date(&self.to_date)?;
        if from_date >= to_date {
            return Err(ValidationError::InvalidDates(format!(
                "fromDate {} must be before toDate {}",
                from_date, to_date
            )));
        }

        // Rule 2: a dietary preference is mandatory when restaurants are requested.
        let dietary_preference = match &self.dietary_preference {
            Some(raw) => Some(parse_dietary(raw)?),
            None => None,
        };
        if services.contains(&ServiceCategory::Restaurant) && dietary_preference.is_none() {
            return Err(ValidationError::InvalidDietaryPreference);
        }

        // Rule 3: adults.
        if self.adults < 1 {
            return Err(ValidationError::InvalidAdults);
        }

        // Rules 4: children ages.
        let children_ages = parse_children_ages(&self.children_ages)?;

        // Rule 5: preference.
        let preference = match self.preference.as_deref() {
            None | Some("") => Preference::Cheap,
            Some("cheap") => Preference::Cheap,
            Some("best") => Preference::Best,
            Some(_) => return Err(ValidationError::InvalidPreference),
        };

        // Rule 6: budget, when supplied, must be positive.
        if let Some(budget) = self.budget {
            if !budget.is_finite() || budget <= 0.0 {
                return Err(ValidationError::InvalidBudget);
            }
        }

        Ok(TripRequest {
            origin: self.origin.trim().to_string(),
            destination: self.destination.trim().to_string(),
            from_date,
            to_date,
            services,
            dietary_preference,
            adults: self.adults as u32,
            children_ages,
            budget: self.budget,
            preference,
        })
    }
}

impl Default for TripRequest {
    fn default() -> Self {
        Self {
            origin: String::new(),
            destination: String::new(),
            from_date: NaiveDate::default(),
            to_date: NaiveDate::default(),
            services: Vec::new(),
            dietary_preference: None,
            adults: 1,
            children_ages: Vec::new(),
            budget: None,
            preference: Preference::Cheap,
        }
    }
}

impl TripRequest {
    pub fn wants(&self, category: ServiceCategory) -> bool {
        self.services.contains(&category)
    }

    pub fn children_count(&self) -> u32 {
        self.children_ages.len() as u32
    }

    /// Total party size: adults + children. Always >= 1.
    pub fn party_size(&self) -> u32 {
        self.adults + self.children_count()
    }

    /// Whole days between the trip dates. At least 1 by validation.
    pub fn trip_days(&self) -> i64 {
        self.to_date.signed_duration_since(self.from_date).num_days()
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDates(format!("expected YYYY-MM-DD, got {:?}", s)))
}

fn parse_dietary(s: &str) -> Result<DietaryPreference, ValidationError> {
    match s.to_lowercase().as_str() {
        "vegetarian" => Ok(DietaryPreference::Vegetarian),
        "non-vegetarian" => Ok(DietaryPreference::NonVegetarian),
        _ => Err(ValidationError::InvalidDietaryPreference),
    }
}

fn parse_children_ages(s: &str) -> Result<Vec<u8>, ValidationError> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(Vec::new());
    }
    if !CHILDREN_AGES_RE.is_match(s) {
        return Err(ValidationError::InvalidChildrenAges);
    }
    let ages: Vec<u8> = s
        .split(',')
        .map(|part| part.parse::<u8>())
        .collect::<Result<_, _>>()
        .map_err(|_| ValidationError::InvalidChildrenAges)?;
    if ages.iter().any(|&age| age > 17) {
        return Err(ValidationError::ChildrenAgeOutOfRange);
    }
    Ok(ages)
}

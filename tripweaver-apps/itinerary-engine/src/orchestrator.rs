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

//! # Orchestrator
//!
//! Drives a trip request end to end: validate, fan out one task per
//! requested category, join them all, then hand off to the allocator when a
//! budget was given. Fetch tasks are joined in the fixed category order so
//! the message list is deterministic regardless of completion order.

use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::info;

use crate::allocator::allocate;
use crate::fetchers::{
    FetchOutcome, fetch_car_rentals, fetch_flights, fetch_hotels, fetch_restaurants, fetch_tours,
};
use crate::itinerary::{ItineraryDraft, ItineraryOutcome};
use crate::providers::{CabinClass, TravelApi};
use crate::trip_request::{RawTripRequest, ServiceCategory, TripRequest, ValidationError};

/// Engine-level failure. Anything a provider does wrong is soft and never
/// surfaces here; only a bad request or an engine fault does.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("internal engine fault during {1}: {0}")]
    Internal(anyhow::Error, String),
}

impl EngineError {
    fn internal(e: impl Into<anyhow::Error>, what: &str) -> Self {
        Self::Internal(e.into(), what.to_string())
    }
}

/// Knobs the trip request does not carry.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Currency every price is quoted in.
    pub currency: String,
    pub cabin_class: CabinClass,
    /// Car pickup/drop-off times, `HH:MM`.
    pub pickup_time: String,
    pub dropoff_time: String,
    pub rooms: u32,
    /// Budget for one whole category fetch, resolution included.
    pub fetch_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            currency: "CAD".to_string(),
            cabin_class: CabinClass::Economy,
            pickup_time: "10:00".to_string(),
            dropoff_time: "10:00".to_string(),
            rooms: 1,
            fetch_timeout: Duration::from_secs(30),
        }
    }
}

/// The aggregation engine. Cheap to clone per request via the shared adapter.
pub struct ItineraryEngine {
    api: Arc<dyn TravelApi>,
    config: EngineConfig,
}

impl ItineraryEngine {
    pub fn new(api: Arc<dyn TravelApi>, config: EngineConfig) -> Self {
        Self { api, config }
    }

    pub fn with_defaults(api: Arc<dyn TravelApi>) -> Self {
        Self::new(api, EngineConfig::default())
    }

    /// Plan a trip from an unvalidated request.
    ///
    /// Returns the allocated itinerary when the request carries a budget, the
    /// raw draft otherwise. Provider failures show up as messages on the
    /// result, never as an `Err`.
    pub async fn plan(&self, raw: &RawTripRequest) -> Result<ItineraryOutcome, EngineError> {
        let request = raw.validate()?;
        info!(
            origin = %request.origin,
            destination = %request.destination,
            services = request.services.len(),
            budget = ?request.budget,
            "planning trip"
        );

        let draft = self.gather(&request).await?;

        match request.budget {
            Some(budget) => Ok(ItineraryOutcome::Budgeted(allocate(
                &draft, &request, budget,
            ))),
            None => Ok(ItineraryOutcome::Draft(draft)),
        }
    }

    /// Run every requested category fetch concurrently and collect a draft.
    async fn gather(&self, request: &TripRequest) -> Result<ItineraryDraft, EngineError> {
        let request = Arc::new(request.clone());

        let flights = self.spawn_if(&request, ServiceCategory::Flight, |api, req, cfg| {
            Box::pin(async move { fetch_flights(api.as_ref(), &req, &cfg).await })
        });
        let hotels = self.spawn_if(&request, ServiceCategory::Hotel, |api, req, cfg| {
            Box::pin(async move { fetch_hotels(api.as_ref(), &req, &cfg).await })
        });
        let cars = self.spawn_if(&request, ServiceCategory::CarRental, |api, req, cfg| {
            Box::pin(async move { fetch_car_rentals(api.as_ref(), &req, &cfg).await })
        });
        let restaurants = self.spawn_if(&request, ServiceCategory::Restaurant, |api, req, _| {
            Box::pin(async move { fetch_restaurants(api.as_ref(), &req).await })
        });
        let tours = self.spawn_if(&request, ServiceCategory::Tour, |api, req, _| {
            Box::pin(async move { fetch_tours(api.as_ref(), &req).await })
        });

        let mut draft = ItineraryDraft::default();
        if let Some(handle) = flights {
            let (items, message) = Self::join(handle, "flight fetch").await?.into_parts();
            draft.flights = items;
            draft.messages.extend(message);
        }
        if let Some(handle) = hotels {
            let (items, message) = Self::join(handle, "hotel fetch").await?.into_parts();
            draft.hotels = items;
            draft.messages.extend(message);
        }
        if let Some(handle) = cars {
            let (items, message) = Self::join(handle, "car rental fetch").await?.into_parts();
            draft.car_rentals = items;
            draft.messages.extend(message);
        }
        if let Some(handle) = restaurants {
            let (items, message) = Self::join(handle, "restaurant fetch").await?.into_parts();
            draft.restaurants = items;
            draft.messages.extend(message);
        }
        if let Some(handle) = tours {
            let (items, message) = Self::join(handle, "tour fetch").await?.into_parts();
            draft.tours = items;
            draft.messages.extend(message);
        }
        Ok(draft)
    }

    /// Spawn one category fetch under the configured timeout, or `None` when
    /// the category was not requested.
    fn spawn_if<T, F>(
        &self,
        request: &Arc<TripRequest>,
        category: ServiceCategory,
        fetch: F,
    ) -> Option<JoinHandle<FetchOutcome<T>>>
    where
        T: Send + 'static,
        F: FnOnce(
                Arc<dyn TravelApi>,
                Arc<TripRequest>,
                EngineConfig,
            ) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = FetchOutcome<T>> + Send>,
            > + Send
            + 'static,
    {
        if !request.wants(category) {
            return None;
        }
        let api = Arc::clone(&self.api);
        let request = Arc::clone(request);
        let config = self.config.clone();
        let timeout = config.fetch_timeout;
        Some(tokio::spawn(async move {
            match tokio::time::timeout(timeout, fetch(api, request, config)).await {
                Ok(outcome) => outcome,
                Err(_) => FetchOutcome::Failed(format!("{} search timed out", category.label())),
            }
        }))
    }

    /// A panicked or cancelled fetch task is an engine fault, not a soft
    /// provider failure.
    async fn join<T>(
        handle: JoinHandle<FetchOutcome<T>>,
        what: &str,
    ) -> Result<FetchOutcome<T>, EngineError> {
        handle
            .await
            .map_err(|e| EngineError::internal(anyhow!(e), what))
    }
}

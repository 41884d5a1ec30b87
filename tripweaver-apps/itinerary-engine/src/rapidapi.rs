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

//! # RapidAPI Provider Client
//!
//! Effectful (network) implementation of [`TravelApi`] against the RapidAPI
//! booking and travel-advisor upstreams. All calls funnel through one shared
//! [`QueryGate`] so the category fan-out cannot exceed the plan's request
//! allowance.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use async_trait::async_trait;
use serde_json::Value;
use tracing::info;
use tripweaver_query_gate::QueryGate;

use crate::providers::{
    CarRentalQuery, FlightQuery, HotelQuery, ProviderError, TravelApi,
};

const DEFAULT_BOOKING_HOST: &str = "booking-com15.p.rapidapi.com";
const DEFAULT_ADVISOR_HOST: &str = "travel-advisor.p.rapidapi.com";

/// Credentials and upstream hosts, usually from the environment.
#[derive(Debug, Clone)]
pub struct RapidApiConfig {
    pub api_key: String,
    /// Host serving flights, hotels and car rentals.
    pub booking_host: String,
    /// Host serving restaurants and attractions.
    pub advisor_host: String,
    /// Per-request HTTP timeout.
    pub http_timeout: Duration,
    pub max_concurrent: usize,
}

impl RapidApiConfig {
    /// Read `RAPIDAPI_KEY` (required) plus optional `RAPIDAPI_BOOKING_HOST`
    /// and `RAPIDAPI_ADVISOR_HOST` overrides.
    pub fn from_env() -> Result<Self> {
        let api_key =
            std::env::var("RAPIDAPI_KEY").context("RAPIDAPI_KEY must be set")?;
        ensure!(!api_key.trim().is_empty(), "RAPIDAPI_KEY must not be empty");
        Ok(Self {
            api_key,
            booking_host: std::env::var("RAPIDAPI_BOOKING_HOST")
                .unwrap_or_else(|_| DEFAULT_BOOKING_HOST.to_string()),
            advisor_host: std::env::var("RAPIDAPI_ADVISOR_HOST")
                .unwrap_or_else(|_| DEFAULT_ADVISOR_HOST.to_string()),
            http_timeout: Duration::from_secs(20),
            max_concurrent: 4,
        })
    }
}

#[derive(Clone)]
pub struct RapidApiClient {
    client: Arc<reqwest::Client>,
    gate: QueryGate,
    config: RapidApiConfig,
}

impl RapidApiClient {
    pub fn new(config: RapidApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .context("Failed to build HTTP client")?;
        let gate = QueryGate::with_concurrency_limit(config.max_concurrent);
        Ok(Self {
            client: Arc::new(client),
            gate,
            config,
        })
    }

    /// One gated GET returning the decoded JSON body. Non-2xx responses and
    /// transport errors are retried by the gate; a body that is not JSON is
    /// not, the payload is simply malformed.
    async fn get_json(
        &self,
        host: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Value, ProviderError> {
        let url = format!("https://{host}{path}");
        let client = Arc::clone(&self.client);
        let api_key = self.config.api_key.clone();
        let host = host.to_string();
        let query: Vec<(String, String)> =
            query.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();

        let response = self
            .gate
            .run(move || {
                let client = Arc::clone(&client);
                let url = url.clone();
                let api_key = api_key.clone();
                let host = host.clone();
                let query = query.clone();
                async move {
                    info!("Fetching {}", url);
                    let resp = client
                        .get(&url)
                        .header("x-rapidapi-key", &api_key)
                        .header("x-rapidapi-host", &host)
                        .query(&query)
                        .send()
                        .await?;
                    ensure!(
                        resp.status().is_success(),
                        "upstream returned {}",
                        resp.status()
                    );
                    Ok(resp)
                }
            })
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        response
            .json::<Value>()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))
    }

    fn join_ages(ages: &[u8]) -> String {
        ages.iter()
            .map(|a| a.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[async_trait]
impl TravelApi for RapidApiClient {
    async fn airport_suggestions(&self, place: &str) -> Result<Value, ProviderError> {
        self.get_json(
            &self.config.booking_host,
            "/api/v1/flights/searchDestination",
            &[("query", place.to_string())],
        )
        .await
    }

    async fn search_flights(&self, query: &FlightQuery) -> Result<Value, ProviderError> {
        let mut params = vec![
            ("fromId", query.from_id.clone()),
            ("toId", query.to_id.clone()),
            ("departDate", query.depart_date.format("%Y-%m-%d").to_string()),
            ("adults", query.adults.to_string()),
            ("cabinClass", query.cabin_class.as_query_value().to_string()),
            ("currency_code", query.currency.clone()),
        ];
        if let Some(return_date) = query.return_date {
            params.push(("returnDate", return_date.format("%Y-%m-%d").to_string()));
        }
        if !query.children_ages.is_empty() {
            params.push(("children", Self::join_ages(&query.children_ages)));
        }
        self.get_json(
            &self.config.booking_host,
            "/api/v1/flights/searchFlights",
            &params,
        )
        .await
    }

    async fn hotel_destinations(&self, place: &str) -> Result<Value, ProviderError> {
        self.get_json(
            &self.config.booking_host,
            "/api/v1/hotels/searchDestination",
            &[("query", place.to_string())],
        )
        .await
    }

    async fn search_hotels(&self, query: &HotelQuery) -> Result<Value, ProviderError> {
        self.get_json(
            &self.config.booking_host,
            "/api/v1/hotels/searchHotels",
            &[
                ("dest_id", query.dest_id.clone()),
                ("search_type", "CITY".to_string()),
                ("arrival_date", query.check_in.format("%Y-%m-%d").to_string()),
                ("departure_date", query.check_out.format("%Y-%m-%d").to_string()),
                ("adults", query.adults.to_string()),
                ("children_age", "0,17".to_string()),
                ("room_qty", query.rooms.to_string()),
                ("page_number", "1".to_string()),
                ("units", "metric".to_string()),
                ("temperature_unit", "c".to_string()),
                ("languagecode", "en-us".to_string()),
                ("currency_code", query.currency.clone()),
            ],
        )
        .await
    }

    async fn car_locations(&self, place: &str) -> Result<Value, ProviderError> {
        self.get_json(
            &self.config.booking_host,
            "/api/v1/cars/searchDestination",
            &[("query", place.to_string())],
        )
        .await
    }

    async fn search_car_rentals(&self, query: &CarRentalQuery) -> Result<Value, ProviderError> {
        self.get_json(
            &self.config.booking_host,
            "/api/v1/cars/searchCarRentals",
            &[
                ("pick_up_latitude", query.pickup.latitude.to_string()),
                ("pick_up_longitude", query.pickup.longitude.to_string()),
                ("drop_off_latitude", query.dropoff.latitude.to_string()),
                ("drop_off_longitude", query.dropoff.longitude.to_string()),
                ("pick_up_date", query.pickup_date.format("%Y-%m-%d").to_string()),
                ("drop_off_date", query.dropoff_date.format("%Y-%m-%d").to_string()),
                ("pick_up_time", query.pickup_time.clone()),
                ("drop_off_time", query.dropoff_time.clone()),
                ("currency_code", query.currency.clone()),
            ],
        )
        .await
    }

    async fn restaurant_locations(&self, place: &str) -> Result<Value, ProviderError> {
        self.get_json(
            &self.config.advisor_host,
            "/locations/search",
            &[("query", place.to_string()), ("limit", "5".to_string())],
        )
        .await
    }

    async fn search_restaurants(&self, location_id: &str) -> Result<Value, ProviderError> {
        self.get_json(
            &self.config.advisor_host,
            "/restaurants/list",
            &[("location_id", location_id.to_string())],
        )
        .await
    }

    async fn attraction_locations(&self, place: &str) -> Result<Value, ProviderError> {
        self.get_json(
            &self.config.advisor_host,
            "/locations/search",
            &[("query", place.to_string()), ("limit", "5".to_string())],
        )
        .await
    }

    async fn search_attractions(&self, location_id: &str) -> Result<Value, ProviderError> {
        self.get_json(
            &self.config.advisor_host,
            "/attractions/list",
            &[("location_id", location_id.to_string())],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ages_join_comma_separated() {
        assert_eq!(RapidApiClient::join_ages(&[5, 7]), "5,7");
        assert_eq!(RapidApiClient::join_ages(&[]), "");
    }
}

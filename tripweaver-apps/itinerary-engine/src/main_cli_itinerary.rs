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

//! CLI for itinerary planning.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use term_size;
use tripweaver_itinerary::{
    FinalItinerary, ItineraryDraft, ItineraryEngine, ItineraryOutcome, RapidApiClient,
    RapidApiConfig, RawTripRequest, TourDay,
};

/// CLI arguments
#[derive(Parser, Debug)]
#[command(name = "tripweaver-itinerary")]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Origin city or airport id (e.g., "Toronto" or "YYZ.AIRPORT")
    #[arg(short, long)]
    from: String,

    /// Destination city or airport id
    #[arg(short, long)]
    to: String,

    /// Trip start date (YYYY-MM-DD)
    #[arg(short = 'd', long)]
    from_date: String,

    /// Trip end date (YYYY-MM-DD)
    #[arg(short = 'D', long)]
    to_date: String,

    /// Services to include, comma-separated:
    /// Flight, Hotel, CarRental, Restaurant, Tour
    #[arg(short, long, default_value = "Flight,Hotel")]
    services: String,

    /// Total budget; omit to get the unfiltered draft
    #[arg(short, long)]
    budget: Option<f64>,

    /// Dietary preference: vegetarian, non-vegetarian
    #[arg(long)]
    dietary: Option<String>,

    /// Selection preference: cheap, best
    #[arg(short, long, default_value = "cheap")]
    preference: String,

    /// Number of adults
    #[arg(short, long, default_value = "1")]
    adults: i64,

    /// Children ages, comma-separated (e.g., "5,7")
    #[arg(long, default_value = "")]
    children_ages: String,

    /// Output raw JSON instead of tables
    #[arg(long, default_value = "false")]
    json: bool,

    /// Verbose output
    #[arg(short, long, default_value = "false")]
    verbose: bool,
}

/// Configure logging based on verbosity level
fn setup_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();
}

/// Get terminal width for responsive tables
fn get_terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(100)
}

fn dash_bar() -> String {
    "-".repeat(get_terminal_width().min(100))
}

fn render_tour_days(tour_days: &[TourDay]) {
    for day in tour_days {
        println!("  Day {}:", day.day);
        for attraction in &day.attractions {
            println!("    🎟  {}", attraction.name);
        }
    }
}

fn render_messages(messages: &[String]) {
    if messages.is_empty() {
        return;
    }
    println!("\n📋 Notes:");
    for message in messages {
        println!("  - {}", message);
    }
}

/// Render the allocated itinerary to stdout
fn render_final(itinerary: &FinalItinerary, from: &str, to: &str) {
    let title_bar = format!(
        "================================================================================================\n  🧳  {} → {}\n================================================================================================",
        from, to
    );
    println!("{}\n", title_bar);

    match &itinerary.flight {
        Some(flight) => println!(
            "🛫 Flight: {} {} → {}  ${:.2} {}",
            flight.outbound.airline,
            flight.outbound.departure_time,
            flight.outbound.arrival_time,
            flight.price,
            flight.currency
        ),
        None => println!("🛫 Flight: none selected"),
    }

    match &itinerary.hotel {
        Some(hotel) => println!(
            "🏨 Hotel: {} ({} nights)  ${:.2} {}",
            hotel.name, hotel.nights, hotel.price, hotel.currency
        ),
        None => println!("🏨 Hotel: none selected"),
    }

    if let Some(cars) = &itinerary.car_rentals {
        println!("{}", dash_bar());
        println!("🚗 Car rentals:");
        for car in cars {
            println!(
                "  {} from {}  ${:.2} {}",
                car.vehicle, car.supplier, car.price, car.currency
            );
        }
    }

    if !itinerary.restaurants.is_empty() {
        println!("{}", dash_bar());
        println!("🍽  Restaurants:");
        for restaurant in &itinerary.restaurants {
            println!(
                "  {} (rating {:.1})",
                restaurant.name, restaurant.average_rating
            );
        }
    }

    if !itinerary.tour_days.is_empty() {
        println!("{}", dash_bar());
        println!("🗺  Tours:");
        render_tour_days(&itinerary.tour_days);
    }

    render_messages(&itinerary.messages);
}

/// Render the unfiltered draft to stdout
fn render_draft(draft: &ItineraryDraft, from: &str, to: &str) {
    println!("🧳 Draft itinerary {} → {} (no budget given)\n", from, to);
    println!(
        "🛫 Flights found: {}",
        draft.flights.as_ref().map_or(0, Vec::len)
    );
    println!(
        "🏨 Hotels found: {}",
        draft.hotels.as_ref().map_or(0, Vec::len)
    );
    println!(
        "🚗 Car rentals found: {}",
        draft.car_rentals.as_ref().map_or(0, Vec::len)
    );
    println!(
        "🍽  Restaurants found: {}",
        draft.restaurants.as_ref().map_or(0, Vec::len)
    );
    println!(
        "🎟  Attractions found: {}",
        draft.tours.as_ref().map_or(0, Vec::len)
    );
    render_messages(&draft.messages);
}

fn raw_request_from(args: &CliArgs) -> RawTripRequest {
    RawTripRequest {
        origin: args.from.clone(),
        destination: args.to.clone(),
        from_date: args.from_date.clone(),
        to_date: args.to_date.clone(),
        services: args
            .services
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        budget: args.budget,
        dietary_preference: args.dietary.clone(),
        preference: Some(args.preference.clone()),
        adults: args.adults,
        children_ages: args.children_ages.clone(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    setup_logging(args.verbose);

    tracing::info!("Starting tripweaver-itinerary CLI");
    tracing::info!("Args: {:?}", args);

    let raw = raw_request_from(&args);

    let config = RapidApiConfig::from_env().context("Provider credentials missing")?;
    let client = RapidApiClient::new(config).context("Failed to build provider client")?;
    let engine = ItineraryEngine::with_defaults(Arc::new(client));

    let outcome = engine.plan(&raw).await.context("Planning failed")?;

    if args.json {
        let body = match &outcome {
            ItineraryOutcome::Budgeted(itinerary) => serde_json::to_string_pretty(itinerary)?,
            ItineraryOutcome::Draft(draft) => serde_json::to_string_pretty(draft)?,
        };
        println!("{}", body);
        return Ok(());
    }

    match &outcome {
        ItineraryOutcome::Budgeted(itinerary) => render_final(itinerary, &args.from, &args.to),
        ItineraryOutcome::Draft(draft) => render_draft(draft, &args.from, &args.to),
    }

    Ok(())
}

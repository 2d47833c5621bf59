use chrono::{Duration, NaiveDate, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;
use uuid::Uuid;

use skybook_core::repository::{BookingLedger, FlightInventory, UserDirectory};
use skybook_core::InventoryError;
use skybook_shared::{Booking, Masked, NewFlight, Passenger, Role, User};

use crate::app_config::SeedConfig;
use crate::memory::MemoryStore;

type SeedResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

const AIRPORTS: &[&str] = &[
    "CGK", "DPS", "SUB", "UPG", "KNO", "BPN", "JOG", "PLM", "BTH", "MDC",
];
const AIRLINES: &[&str] = &["GA", "JT", "QG", "ID", "SJ", "IW"];

#[derive(Debug)]
pub struct SeedSummary {
    pub users: usize,
    pub flights: usize,
    pub bookings: usize,
    pub admin_id: Uuid,
    pub sample_user_id: Uuid,
}

/// Fills an empty store with sample users, flights and bookings.
///
/// Bookings are written the same way the reservation engine writes them
/// (conditional decrement first, ledger record second), so the seat-count
/// invariant holds for every seeded flight.
pub async fn populate(store: &MemoryStore, cfg: &SeedConfig, currency: &str) -> SeedResult<SeedSummary> {
    let mut rng = rand::thread_rng();

    // Users: one admin, the rest regular.
    let admin = User::new("admin".to_string(), "admin@skybook.dev".to_string(), Role::Admin);
    let admin_id = store.insert_user(admin).await?;

    let mut user_ids = Vec::new();
    for i in 1..cfg.users.max(2) {
        let user = User::new(
            format!("traveler{:03}", i),
            format!("traveler{:03}@skybook.dev", i),
            Role::User,
        );
        user_ids.push(store.insert_user(user).await?);
    }

    // Flights: random routes, departures spread from 30 days back to 90
    // days out, capacities from the common narrow-body configs.
    let mut flight_ids = Vec::new();
    for _ in 0..cfg.flights {
        let mut pair = AIRPORTS.to_vec();
        pair.shuffle(&mut rng);
        let departure =
            Utc::now() + Duration::minutes(rng.gen_range(-30 * 24 * 60..90 * 24 * 60));
        let duration = Duration::hours(rng.gen_range(1..=5))
            + Duration::minutes(*[0, 15, 30, 45].choose(&mut rng).unwrap_or(&0));
        let total_seats = *[100, 120, 150, 180].choose(&mut rng).unwrap_or(&120);

        let flight = NewFlight {
            flight_number: format!(
                "{}{}",
                AIRLINES.choose(&mut rng).unwrap_or(&"GA"),
                rng.gen_range(100..1000)
            ),
            origin: pair[0].to_string(),
            destination: pair[1].to_string(),
            departure_time: departure,
            arrival_time: departure + duration,
            price_amount: rng.gen_range(500..3000) * 1000,
            price_currency: currency.to_string(),
            total_seats,
        };

        match store.insert_flight(flight).await {
            Ok(id) => flight_ids.push(id),
            // Random flight numbers collide occasionally; skip those.
            Err(InventoryError::DuplicateFlightNumber(_)) => continue,
            Err(err) => return Err(err.into()),
        }
    }

    // Bookings: decrement-then-insert, with roughly a quarter cancelled
    // again afterwards so history pages have both statuses.
    let mut booked = 0usize;
    for _ in 0..cfg.bookings {
        let (Some(&flight_id), Some(&user_id)) =
            (flight_ids.choose(&mut rng), user_ids.choose(&mut rng))
        else {
            break;
        };
        let flight = store.get_flight(flight_id).await?;
        let num_passengers = rng.gen_range(1..=4);

        if store
            .try_decrement_seats(flight_id, num_passengers)
            .await
            .is_err()
        {
            continue;
        }

        let passengers = (0..num_passengers)
            .map(|i| Passenger {
                full_name: format!("Penumpang {}", i + 1),
                date_of_birth: NaiveDate::default()
                    + Duration::days(rng.gen_range(0..18_000)),
                id_number: Masked(format!("31710{:011}", rng.gen_range(0..=99_999_999_999i64))),
            })
            .collect();

        let mut booking = Booking::new(
            user_id,
            flight_id,
            passengers,
            flight.price_amount,
            flight.price_currency.clone(),
        );
        booking.booking_date = Utc::now() - Duration::days(rng.gen_range(1..60));
        let booking_id = store.insert_booking(booking).await?;
        booked += 1;

        if rng.gen_range(0..4) == 0 {
            store.increment_seats(flight_id, num_passengers).await?;
            store.set_cancelled(booking_id, Utc::now()).await?;
        }
    }

    let summary = SeedSummary {
        users: user_ids.len() + 1,
        flights: flight_ids.len(),
        bookings: booked,
        admin_id,
        sample_user_id: user_ids.first().copied().unwrap_or(admin_id),
    };
    info!(
        users = summary.users,
        flights = summary.flights,
        bookings = summary.bookings,
        "store seeded"
    );
    Ok(summary)
}

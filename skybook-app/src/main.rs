use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skybook_core::repository::UserDirectory;
use skybook_engine::{BookingService, SearchQuery};
use skybook_shared::{PassengerForm, Role, Session};
use skybook_store::{seed, Config, MemoryStore};

/// Process entry point: owns the store lifecycle and hands explicit
/// handles to every component. A request-handling layer would bolt onto
/// the same `BookingService`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load config")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log.filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store = Arc::new(MemoryStore::new());
    let summary = seed::populate(&store, &config.seed, &config.pricing.currency)
        .await
        .map_err(|e| anyhow::anyhow!(e))
        .context("seeding failed")?;
    tracing::info!(
        users = summary.users,
        flights = summary.flights,
        bookings = summary.bookings,
        "skybook store ready"
    );

    let service = BookingService::new(store.clone(), store.clone(), store.clone());

    // Smoke pass over the boundary: search, book, cancel, admin overview.
    let traveler = Session {
        user_id: summary.sample_user_id,
        role: Role::User,
    };
    let admin = store.get_user(summary.admin_id).await?.session();

    let flights = service.search(&SearchQuery::default()).await?;
    tracing::info!(count = flights.len(), "bookable upcoming flights");

    if let Some(flight) = flights.first() {
        let booking_id = service
            .book(
                &traveler,
                flight.id,
                &[PassengerForm {
                    full_name: "Rina Wati".to_string(),
                    date_of_birth: "1990-05-14".to_string(),
                    id_number: "3171020105900001".to_string(),
                }],
            )
            .await?;
        tracing::info!(%booking_id, flight = %flight.flight_number, "booked");

        let outcome = service.cancel(&traveler, booking_id).await?;
        tracing::info!(?outcome, "cancelled again");
    }

    let stats = service.dashboard(&admin).await?;
    tracing::info!(
        users = stats.total_users,
        flights = stats.total_flights,
        confirmed = stats.confirmed_bookings,
        "dashboard totals"
    );

    Ok(())
}

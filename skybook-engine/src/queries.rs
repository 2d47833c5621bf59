use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use skybook_core::error::EngineError;
use skybook_core::repository::{BookingLedger, FlightInventory, UserDirectory};
use skybook_shared::{Booking, Flight, FlightFilter, User};

/// Boundary-supplied search filters; blank fields mean "any".
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub departure_date: Option<NaiveDate>,
}

/// A booking joined with its flight, for user history pages.
#[derive(Debug, Clone, Serialize)]
pub struct BookingWithFlight {
    pub booking: Booking,
    pub flight: Flight,
}

/// A booking joined with flight and user, for the admin overview.
#[derive(Debug, Clone, Serialize)]
pub struct BookingRecord {
    pub booking: Booking,
    pub flight: Flight,
    pub user: User,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct DashboardStats {
    pub total_users: i64,
    pub total_flights: i64,
    pub confirmed_bookings: i64,
}

/// Read-side helpers over the three stores. Pure reads; the only promise
/// is to reflect current store state in a stable order.
#[derive(Clone)]
pub struct QueryFacade {
    inventory: Arc<dyn FlightInventory>,
    ledger: Arc<dyn BookingLedger>,
    users: Arc<dyn UserDirectory>,
}

impl QueryFacade {
    pub fn new(
        inventory: Arc<dyn FlightInventory>,
        ledger: Arc<dyn BookingLedger>,
        users: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            inventory,
            ledger,
            users,
        }
    }

    /// Bookable flights matching the query, ascending by departure.
    ///
    /// A date filter selects that whole day; without one, only flights
    /// departing from now onward are shown. Sold-out flights never appear.
    pub async fn search_available(&self, query: &SearchQuery) -> Result<Vec<Flight>, EngineError> {
        let mut filter = FlightFilter {
            origin: normalize(&query.origin),
            destination: normalize(&query.destination),
            only_available: true,
            ..Default::default()
        };
        match query.departure_date {
            Some(date) => {
                let start = date.and_time(NaiveTime::MIN).and_utc();
                filter.departure_between = Some((start, start + Duration::days(1)));
            }
            None => filter.departing_after = Some(Utc::now()),
        }
        Ok(self.inventory.search_flights(&filter).await?)
    }

    pub async fn flight_details(&self, flight_id: Uuid) -> Result<Flight, EngineError> {
        Ok(self.inventory.get_flight(flight_id).await?)
    }

    /// Every flight regardless of availability, ascending by departure.
    /// Backs the admin inventory listing.
    pub async fn manage_flights(&self) -> Result<Vec<Flight>, EngineError> {
        Ok(self
            .inventory
            .search_flights(&FlightFilter::default())
            .await?)
    }

    /// One user's bookings joined with their flights, newest first.
    pub async fn user_booking_history(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<BookingWithFlight>, EngineError> {
        let bookings = self
            .ledger
            .list_by_user(user_id)
            .await
            .map_err(|e| EngineError::Store(e.to_string()))?;
        let mut history = Vec::with_capacity(bookings.len());
        for booking in bookings {
            // A flight can only disappear once its bookings are purged, so
            // a miss here is a benign race with a concurrent delete.
            if let Ok(flight) = self.inventory.get_flight(booking.flight_id).await {
                history.push(BookingWithFlight { booking, flight });
            }
        }
        Ok(history)
    }

    /// The full booking ledger joined with flights and users, newest first.
    pub async fn all_bookings(&self) -> Result<Vec<BookingRecord>, EngineError> {
        let bookings = self
            .ledger
            .list_all()
            .await
            .map_err(|e| EngineError::Store(e.to_string()))?;
        let mut records = Vec::with_capacity(bookings.len());
        for booking in bookings {
            let Ok(flight) = self.inventory.get_flight(booking.flight_id).await else {
                continue;
            };
            let Ok(user) = self.users.get_user(booking.user_id).await else {
                continue;
            };
            records.push(BookingRecord {
                booking,
                flight,
                user,
            });
        }
        Ok(records)
    }

    /// Every account, newest first. Backs the admin user listing.
    pub async fn manage_users(&self) -> Result<Vec<User>, EngineError> {
        Ok(self.users.list_users().await?)
    }

    pub async fn airports(&self) -> Result<Vec<String>, EngineError> {
        Ok(self.inventory.distinct_airports().await?)
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, EngineError> {
        Ok(DashboardStats {
            total_users: self.users.count_users().await?,
            total_flights: self.inventory.count_flights().await?,
            confirmed_bookings: self
                .ledger
                .count_confirmed()
                .await
                .map_err(|e| EngineError::Store(e.to_string()))?,
        })
    }
}

fn normalize(code: &Option<String>) -> Option<String> {
    code.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_uppercase)
}

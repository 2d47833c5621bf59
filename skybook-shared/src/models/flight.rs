use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A flight record as held by the inventory store.
///
/// `available_seats` is the contended counter. It is only ever mutated
/// through the conditional primitives on the inventory contract, so at
/// any observed instant `available_seats == total_seats - confirmed
/// passenger count` for this flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flight {
    pub id: Uuid,
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub price_amount: i32,
    pub price_currency: String,
    pub total_seats: i32,
    pub available_seats: i32,
}

impl Flight {
    /// Seats held by confirmed bookings, derived from the stored counters.
    pub fn occupied_seats(&self) -> i32 {
        self.total_seats - self.available_seats
    }
}

/// Payload for admin add-flight. A new flight starts fully available.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFlight {
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub price_amount: i32,
    pub price_currency: String,
    pub total_seats: i32,
}

impl NewFlight {
    pub fn into_flight(self) -> Flight {
        Flight {
            id: Uuid::new_v4(),
            flight_number: self.flight_number,
            origin: self.origin,
            destination: self.destination,
            departure_time: self.departure_time,
            arrival_time: self.arrival_time,
            price_amount: self.price_amount,
            price_currency: self.price_currency,
            total_seats: self.total_seats,
            available_seats: self.total_seats,
        }
    }
}

/// Full admin edit payload, including a possibly changed capacity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightEdit {
    pub origin: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub price_amount: i32,
    pub price_currency: String,
    pub total_seats: i32,
}

impl FlightEdit {
    /// The non-seat portion of the edit, applied after the capacity change.
    pub fn details(&self) -> FlightUpdate {
        FlightUpdate {
            origin: self.origin.clone(),
            destination: self.destination.clone(),
            departure_time: self.departure_time,
            arrival_time: self.arrival_time,
            price_amount: self.price_amount,
            price_currency: self.price_currency.clone(),
        }
    }
}

/// Non-seat fields an admin may edit on an existing flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightUpdate {
    pub origin: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub price_amount: i32,
    pub price_currency: String,
}

/// Read-side filter for flight search. All constraints are conjunctive.
#[derive(Debug, Clone, Default)]
pub struct FlightFilter {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub departure_between: Option<(DateTime<Utc>, DateTime<Utc>)>,
    pub departing_after: Option<DateTime<Utc>>,
    pub only_available: bool,
}

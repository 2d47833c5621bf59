use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pii::Masked;

/// Booking status. The only transition is Confirmed -> Cancelled, one-way.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

/// A validated passenger record attached to a booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passenger {
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub id_number: Masked<String>,
}

/// Raw passenger input from the boundary layer, validated before use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassengerForm {
    pub full_name: String,
    pub date_of_birth: String,
    pub id_number: String,
}

/// A seat reservation against a single flight by a single user.
///
/// `total_price_amount` is a snapshot of `flight.price_amount * num_passengers`
/// taken at booking time; it is never recomputed afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub flight_id: Uuid,
    pub num_passengers: i32,
    pub passengers: Vec<Passenger>,
    pub total_price_amount: i32,
    pub price_currency: String,
    pub status: BookingStatus,
    pub booking_date: DateTime<Utc>,
    pub cancellation_date: Option<DateTime<Utc>>,
}

impl Booking {
    pub fn new(
        user_id: Uuid,
        flight_id: Uuid,
        passengers: Vec<Passenger>,
        price_amount: i32,
        price_currency: String,
    ) -> Self {
        let num_passengers = passengers.len() as i32;
        Self {
            id: Uuid::new_v4(),
            user_id,
            flight_id,
            num_passengers,
            total_price_amount: price_amount * num_passengers,
            price_currency,
            passengers,
            status: BookingStatus::Confirmed,
            booking_date: Utc::now(),
            cancellation_date: None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == BookingStatus::Cancelled
    }
}

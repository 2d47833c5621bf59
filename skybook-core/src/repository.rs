use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use skybook_shared::{Booking, Flight, FlightFilter, FlightUpdate, NewFlight, User};

use crate::error::{DirectoryError, InventoryError, LedgerError};

/// Contract for the flight inventory store.
///
/// `available_seats` is the single contended resource in the system. The
/// seat-mutating methods must be linearizable with respect to each other on
/// the same flight record; callers never perform their own read-then-write
/// on the counter.
#[async_trait]
pub trait FlightInventory: Send + Sync {
    /// Inserts a new flight. The duplicate flight-number check happens
    /// atomically with the insert.
    async fn insert_flight(&self, flight: NewFlight) -> Result<Uuid, InventoryError>;

    async fn get_flight(&self, id: Uuid) -> Result<Flight, InventoryError>;

    /// Conditionally decrements `available_seats` by `n`, failing with
    /// `InsufficientSeats` unless `available_seats >= n` at apply time.
    /// This is the sole strong-consistency primitive the booking path
    /// relies on.
    async fn try_decrement_seats(&self, id: Uuid, n: i32) -> Result<(), InventoryError>;

    /// Unconditionally increments `available_seats` by `n`. Used by the
    /// cancellation path and by booking compensation; only fails when the
    /// flight is gone.
    async fn increment_seats(&self, id: Uuid, n: i32) -> Result<(), InventoryError>;

    /// Sets a new total capacity, recomputing `available_seats` as
    /// `new_total - occupied`. Rejected when that would go negative.
    async fn set_capacity(&self, id: Uuid, new_total: i32, occupied: i32)
        -> Result<(), InventoryError>;

    /// Applies the non-seat fields of an admin edit.
    async fn update_details(&self, id: Uuid, update: FlightUpdate) -> Result<(), InventoryError>;

    async fn delete_flight(&self, id: Uuid) -> Result<(), InventoryError>;

    /// Flights matching the filter, ascending by departure time.
    async fn search_flights(&self, filter: &FlightFilter) -> Result<Vec<Flight>, InventoryError>;

    /// Every airport code appearing as an origin or destination, sorted and
    /// deduplicated.
    async fn distinct_airports(&self) -> Result<Vec<String>, InventoryError>;

    async fn count_flights(&self) -> Result<i64, InventoryError>;
}

/// Contract for the booking ledger.
#[async_trait]
pub trait BookingLedger: Send + Sync {
    async fn insert_booking(&self, booking: Booking) -> Result<Uuid, LedgerError>;

    async fn get_booking(&self, id: Uuid) -> Result<Booking, LedgerError>;

    /// Flips a confirmed booking to cancelled, recording the cancellation
    /// time. Atomic with respect to concurrent cancellations: exactly one
    /// caller observes success, the rest get `AlreadyCancelled`.
    async fn set_cancelled(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), LedgerError>;

    async fn count_confirmed_for_flight(&self, flight_id: Uuid) -> Result<i64, LedgerError>;

    /// Total passengers across confirmed bookings on a flight. Lets a
    /// reconciliation pass compare ledger occupancy against the stored
    /// seat counters.
    async fn confirmed_passengers_for_flight(&self, flight_id: Uuid) -> Result<i64, LedgerError>;

    /// Bookings for one user, newest first.
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Booking>, LedgerError>;

    /// All bookings, newest first.
    async fn list_all(&self) -> Result<Vec<Booking>, LedgerError>;

    /// Removes the cancelled bookings referencing a flight. Confirmed
    /// bookings are left untouched even if one slips in between the
    /// delete guard's check and the purge.
    async fn purge_for_flight(&self, flight_id: Uuid) -> Result<usize, LedgerError>;

    async fn count_confirmed(&self) -> Result<i64, LedgerError>;
}

/// Contract for the user directory backing the admin joins.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn insert_user(&self, user: User) -> Result<Uuid, DirectoryError>;

    async fn get_user(&self, id: Uuid) -> Result<User, DirectoryError>;

    /// All users, newest first.
    async fn list_users(&self) -> Result<Vec<User>, DirectoryError>;

    async fn count_users(&self) -> Result<i64, DirectoryError>;
}

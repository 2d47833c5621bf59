use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use skybook_core::error::{EngineError, LedgerError};
use skybook_core::repository::{BookingLedger, FlightInventory};
use skybook_core::validate;
use skybook_shared::{Booking, FlightEdit, NewFlight, PassengerForm};

/// Outcome of a cancellation request. `AlreadyCancelled` is informational,
/// not an error: cancelling twice is a no-op success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    Cancelled,
    AlreadyCancelled,
}

/// Coordinates the inventory store and the booking ledger so the seat
/// counter stays consistent with the set of confirmed bookings.
///
/// The two stores are not joined by a transaction. The engine leans on one
/// strong primitive, the conditional seat decrement, and compensates the
/// counter when a cross-record step fails partway.
#[derive(Clone)]
pub struct ReservationEngine {
    inventory: Arc<dyn FlightInventory>,
    ledger: Arc<dyn BookingLedger>,
}

impl ReservationEngine {
    pub fn new(inventory: Arc<dyn FlightInventory>, ledger: Arc<dyn BookingLedger>) -> Self {
        Self { inventory, ledger }
    }

    /// Books seats on a flight for a validated passenger manifest.
    ///
    /// Ordering contract: decrement-then-insert. A confirmed booking can
    /// only exist behind a successful decrement, so two requests racing on
    /// a nearly-full flight can never oversell; the loser's conditional
    /// decrement fails with `InsufficientSeats`.
    pub async fn book(
        &self,
        flight_id: Uuid,
        user_id: Uuid,
        forms: &[PassengerForm],
    ) -> Result<Booking, EngineError> {
        let passengers = validate::passenger_manifest(forms)?;
        let num_passengers = passengers.len() as i32;

        let flight = self.inventory.get_flight(flight_id).await?;
        self.inventory
            .try_decrement_seats(flight_id, num_passengers)
            .await?;

        let booking = Booking::new(
            user_id,
            flight_id,
            passengers,
            flight.price_amount,
            flight.price_currency.clone(),
        );

        match self.ledger.insert_booking(booking.clone()).await {
            Ok(_) => {
                info!(
                    booking_id = %booking.id,
                    flight = %flight.flight_number,
                    seats = num_passengers,
                    "booking confirmed"
                );
                Ok(booking)
            }
            Err(err) => {
                // The decrement already committed; give the seats back.
                if let Err(comp) = self.inventory.increment_seats(flight_id, num_passengers).await {
                    warn!(
                        %flight_id,
                        seats = num_passengers,
                        error = %comp,
                        "seat compensation failed, counter runs low until reconciled"
                    );
                }
                Err(ledger_err(err))
            }
        }
    }

    /// Cancels a booking on behalf of its owner. Ownership failures are
    /// reported as `BookingNotFound`, indistinguishable from absence.
    pub async fn cancel(
        &self,
        booking_id: Uuid,
        requesting_user: Uuid,
    ) -> Result<CancelOutcome, EngineError> {
        self.cancel_inner(booking_id, Some(requesting_user)).await
    }

    /// Admin cancellation: explicitly bypasses the ownership check.
    pub async fn cancel_as_admin(&self, booking_id: Uuid) -> Result<CancelOutcome, EngineError> {
        self.cancel_inner(booking_id, None).await
    }

    async fn cancel_inner(
        &self,
        booking_id: Uuid,
        owner: Option<Uuid>,
    ) -> Result<CancelOutcome, EngineError> {
        let booking = self.ledger.get_booking(booking_id).await.map_err(ledger_err)?;
        if owner.is_some_and(|user| booking.user_id != user) {
            return Err(EngineError::BookingNotFound);
        }
        if booking.is_cancelled() {
            return Ok(CancelOutcome::AlreadyCancelled);
        }

        self.inventory
            .increment_seats(booking.flight_id, booking.num_passengers)
            .await?;

        match self.ledger.set_cancelled(booking_id, Utc::now()).await {
            Ok(()) => {
                info!(%booking_id, seats = booking.num_passengers, "booking cancelled");
                Ok(CancelOutcome::Cancelled)
            }
            Err(LedgerError::AlreadyCancelled(_)) => {
                // A concurrent cancel won the status flip; take the seats
                // back out so they are not returned twice.
                if let Err(comp) = self
                    .inventory
                    .try_decrement_seats(booking.flight_id, booking.num_passengers)
                    .await
                {
                    warn!(
                        %booking_id,
                        error = %comp,
                        "could not revert duplicate cancellation increment"
                    );
                }
                Ok(CancelOutcome::AlreadyCancelled)
            }
            Err(err) => {
                // Seats are back in inventory but the ledger still says
                // confirmed. The window biases toward availability, never
                // toward overbooking, and a retry of the cancel heals it.
                warn!(
                    %booking_id,
                    error = %err,
                    "seat increment committed but status flip failed"
                );
                Err(ledger_err(err))
            }
        }
    }

    /// Changes a flight's total capacity, keeping occupied seats intact.
    ///
    /// Occupancy is derived from the stored `total - available` delta, not
    /// recounted from the ledger; see DESIGN.md for the trade-off.
    pub async fn set_capacity(&self, flight_id: Uuid, new_total: i32) -> Result<(), EngineError> {
        if new_total <= 0 {
            return Err(EngineError::InvalidInput(
                "total seats must be positive".to_string(),
            ));
        }
        let flight = self.inventory.get_flight(flight_id).await?;
        let occupied = flight.occupied_seats();
        self.inventory
            .set_capacity(flight_id, new_total, occupied)
            .await?;
        info!(%flight_id, new_total, occupied, "capacity updated");
        Ok(())
    }

    /// Deletes a flight, guarded by the ledger: any confirmed booking keeps
    /// the flight alive. Leftover cancelled bookings are purged so no
    /// orphan records remain.
    pub async fn delete_flight(&self, flight_id: Uuid) -> Result<(), EngineError> {
        let confirmed = self
            .ledger
            .count_confirmed_for_flight(flight_id)
            .await
            .map_err(ledger_err)?;
        if confirmed > 0 {
            return Err(EngineError::FlightHasActiveBookings);
        }

        self.inventory.delete_flight(flight_id).await?;
        let purged = self.ledger.purge_for_flight(flight_id).await.map_err(ledger_err)?;
        info!(%flight_id, purged, "flight deleted");
        Ok(())
    }

    /// Adds a flight after validation; the duplicate-number guard sits in
    /// the store, atomic with the insert.
    pub async fn add_flight(&self, mut flight: NewFlight) -> Result<Uuid, EngineError> {
        validate::new_flight(&mut flight)?;
        let id = self.inventory.insert_flight(flight).await?;
        info!(flight_id = %id, "flight added");
        Ok(id)
    }

    /// Full admin edit. The capacity change runs first through the guarded
    /// `set_capacity` path, then the remaining fields are applied.
    pub async fn edit_flight(&self, flight_id: Uuid, mut edit: FlightEdit) -> Result<(), EngineError> {
        validate::flight_edit(&mut edit)?;
        self.set_capacity(flight_id, edit.total_seats).await?;
        self.inventory
            .update_details(flight_id, edit.details())
            .await?;
        Ok(())
    }
}

fn ledger_err(err: LedgerError) -> EngineError {
    match err {
        LedgerError::NotFound(_) => EngineError::BookingNotFound,
        LedgerError::AlreadyCancelled(id) => {
            EngineError::Store(format!("booking {id} already cancelled"))
        }
        LedgerError::Backend(msg) => EngineError::Store(msg),
    }
}

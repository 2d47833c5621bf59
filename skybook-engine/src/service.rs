use std::sync::Arc;

use uuid::Uuid;

use skybook_core::error::EngineError;
use skybook_core::repository::{BookingLedger, FlightInventory, UserDirectory};
use skybook_shared::{Flight, FlightEdit, NewFlight, PassengerForm, Session, User};

use crate::access::require_admin;
use crate::queries::{BookingRecord, BookingWithFlight, DashboardStats, QueryFacade, SearchQuery};
use crate::reservation::{CancelOutcome, ReservationEngine};

/// The collaborator boundary: everything the request-handling layer calls.
///
/// Thin composition of the reservation engine, the query facade and the
/// admin gate; store handles are injected once at construction and shared
/// from there.
#[derive(Clone)]
pub struct BookingService {
    engine: ReservationEngine,
    queries: QueryFacade,
}

impl BookingService {
    pub fn new(
        inventory: Arc<dyn FlightInventory>,
        ledger: Arc<dyn BookingLedger>,
        users: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            engine: ReservationEngine::new(inventory.clone(), ledger.clone()),
            queries: QueryFacade::new(inventory, ledger, users),
        }
    }

    // Reads

    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<Flight>, EngineError> {
        self.queries.search_available(query).await
    }

    pub async fn flight_details(&self, flight_id: Uuid) -> Result<Flight, EngineError> {
        self.queries.flight_details(flight_id).await
    }

    pub async fn airports(&self) -> Result<Vec<String>, EngineError> {
        self.queries.airports().await
    }

    pub async fn my_bookings(
        &self,
        session: &Session,
    ) -> Result<Vec<BookingWithFlight>, EngineError> {
        self.queries.user_booking_history(session.user_id).await
    }

    // Mutations

    pub async fn book(
        &self,
        session: &Session,
        flight_id: Uuid,
        passengers: &[PassengerForm],
    ) -> Result<Uuid, EngineError> {
        let booking = self
            .engine
            .book(flight_id, session.user_id, passengers)
            .await?;
        Ok(booking.id)
    }

    pub async fn cancel(
        &self,
        session: &Session,
        booking_id: Uuid,
    ) -> Result<CancelOutcome, EngineError> {
        self.engine.cancel(booking_id, session.user_id).await
    }

    // Admin surface, all behind the capability gate

    pub async fn admin_add_flight(
        &self,
        session: &Session,
        flight: NewFlight,
    ) -> Result<Uuid, EngineError> {
        require_admin(session)?;
        self.engine.add_flight(flight).await
    }

    pub async fn admin_edit_flight(
        &self,
        session: &Session,
        flight_id: Uuid,
        edit: FlightEdit,
    ) -> Result<(), EngineError> {
        require_admin(session)?;
        self.engine.edit_flight(flight_id, edit).await
    }

    pub async fn admin_delete_flight(
        &self,
        session: &Session,
        flight_id: Uuid,
    ) -> Result<(), EngineError> {
        require_admin(session)?;
        self.engine.delete_flight(flight_id).await
    }

    pub async fn admin_cancel_booking(
        &self,
        session: &Session,
        booking_id: Uuid,
    ) -> Result<CancelOutcome, EngineError> {
        require_admin(session)?;
        self.engine.cancel_as_admin(booking_id).await
    }

    pub async fn admin_flights(&self, session: &Session) -> Result<Vec<Flight>, EngineError> {
        require_admin(session)?;
        self.queries.manage_flights().await
    }

    pub async fn admin_users(&self, session: &Session) -> Result<Vec<User>, EngineError> {
        require_admin(session)?;
        self.queries.manage_users().await
    }

    pub async fn all_bookings(&self, session: &Session) -> Result<Vec<BookingRecord>, EngineError> {
        require_admin(session)?;
        self.queries.all_bookings().await
    }

    pub async fn dashboard(&self, session: &Session) -> Result<DashboardStats, EngineError> {
        require_admin(session)?;
        self.queries.dashboard_stats().await
    }
}

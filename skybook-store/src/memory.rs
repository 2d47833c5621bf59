use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use skybook_core::error::{DirectoryError, InventoryError, LedgerError};
use skybook_core::repository::{BookingLedger, FlightInventory, UserDirectory};
use skybook_shared::{Booking, BookingStatus, Flight, FlightFilter, FlightUpdate, NewFlight, User};

/// The single logical document store backing inventory, ledger and
/// directory.
///
/// Each collection sits behind its own lock; a write guard spans every
/// read-check-write on a record, which is what makes the conditional seat
/// decrement linearizable with respect to other updates on the same
/// flight. Nothing here spans two collections atomically, matching the
/// document-level guarantee the reservation engine is built against.
pub struct MemoryStore {
    flights: RwLock<HashMap<Uuid, Flight>>,
    bookings: RwLock<HashMap<Uuid, Booking>>,
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            flights: RwLock::new(HashMap::new()),
            bookings: RwLock::new(HashMap::new()),
            users: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FlightInventory for MemoryStore {
    async fn insert_flight(&self, flight: NewFlight) -> Result<Uuid, InventoryError> {
        let mut flights = self.flights.write().await;
        if flights
            .values()
            .any(|f| f.flight_number.eq_ignore_ascii_case(&flight.flight_number))
        {
            return Err(InventoryError::DuplicateFlightNumber(flight.flight_number));
        }
        let flight = flight.into_flight();
        let id = flight.id;
        flights.insert(id, flight);
        Ok(id)
    }

    async fn get_flight(&self, id: Uuid) -> Result<Flight, InventoryError> {
        self.flights
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(InventoryError::NotFound(id))
    }

    async fn try_decrement_seats(&self, id: Uuid, n: i32) -> Result<(), InventoryError> {
        let mut flights = self.flights.write().await;
        let flight = flights.get_mut(&id).ok_or(InventoryError::NotFound(id))?;
        if flight.available_seats < n {
            return Err(InventoryError::InsufficientSeats {
                requested: n,
                available: flight.available_seats,
            });
        }
        flight.available_seats -= n;
        Ok(())
    }

    async fn increment_seats(&self, id: Uuid, n: i32) -> Result<(), InventoryError> {
        let mut flights = self.flights.write().await;
        let flight = flights.get_mut(&id).ok_or(InventoryError::NotFound(id))?;
        flight.available_seats += n;
        Ok(())
    }

    async fn set_capacity(
        &self,
        id: Uuid,
        new_total: i32,
        occupied: i32,
    ) -> Result<(), InventoryError> {
        let mut flights = self.flights.write().await;
        let flight = flights.get_mut(&id).ok_or(InventoryError::NotFound(id))?;
        let new_available = new_total - occupied;
        if new_available < 0 {
            return Err(InventoryError::CapacityBelowOccupancy { new_total, occupied });
        }
        flight.total_seats = new_total;
        flight.available_seats = new_available;
        Ok(())
    }

    async fn update_details(&self, id: Uuid, update: FlightUpdate) -> Result<(), InventoryError> {
        let mut flights = self.flights.write().await;
        let flight = flights.get_mut(&id).ok_or(InventoryError::NotFound(id))?;
        flight.origin = update.origin;
        flight.destination = update.destination;
        flight.departure_time = update.departure_time;
        flight.arrival_time = update.arrival_time;
        flight.price_amount = update.price_amount;
        flight.price_currency = update.price_currency;
        Ok(())
    }

    async fn delete_flight(&self, id: Uuid) -> Result<(), InventoryError> {
        self.flights
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(InventoryError::NotFound(id))
    }

    async fn search_flights(&self, filter: &FlightFilter) -> Result<Vec<Flight>, InventoryError> {
        let flights = self.flights.read().await;
        let mut matches: Vec<Flight> = flights
            .values()
            .filter(|f| {
                if let Some(origin) = &filter.origin {
                    if !f.origin.eq_ignore_ascii_case(origin) {
                        return false;
                    }
                }
                if let Some(destination) = &filter.destination {
                    if !f.destination.eq_ignore_ascii_case(destination) {
                        return false;
                    }
                }
                if let Some((from, to)) = filter.departure_between {
                    if f.departure_time < from || f.departure_time >= to {
                        return false;
                    }
                }
                if let Some(after) = filter.departing_after {
                    if f.departure_time < after {
                        return false;
                    }
                }
                if filter.only_available && f.available_seats <= 0 {
                    return false;
                }
                true
            })
            .cloned()
            .collect();
        matches.sort_by_key(|f| f.departure_time);
        Ok(matches)
    }

    async fn distinct_airports(&self) -> Result<Vec<String>, InventoryError> {
        let flights = self.flights.read().await;
        let codes: BTreeSet<String> = flights
            .values()
            .flat_map(|f| [f.origin.clone(), f.destination.clone()])
            .collect();
        Ok(codes.into_iter().collect())
    }

    async fn count_flights(&self) -> Result<i64, InventoryError> {
        Ok(self.flights.read().await.len() as i64)
    }
}

#[async_trait]
impl BookingLedger for MemoryStore {
    async fn insert_booking(&self, booking: Booking) -> Result<Uuid, LedgerError> {
        let id = booking.id;
        self.bookings.write().await.insert(id, booking);
        Ok(id)
    }

    async fn get_booking(&self, id: Uuid) -> Result<Booking, LedgerError> {
        self.bookings
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(LedgerError::NotFound(id))
    }

    async fn set_cancelled(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), LedgerError> {
        let mut bookings = self.bookings.write().await;
        let booking = bookings.get_mut(&id).ok_or(LedgerError::NotFound(id))?;
        if booking.status == BookingStatus::Cancelled {
            return Err(LedgerError::AlreadyCancelled(id));
        }
        booking.status = BookingStatus::Cancelled;
        booking.cancellation_date = Some(at);
        Ok(())
    }

    async fn count_confirmed_for_flight(&self, flight_id: Uuid) -> Result<i64, LedgerError> {
        let bookings = self.bookings.read().await;
        Ok(bookings
            .values()
            .filter(|b| b.flight_id == flight_id && b.status == BookingStatus::Confirmed)
            .count() as i64)
    }

    async fn confirmed_passengers_for_flight(&self, flight_id: Uuid) -> Result<i64, LedgerError> {
        let bookings = self.bookings.read().await;
        Ok(bookings
            .values()
            .filter(|b| b.flight_id == flight_id && b.status == BookingStatus::Confirmed)
            .map(|b| b.num_passengers as i64)
            .sum())
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Booking>, LedgerError> {
        let bookings = self.bookings.read().await;
        let mut owned: Vec<Booking> = bookings
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.booking_date.cmp(&a.booking_date));
        Ok(owned)
    }

    async fn list_all(&self) -> Result<Vec<Booking>, LedgerError> {
        let bookings = self.bookings.read().await;
        let mut all: Vec<Booking> = bookings.values().cloned().collect();
        all.sort_by(|a, b| b.booking_date.cmp(&a.booking_date));
        Ok(all)
    }

    async fn purge_for_flight(&self, flight_id: Uuid) -> Result<usize, LedgerError> {
        let mut bookings = self.bookings.write().await;
        let before = bookings.len();
        bookings.retain(|_, b| {
            b.flight_id != flight_id || b.status != BookingStatus::Cancelled
        });
        Ok(before - bookings.len())
    }

    async fn count_confirmed(&self) -> Result<i64, LedgerError> {
        let bookings = self.bookings.read().await;
        Ok(bookings
            .values()
            .filter(|b| b.status == BookingStatus::Confirmed)
            .count() as i64)
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn insert_user(&self, user: User) -> Result<Uuid, DirectoryError> {
        let id = user.id;
        self.users.write().await.insert(id, user);
        Ok(id)
    }

    async fn get_user(&self, id: Uuid) -> Result<User, DirectoryError> {
        self.users
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(DirectoryError::NotFound(id))
    }

    async fn list_users(&self) -> Result<Vec<User>, DirectoryError> {
        let users = self.users.read().await;
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn count_users(&self) -> Result<i64, DirectoryError> {
        Ok(self.users.read().await.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_flight(number: &str, origin: &str, destination: &str, seats: i32) -> NewFlight {
        let departure = Utc::now() + Duration::days(10);
        NewFlight {
            flight_number: number.to_string(),
            origin: origin.to_string(),
            destination: destination.to_string(),
            departure_time: departure,
            arrival_time: departure + Duration::hours(2),
            price_amount: 900_000,
            price_currency: "IDR".to_string(),
            total_seats: seats,
        }
    }

    #[tokio::test]
    async fn duplicate_flight_number_rejected() {
        let store = MemoryStore::new();
        store
            .insert_flight(sample_flight("GA210", "CGK", "DPS", 100))
            .await
            .unwrap();
        let err = store
            .insert_flight(sample_flight("GA210", "SUB", "KNO", 120))
            .await
            .unwrap_err();
        assert!(matches!(err, InventoryError::DuplicateFlightNumber(_)));
    }

    #[tokio::test]
    async fn decrement_is_conditional() {
        let store = MemoryStore::new();
        let id = store
            .insert_flight(sample_flight("JT15", "CGK", "SUB", 3))
            .await
            .unwrap();

        store.try_decrement_seats(id, 3).await.unwrap();
        let err = store.try_decrement_seats(id, 1).await.unwrap_err();
        assert!(matches!(
            err,
            InventoryError::InsufficientSeats {
                requested: 1,
                available: 0
            }
        ));
        assert_eq!(store.get_flight(id).await.unwrap().available_seats, 0);
    }

    #[tokio::test]
    async fn set_capacity_rejects_negative_availability() {
        let store = MemoryStore::new();
        let id = store
            .insert_flight(sample_flight("QG88", "DPS", "CGK", 100))
            .await
            .unwrap();
        store.try_decrement_seats(id, 50).await.unwrap();

        let flight = store.get_flight(id).await.unwrap();
        assert_eq!(flight.occupied_seats(), 50);

        let err = store.set_capacity(id, 40, 50).await.unwrap_err();
        assert!(matches!(err, InventoryError::CapacityBelowOccupancy { .. }));

        store.set_capacity(id, 60, 50).await.unwrap();
        let flight = store.get_flight(id).await.unwrap();
        assert_eq!(flight.total_seats, 60);
        assert_eq!(flight.available_seats, 10);
    }

    #[tokio::test]
    async fn search_filters_and_sorts_by_departure() {
        let store = MemoryStore::new();
        let late = store
            .insert_flight(sample_flight("ID61", "CGK", "DPS", 100))
            .await
            .unwrap();
        // An earlier departure on the same route.
        let mut earlier = sample_flight("SJ20", "CGK", "DPS", 100);
        earlier.departure_time = earlier.departure_time - Duration::days(5);
        earlier.arrival_time = earlier.departure_time + Duration::hours(2);
        let early = store.insert_flight(earlier).await.unwrap();
        store
            .insert_flight(sample_flight("IW77", "SUB", "UPG", 100))
            .await
            .unwrap();

        let filter = FlightFilter {
            origin: Some("CGK".to_string()),
            destination: Some("DPS".to_string()),
            only_available: true,
            ..Default::default()
        };
        let results = store.search_flights(&filter).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, early);
        assert_eq!(results[1].id, late);
    }

    #[tokio::test]
    async fn sold_out_flights_drop_from_available_search() {
        let store = MemoryStore::new();
        let id = store
            .insert_flight(sample_flight("GA700", "KNO", "CGK", 2))
            .await
            .unwrap();
        store.try_decrement_seats(id, 2).await.unwrap();

        let filter = FlightFilter {
            only_available: true,
            ..Default::default()
        };
        assert!(store.search_flights(&filter).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn cancellation_is_a_one_way_cas() {
        let store = MemoryStore::new();
        let booking = Booking::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            vec![],
            500_000,
            "IDR".to_string(),
        );
        let id = store.insert_booking(booking).await.unwrap();

        store.set_cancelled(id, Utc::now()).await.unwrap();
        let err = store.set_cancelled(id, Utc::now()).await.unwrap_err();
        assert!(matches!(err, LedgerError::AlreadyCancelled(_)));

        let stored = store.get_booking(id).await.unwrap();
        assert!(stored.is_cancelled());
        assert!(stored.cancellation_date.is_some());
    }

    #[tokio::test]
    async fn booking_lists_are_newest_first() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let flight = Uuid::new_v4();

        let mut older = Booking::new(user, flight, vec![], 100, "IDR".to_string());
        older.booking_date = Utc::now() - Duration::days(3);
        let newer = Booking::new(user, flight, vec![], 100, "IDR".to_string());
        let older_id = older.id;
        let newer_id = newer.id;
        store.insert_booking(older).await.unwrap();
        store.insert_booking(newer).await.unwrap();

        let history = store.list_by_user(user).await.unwrap();
        assert_eq!(history[0].id, newer_id);
        assert_eq!(history[1].id, older_id);
    }

    #[tokio::test]
    async fn purge_removes_only_cancelled_bookings_of_the_flight() {
        let store = MemoryStore::new();
        let doomed = Uuid::new_v4();
        let kept = Uuid::new_v4();
        let stale = Booking::new(Uuid::new_v4(), doomed, vec![], 100, "IDR".into());
        let survivor = Booking::new(Uuid::new_v4(), doomed, vec![], 100, "IDR".into());
        let survivor_id = survivor.id;
        store.insert_booking(stale.clone()).await.unwrap();
        store.insert_booking(survivor).await.unwrap();
        store
            .insert_booking(Booking::new(Uuid::new_v4(), kept, vec![], 100, "IDR".into()))
            .await
            .unwrap();
        store.set_cancelled(stale.id, Utc::now()).await.unwrap();

        // A booking confirmed on the doomed flight survives the purge.
        assert_eq!(store.purge_for_flight(doomed).await.unwrap(), 1);
        let remaining = store.list_all().await.unwrap();
        assert_eq!(remaining.len(), 2);
        assert!(remaining.iter().any(|b| b.id == survivor_id));
    }

    #[tokio::test]
    async fn airports_are_sorted_and_deduped() {
        let store = MemoryStore::new();
        store
            .insert_flight(sample_flight("GA1", "DPS", "CGK", 10))
            .await
            .unwrap();
        store
            .insert_flight(sample_flight("GA2", "CGK", "SUB", 10))
            .await
            .unwrap();

        let airports = store.distinct_airports().await.unwrap();
        assert_eq!(airports, vec!["CGK", "DPS", "SUB"]);
    }
}

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use skybook_core::error::EngineError;
use skybook_core::repository::UserDirectory;
use skybook_engine::{BookingService, CancelOutcome, SearchQuery};
use skybook_shared::{NewFlight, PassengerForm, Role, Session, User};
use skybook_store::MemoryStore;

struct Harness {
    store: Arc<MemoryStore>,
    service: BookingService,
    admin: Session,
    traveler: Session,
}

async fn harness() -> Harness {
    let store = Arc::new(MemoryStore::new());
    let service = BookingService::new(store.clone(), store.clone(), store.clone());

    let admin_user = User::new("admin".into(), "admin@skybook.dev".into(), Role::Admin);
    let traveler_user = User::new("rina".into(), "rina@skybook.dev".into(), Role::User);
    let admin = admin_user.session();
    let traveler = traveler_user.session();
    store.insert_user(admin_user).await.unwrap();
    store.insert_user(traveler_user).await.unwrap();

    Harness {
        store,
        service,
        admin,
        traveler,
    }
}

fn new_flight(number: &str, seats: i32, days_out: i64) -> NewFlight {
    let departure = Utc::now() + Duration::days(days_out);
    NewFlight {
        flight_number: number.to_string(),
        origin: "CGK".to_string(),
        destination: "DPS".to_string(),
        departure_time: departure,
        arrival_time: departure + Duration::hours(2),
        price_amount: 950_000,
        price_currency: "IDR".to_string(),
        total_seats: seats,
    }
}

fn manifest(n: usize) -> Vec<PassengerForm> {
    (0..n)
        .map(|i| PassengerForm {
            full_name: format!("Penumpang {}", i + 1),
            date_of_birth: "1985-03-20".to_string(),
            id_number: format!("317102{:05}", i),
        })
        .collect()
}

#[tokio::test]
async fn full_booking_journey_through_the_boundary() {
    let h = harness().await;

    let flight_id = h
        .service
        .admin_add_flight(&h.admin, new_flight("GA210", 100, 14))
        .await
        .unwrap();

    // The traveler finds the flight, books, sees it in history.
    let results = h.service.search(&SearchQuery::default()).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, flight_id);

    let booking_id = h
        .service
        .book(&h.traveler, flight_id, &manifest(2))
        .await
        .unwrap();

    let history = h.service.my_bookings(&h.traveler).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].booking.id, booking_id);
    assert_eq!(history[0].flight.available_seats, 98);

    // Admin sees the booking joined with flight and user.
    let records = h.service.all_bookings(&h.admin).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].user.username, "rina");

    let stats = h.service.dashboard(&h.admin).await.unwrap();
    assert_eq!(stats.confirmed_bookings, 1);
    assert_eq!(stats.total_flights, 1);
    assert_eq!(stats.total_users, 2);

    // Cancel restores availability; a repeat is a no-op.
    assert_eq!(
        h.service.cancel(&h.traveler, booking_id).await.unwrap(),
        CancelOutcome::Cancelled
    );
    assert_eq!(
        h.service.cancel(&h.traveler, booking_id).await.unwrap(),
        CancelOutcome::AlreadyCancelled
    );
    let flight = h.service.flight_details(flight_id).await.unwrap();
    assert_eq!(flight.available_seats, 100);
}

#[tokio::test]
async fn admin_surface_is_gated() {
    let h = harness().await;

    let err = h
        .service
        .admin_add_flight(&h.traveler, new_flight("JT15", 50, 7))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden));

    assert!(matches!(
        h.service.all_bookings(&h.traveler).await.unwrap_err(),
        EngineError::Forbidden
    ));
    assert!(matches!(
        h.service.dashboard(&h.traveler).await.unwrap_err(),
        EngineError::Forbidden
    ));
    assert!(matches!(
        h.service
            .admin_delete_flight(&h.traveler, Uuid::new_v4())
            .await
            .unwrap_err(),
        EngineError::Forbidden
    ));
}

#[tokio::test]
async fn admin_user_listing_is_gated_and_newest_first() {
    let h = harness().await;

    let mut veteran = User::new("veteran".into(), "veteran@skybook.dev".into(), Role::User);
    veteran.created_at = Utc::now() - Duration::days(400);
    h.store.insert_user(veteran).await.unwrap();

    assert!(matches!(
        h.service.admin_users(&h.traveler).await.unwrap_err(),
        EngineError::Forbidden
    ));

    let users = h.service.admin_users(&h.admin).await.unwrap();
    assert_eq!(users.len(), 3);
    assert_eq!(users.last().unwrap().username, "veteran");
}

#[tokio::test]
async fn duplicate_flight_numbers_are_rejected_at_the_boundary() {
    let h = harness().await;
    h.service
        .admin_add_flight(&h.admin, new_flight("QG88", 50, 7))
        .await
        .unwrap();

    let err = h
        .service
        .admin_add_flight(&h.admin, new_flight("qg88", 80, 9))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::DuplicateFlightNumber(_)));
}

#[tokio::test]
async fn delete_guard_and_purge_through_the_boundary() {
    let h = harness().await;
    let flight_id = h
        .service
        .admin_add_flight(&h.admin, new_flight("ID61", 10, 5))
        .await
        .unwrap();
    let booking_id = h
        .service
        .book(&h.traveler, flight_id, &manifest(1))
        .await
        .unwrap();

    let err = h
        .service
        .admin_delete_flight(&h.admin, flight_id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::FlightHasActiveBookings));

    // Admin cancellation bypasses ownership, then the delete goes through.
    h.service
        .admin_cancel_booking(&h.admin, booking_id)
        .await
        .unwrap();
    h.service
        .admin_delete_flight(&h.admin, flight_id)
        .await
        .unwrap();

    assert!(matches!(
        h.service.flight_details(flight_id).await.unwrap_err(),
        EngineError::FlightNotFound
    ));
    assert!(h.service.my_bookings(&h.traveler).await.unwrap().is_empty());
}

#[tokio::test]
async fn seat_invariant_holds_across_mixed_concurrent_traffic() {
    let h = harness().await;
    let flight_id = h
        .service
        .admin_add_flight(&h.admin, new_flight("SJ20", 30, 10))
        .await
        .unwrap();

    // A mix of 1- and 2-seat bookings racing for 30 seats.
    let mut handles = Vec::new();
    for i in 0..40usize {
        let service = h.service.clone();
        let store = h.store.clone();
        handles.push(tokio::spawn(async move {
            let user = User::new(format!("u{i}"), format!("u{i}@skybook.dev"), Role::User);
            let session = user.session();
            store.insert_user(user).await.unwrap();
            service
                .book(&session, flight_id, &manifest(1 + (i % 2)))
                .await
        }));
    }
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) | Err(EngineError::InsufficientSeats { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    use skybook_core::repository::{BookingLedger, FlightInventory};
    let flight = h.store.get_flight(flight_id).await.unwrap();
    let confirmed = h
        .store
        .confirmed_passengers_for_flight(flight_id)
        .await
        .unwrap();
    assert_eq!(
        flight.available_seats as i64 + confirmed,
        flight.total_seats as i64
    );
}

pub mod access;
pub mod queries;
pub mod reservation;
pub mod service;

pub use queries::{BookingRecord, BookingWithFlight, DashboardStats, QueryFacade, SearchQuery};
pub use reservation::{CancelOutcome, ReservationEngine};
pub use service::BookingService;

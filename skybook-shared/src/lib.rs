pub mod models;
pub mod pii;

pub use models::booking::{Booking, BookingStatus, Passenger, PassengerForm};
pub use models::flight::{Flight, FlightEdit, FlightFilter, FlightUpdate, NewFlight};
pub use models::user::{Role, Session, User};
pub use pii::Masked;

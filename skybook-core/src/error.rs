/// Errors raised by the flight inventory store.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("Flight not found: {0}")]
    NotFound(uuid::Uuid),

    #[error("Insufficient seats: requested {requested}, available {available}")]
    InsufficientSeats { requested: i32, available: i32 },

    #[error("New capacity {new_total} is below current occupancy {occupied}")]
    CapacityBelowOccupancy { new_total: i32, occupied: i32 },

    #[error("Flight number already in use: {0}")]
    DuplicateFlightNumber(String),

    #[error("Inventory backend failure: {0}")]
    Backend(String),
}

/// Errors raised by the booking ledger.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Booking not found: {0}")]
    NotFound(uuid::Uuid),

    #[error("Booking already cancelled: {0}")]
    AlreadyCancelled(uuid::Uuid),

    #[error("Ledger backend failure: {0}")]
    Backend(String),
}

/// Errors raised by the user directory.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("User not found: {0}")]
    NotFound(uuid::Uuid),

    #[error("Directory backend failure: {0}")]
    Backend(String),
}

/// The error surface of the reservation engine and query facade.
///
/// Every variant is recoverable at the request boundary; the boundary layer
/// maps the most specific kind to a user-facing message.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Flight not found")]
    FlightNotFound,

    #[error("Booking not found")]
    BookingNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Insufficient seats: requested {requested}, available {available}")]
    InsufficientSeats { requested: i32, available: i32 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("New capacity {new_total} is below current occupancy {occupied}")]
    CapacityBelowOccupancy { new_total: i32, occupied: i32 },

    #[error("Flight still has confirmed bookings")]
    FlightHasActiveBookings,

    #[error("Flight number already in use: {0}")]
    DuplicateFlightNumber(String),

    #[error("Operation requires the admin role")]
    Forbidden,

    #[error("Store failure: {0}")]
    Store(String),
}

impl From<InventoryError> for EngineError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::NotFound(_) => EngineError::FlightNotFound,
            InventoryError::InsufficientSeats {
                requested,
                available,
            } => EngineError::InsufficientSeats {
                requested,
                available,
            },
            InventoryError::CapacityBelowOccupancy { new_total, occupied } => {
                EngineError::CapacityBelowOccupancy { new_total, occupied }
            }
            InventoryError::DuplicateFlightNumber(number) => {
                EngineError::DuplicateFlightNumber(number)
            }
            InventoryError::Backend(msg) => EngineError::Store(msg),
        }
    }
}

impl From<DirectoryError> for EngineError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::NotFound(_) => EngineError::UserNotFound,
            DirectoryError::Backend(msg) => EngineError::Store(msg),
        }
    }
}

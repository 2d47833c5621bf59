pub mod error;
pub mod repository;
pub mod validate;

pub use error::{DirectoryError, EngineError, InventoryError, LedgerError};
pub use repository::{BookingLedger, FlightInventory, UserDirectory};

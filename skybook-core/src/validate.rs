use chrono::NaiveDate;

use skybook_shared::{FlightEdit, Masked, NewFlight, Passenger, PassengerForm};

use crate::error::EngineError;

const DATE_OF_BIRTH_FORMAT: &str = "%Y-%m-%d";

/// Turns raw passenger forms into a validated manifest.
///
/// Every record must be fully populated and the date of birth must parse;
/// a booking with zero passengers is rejected outright.
pub fn passenger_manifest(forms: &[PassengerForm]) -> Result<Vec<Passenger>, EngineError> {
    if forms.is_empty() {
        return Err(EngineError::InvalidInput(
            "at least one passenger is required".to_string(),
        ));
    }

    let mut manifest = Vec::with_capacity(forms.len());
    for (idx, form) in forms.iter().enumerate() {
        let full_name = form.full_name.trim();
        if full_name.is_empty() {
            return Err(EngineError::InvalidInput(format!(
                "passenger {}: name is required",
                idx + 1
            )));
        }

        let id_number = form.id_number.trim();
        if id_number.is_empty() {
            return Err(EngineError::InvalidInput(format!(
                "passenger {}: ID number is required",
                idx + 1
            )));
        }

        let date_of_birth = NaiveDate::parse_from_str(form.date_of_birth.trim(), DATE_OF_BIRTH_FORMAT)
            .map_err(|_| {
                EngineError::InvalidInput(format!(
                    "passenger {}: date of birth must be YYYY-MM-DD",
                    idx + 1
                ))
            })?;

        manifest.push(Passenger {
            full_name: full_name.to_string(),
            date_of_birth,
            id_number: Masked(id_number.to_string()),
        });
    }

    Ok(manifest)
}

/// Validates an add-flight payload and normalizes its airport codes.
pub fn new_flight(flight: &mut NewFlight) -> Result<(), EngineError> {
    flight.flight_number = flight.flight_number.trim().to_uppercase();
    flight.origin = flight.origin.trim().to_uppercase();
    flight.destination = flight.destination.trim().to_uppercase();

    if flight.flight_number.is_empty() {
        return Err(EngineError::InvalidInput(
            "flight number is required".to_string(),
        ));
    }
    route_and_schedule(
        &flight.origin,
        &flight.destination,
        flight.departure_time,
        flight.arrival_time,
    )?;
    price_and_seats(flight.price_amount, flight.total_seats)
}

/// Validates an edit-flight payload and normalizes its airport codes.
pub fn flight_edit(edit: &mut FlightEdit) -> Result<(), EngineError> {
    edit.origin = edit.origin.trim().to_uppercase();
    edit.destination = edit.destination.trim().to_uppercase();

    route_and_schedule(
        &edit.origin,
        &edit.destination,
        edit.departure_time,
        edit.arrival_time,
    )?;
    price_and_seats(edit.price_amount, edit.total_seats)
}

fn route_and_schedule(
    origin: &str,
    destination: &str,
    departure: chrono::DateTime<chrono::Utc>,
    arrival: chrono::DateTime<chrono::Utc>,
) -> Result<(), EngineError> {
    if origin.is_empty() || destination.is_empty() {
        return Err(EngineError::InvalidInput(
            "origin and destination are required".to_string(),
        ));
    }
    if origin == destination {
        return Err(EngineError::InvalidInput(
            "origin and destination must differ".to_string(),
        ));
    }
    if departure >= arrival {
        return Err(EngineError::InvalidInput(
            "departure must be before arrival".to_string(),
        ));
    }
    Ok(())
}

fn price_and_seats(price_amount: i32, total_seats: i32) -> Result<(), EngineError> {
    if price_amount <= 0 {
        return Err(EngineError::InvalidInput(
            "price must be positive".to_string(),
        ));
    }
    if total_seats <= 0 {
        return Err(EngineError::InvalidInput(
            "total seats must be positive".to_string(),
        ));
    }
    Ok(())
}
